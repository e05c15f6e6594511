//! SQL for the `ukri_projects` table. The DDL and statements are portable between
//! Postgres and SQLite apart from bind placeholders.

/// `project_id` is the only uniqueness constraint; rows are never updated.
pub const PROJECTS_INIT: &str = r#"
-- ---------------------------------------------------------------------------
-- GtR projects (one row per project id, first write wins)
-- ---------------------------------------------------------------------------
CREATE TABLE IF NOT EXISTS ukri_projects (
    project_id TEXT PRIMARY KEY NOT NULL,
    title TEXT NULL,
    status TEXT NULL,
    abstract TEXT NULL,
    funder TEXT NULL
);
"#;

pub const PG_INSERT_PROJECT: &str = r#"
INSERT INTO ukri_projects (project_id, title, status, abstract, funder)
VALUES ($1, $2, $3, $4, $5)
ON CONFLICT (project_id) DO NOTHING
"#;

pub const SQLITE_INSERT_PROJECT: &str = r#"
INSERT INTO ukri_projects (project_id, title, status, abstract, funder)
VALUES (?, ?, ?, ?, ?)
ON CONFLICT (project_id) DO NOTHING
"#;

pub const COUNT_PROJECTS: &str = "SELECT COUNT(*) FROM ukri_projects";

pub const PG_SELECT_PROJECT: &str = r#"
SELECT project_id, title, status, abstract, funder
FROM ukri_projects
WHERE project_id = $1
"#;

pub const SQLITE_SELECT_PROJECT: &str = r#"
SELECT project_id, title, status, abstract, funder
FROM ukri_projects
WHERE project_id = ?
"#;

/// Splits `PROJECTS_INIT`-style scripts into executable statements.
pub(crate) fn statements(script: &str) -> impl Iterator<Item = &str> {
    script.split(';').map(str::trim).filter(|s| !s.is_empty())
}
