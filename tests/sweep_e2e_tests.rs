mod common;

use axum::{
    Json, Router,
    extract::{Query, State},
    routing::get,
};
use serde_json::{Value, json};
use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
    time::Duration,
};
use ukri_harvest::error::{FetchError, PageError};
use ukri_harvest::store::SqliteProjectStore;
use ukri_harvest::{GtrClient, Harvester, ProjectStore, SweepPlan};

use common::{remove_sqlite_files, spawn_test_server, unique_sqlite_path};

const TOTAL_PROJECTS: u64 = 1_000;
const STALLED_OFFSET: u64 = 300;

#[derive(Clone, Default)]
struct FakeGtr {
    starts: Arc<Mutex<Vec<u64>>>,
}

async fn projects_handler(
    State(state): State<FakeGtr>,
    Query(query): Query<HashMap<String, String>>,
) -> Json<Value> {
    let start: u64 = query.get("start").and_then(|s| s.parse().ok()).unwrap_or(0);
    let size: u64 = query
        .get("fetchSize")
        .and_then(|s| s.parse().ok())
        .unwrap_or(20);
    state.starts.lock().unwrap().push(start);

    if start == STALLED_OFFSET {
        tokio::time::sleep(Duration::from_secs(5)).await;
    }

    let end = (start + size).min(TOTAL_PROJECTS);
    let project: Vec<Value> = (start..end)
        .map(|i| {
            let funders = if i % 3 == 0 {
                json!([])
            } else {
                json!([{"name": "UKRI"}, {"name": "Other"}])
            };
            json!({
                "id": format!("GTR-{i:04}"),
                "title": format!("Project {i}"),
                "status": if i % 2 == 0 { "Active" } else { "Closed" },
                "abstractText": format!("Abstract {i}"),
                "funders": funders
            })
        })
        .collect();

    Json(json!({
        "project": project,
        "page": start / size + 1,
        "size": size,
        "totalPages": TOTAL_PROJECTS.div_ceil(size),
        "totalSize": TOTAL_PROJECTS
    }))
}

#[tokio::test]
async fn sweep_survives_a_stalled_page_and_is_idempotent() {
    let state = FakeGtr::default();
    let app = Router::new()
        .route("/gtr/api/projects", get(projects_handler))
        .with_state(state.clone());
    let base = spawn_test_server(app).await;

    let db_path = unique_sqlite_path("sweep");
    let store = SqliteProjectStore::new(&db_path, Duration::from_secs(5));
    store.apply_schema().await.unwrap();

    let client = GtrClient::with_base_url(&base, Duration::from_millis(300)).unwrap();
    let harvester = Harvester::new(client, store, SweepPlan::default());

    let first = harvester.run().await;

    assert_eq!(
        *state.starts.lock().unwrap(),
        vec![0, 100, 200, 300, 400, 500, 600, 700, 800, 900]
    );
    assert_eq!(first.pages_requested, 10);
    assert_eq!(first.failed_offsets(), vec![STALLED_OFFSET]);
    assert!(matches!(
        &first.failed_pages[0].error,
        PageError::Fetch(FetchError::Transport(e)) if e.is_timeout()
    ));
    assert_eq!(first.inserted, 900);
    let after_first = harvester.store().count_rows().await.unwrap();
    assert_eq!(after_first, 900);

    let funded = harvester.store().get_row("GTR-0001").await.unwrap().unwrap();
    assert_eq!(funded.funder.as_deref(), Some("UKRI"));
    let unfunded = harvester.store().get_row("GTR-0003").await.unwrap().unwrap();
    assert_eq!(unfunded.funder, None);

    let second = harvester.run().await;

    assert_eq!(second.inserted, 0);
    assert_eq!(second.already_present, 900);
    assert_eq!(harvester.store().count_rows().await.unwrap(), after_first);

    remove_sqlite_files(&db_path).await;
}
