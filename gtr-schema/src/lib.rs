pub mod project;

pub use project::{Funder, Project, ProjectEnvelope, raw_project_id};
