use mimalloc::MiMalloc;
use tracing::{info, warn};
use ukri_harvest::config::DatabaseBackend;
use ukri_harvest::utils::logging::init_logging;
use ukri_harvest::{AnyProjectStore, Config, GtrClient, Harvester, ProjectStore, SweepPlan};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let cfg = Config::load()?;
    init_logging(&cfg.basic.loglevel);

    match cfg.database.backend() {
        DatabaseBackend::Postgres => info!(
            host = %cfg.database.host,
            port = cfg.database.port,
            database = %cfg.database.name,
            user = %cfg.database.user,
            sslmode = "require",
            "Using Postgres store"
        ),
        DatabaseBackend::Sqlite(path) => info!(path = %path.display(), "Using SQLite store"),
    }

    let store = AnyProjectStore::from_config(&cfg.database);
    if cfg.database.apply_schema {
        if let Err(e) = store.apply_schema().await {
            warn!(error = %e, "Could not ensure ukri_projects exists; continuing");
        }
    }

    let client = GtrClient::new()?;
    info!(url = %client.projects_url(), "GtR endpoint");

    let report = Harvester::new(client, store, SweepPlan::default()).run().await;
    if !report.failed_pages.is_empty() {
        warn!(
            offsets = ?report.failed_offsets(),
            "Some pages were skipped; re-run to retry them"
        );
    }
    Ok(())
}
