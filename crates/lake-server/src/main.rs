use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use lake_config::AppConfig;
use lake_ingest::{BhuvanDirectory, LakeCatalog, WaterQualityCsv};
use lake_server::Sources;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Observability
    lake_obs::init("lakewatch");

    // Config
    let cfg = AppConfig::load().context("failed to load configuration")?;
    let http_bind = cfg.http_bind();

    let catalog = Arc::new(
        LakeCatalog::builtin()
            .with_aliases(cfg.lake_aliases())
            .with_bhuvan_ids(cfg.lake_bhuvan_ids()),
    );
    tracing::info!(
        lakes = catalog.lake_ids().len(),
        bhuvan_dir = %cfg.bhuvan_dir().display(),
        water_quality_csv = %cfg.water_quality_csv().display(),
        "Lake catalog ready"
    );

    // Build app and state
    let sources = Sources {
        catalog: Arc::clone(&catalog),
        area_source: Arc::new(BhuvanDirectory::new(cfg.bhuvan_dir())),
        reading_source: Arc::new(WaterQualityCsv::new(cfg.water_quality_csv(), catalog)),
        boundary_years: cfg.boundary_years(),
    };
    let (app, state) = lake_server::build_app(sources)?;

    // Start HTTP server
    let addr: SocketAddr = http_bind
        .parse()
        .with_context(|| format!("invalid HTTP bind address: {http_bind}"))?;
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    // Mark ready just before serving
    lake_server::set_ready(&state, true);

    tracing::info!(%addr, "HTTP server listening");
    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
