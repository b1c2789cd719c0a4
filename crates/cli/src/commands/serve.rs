use anyhow::Result;
use shelfscore_http::{create_router, AppState};
use shelfscore_service::IngestConfig;
use std::sync::Arc;

use crate::{load_dataset, open_storage, StoreArgs};

pub(crate) async fn run(store: &StoreArgs, port: u16, host: String) -> Result<()> {
    let storage = Arc::new(open_storage(store).await?);
    // Ingestion endpoints take no parameters, so the dataset is fixed here.
    let dataset = Arc::new(load_dataset(store)?);
    let config = IngestConfig::from_env();
    tracing::info!(
        mode = %config.mode,
        score_mode = %config.score_mode,
        pacing_ms = config.pacing.as_millis(),
        "Ingestion configured"
    );

    let state = Arc::new(AppState::new(storage, dataset, config));
    let router = create_router(state);
    let addr = format!("{host}:{port}");
    tracing::info!("Starting HTTP server on {}", addr);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}
