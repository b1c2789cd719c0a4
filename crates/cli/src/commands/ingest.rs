use anyhow::{Context, Result};
use shelfscore_http::{CombinedIngestResponse, IngestResponse};
use shelfscore_service::{IngestConfig, IngestionService, ScoreService};
use std::sync::Arc;

use crate::{load_dataset, open_storage, RunTarget, StoreArgs};

/// Run one ingestion locally and print the same JSON the HTTP endpoint returns.
pub(crate) async fn run_ingest(store: &StoreArgs, target: RunTarget) -> Result<()> {
    let storage = Arc::new(open_storage(store).await?);
    let dataset = Arc::new(load_dataset(store)?);
    let service = IngestionService::new(storage, dataset, IngestConfig::from_env());

    let (body, outcome) = match target {
        RunTarget::Books => match service.ingest_books().await {
            Ok(report) => (serde_json::to_value(IngestResponse::from(report))?, Ok(())),
            Err(e) => (serde_json::to_value(IngestResponse::failed(&e))?, Err(e)),
        },
        RunTarget::Reviews => match service.ingest_reviews().await {
            Ok(report) => (serde_json::to_value(IngestResponse::from(report))?, Ok(())),
            Err(e) => (serde_json::to_value(IngestResponse::failed(&e))?, Err(e)),
        },
        RunTarget::All => match service.ingest_all().await {
            Ok(report) => (serde_json::to_value(CombinedIngestResponse::from(report))?, Ok(())),
            Err(e) => (serde_json::to_value(CombinedIngestResponse::failed(&e))?, Err(e)),
        },
    };
    println!("{}", serde_json::to_string_pretty(&body)?);
    outcome.context("ingestion run aborted")
}

pub(crate) async fn run_recompute(store: &StoreArgs, id: Option<String>, all: bool) -> Result<()> {
    let storage = Arc::new(open_storage(store).await?);
    let scores = ScoreService::new(storage, IngestConfig::from_env().score_mode);

    if all {
        let batch = scores.recompute_all().await?;
        let body = serde_json::json!({ "updated": batch.updated, "failures": batch.failures });
        println!("{}", serde_json::to_string_pretty(&body)?);
        return Ok(());
    }
    let id = id.context("book id or --all required")?;
    let summary = scores.recompute(&id).await?;
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}
