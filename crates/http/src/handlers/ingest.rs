//! Ingestion triggers. Each call replaces its table from the dataset the
//! server was started with; a fatal run answers 500 with `success: false`.

use axum::{extract::State, http::StatusCode, Json};
use std::sync::Arc;

use crate::response_types::{CombinedIngestResponse, IngestResponse};
use crate::AppState;

pub async fn ingest_books(State(state): State<Arc<AppState>>) -> (StatusCode, Json<IngestResponse>) {
    match state.ingestion.ingest_books().await {
        Ok(report) => (StatusCode::OK, Json(report.into())),
        Err(e) => {
            tracing::error!(error = %e, "Book ingestion failed");
            (StatusCode::INTERNAL_SERVER_ERROR, Json(IngestResponse::failed(&e)))
        },
    }
}

pub async fn ingest_reviews(
    State(state): State<Arc<AppState>>,
) -> (StatusCode, Json<IngestResponse>) {
    match state.ingestion.ingest_reviews().await {
        Ok(report) => (StatusCode::OK, Json(report.into())),
        Err(e) => {
            tracing::error!(error = %e, "Review ingestion failed");
            (StatusCode::INTERNAL_SERVER_ERROR, Json(IngestResponse::failed(&e)))
        },
    }
}

pub async fn ingest_all(
    State(state): State<Arc<AppState>>,
) -> (StatusCode, Json<CombinedIngestResponse>) {
    match state.ingestion.ingest_all().await {
        Ok(report) => (StatusCode::OK, Json(report.into())),
        Err(e) => {
            tracing::error!(error = %e, "Combined ingestion failed");
            (StatusCode::INTERNAL_SERVER_ERROR, Json(CombinedIngestResponse::failed(&e)))
        },
    }
}
