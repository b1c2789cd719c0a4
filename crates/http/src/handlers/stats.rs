use axum::{extract::State, Json};
use std::sync::Arc;

use shelfscore_storage::CatalogStats;

use crate::api_error::ApiError;
use crate::AppState;

pub async fn get_stats(State(state): State<Arc<AppState>>) -> Result<Json<CatalogStats>, ApiError> {
    Ok(Json(state.catalog.stats().await?))
}
