use axum::{
    extract::{Path, Query, State},
    Json,
};
use std::sync::Arc;

use shelfscore_core::{Book, CriticReview, ScoreSummary};
use shelfscore_storage::PaginatedResult;

use crate::api_error::ApiError;
use crate::query_types::BooksQuery;
use crate::AppState;

pub async fn list_books(
    State(state): State<Arc<AppState>>,
    Query(query): Query<BooksQuery>,
) -> Result<Json<PaginatedResult<Book>>, ApiError> {
    let query = query.into_book_query()?;
    Ok(Json(state.catalog.list_books(&query).await?))
}

pub async fn get_book(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Book>, ApiError> {
    Ok(Json(state.catalog.get_book(&id).await?))
}

pub async fn get_book_reviews(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Vec<CriticReview>>, ApiError> {
    Ok(Json(state.catalog.reviews_for_book(&id).await?))
}

/// Recompute one book's score from its current reviews.
pub async fn recompute_score(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ScoreSummary>, ApiError> {
    Ok(Json(state.scores.recompute(&id).await?))
}
