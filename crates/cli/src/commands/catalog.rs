use anyhow::Result;
use shelfscore_core::{BookQuery, BookSort};
use shelfscore_service::CatalogService;
use std::sync::Arc;

use crate::{open_storage, StoreArgs};

async fn catalog(store: &StoreArgs) -> Result<CatalogService> {
    Ok(CatalogService::new(Arc::new(open_storage(store).await?)))
}

pub(crate) async fn run_books(
    store: &StoreArgs,
    genre: Option<String>,
    sort: &str,
    limit: usize,
    offset: usize,
) -> Result<()> {
    let sort = sort.parse::<BookSort>().map_err(anyhow::Error::msg)?;
    let query = BookQuery { genre, sort, limit, offset };
    let page = catalog(store).await?.list_books(&query).await?;
    println!("{}", serde_json::to_string_pretty(&page)?);
    Ok(())
}

pub(crate) async fn run_reviews(store: &StoreArgs, id: &str) -> Result<()> {
    let reviews = catalog(store).await?.reviews_for_book(id).await?;
    println!("{}", serde_json::to_string_pretty(&reviews)?);
    Ok(())
}

pub(crate) async fn run_stats(store: &StoreArgs) -> Result<()> {
    let stats = catalog(store).await?.stats().await?;
    println!("{}", serde_json::to_string_pretty(&stats)?);
    Ok(())
}
