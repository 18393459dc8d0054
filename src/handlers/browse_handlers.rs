//! HTTP handlers for the browsing API.
//!
//! Thin translation from query parameters to service calls; all listing and
//! access logic lives in the service layer.

use axum::{
    Json,
    extract::{Query, State},
};
use serde::Deserialize;

use crate::errors::AppError;
use crate::models::access::{AccessGrant, Disposition};
use crate::models::listing::ListingResult;
use crate::models::page::DEFAULT_ITEMS_PER_PAGE;
use crate::services::AppState;
use crate::services::listing::ListingParams;

/// Query params accepted by `GET /api/browse`.
#[derive(Debug, Deserialize)]
pub struct BrowseQuery {
    pub prefix: Option<String>,
    #[serde(rename = "foldersPage", default = "default_page")]
    pub folders_page: usize,
    #[serde(rename = "filesPage", default = "default_page")]
    pub files_page: usize,
    #[serde(rename = "itemsPerPage", default = "default_items_per_page")]
    pub items_per_page: usize,
}

fn default_page() -> usize {
    1
}

fn default_items_per_page() -> usize {
    DEFAULT_ITEMS_PER_PAGE
}

/// Query params accepted by `GET /api/access`.
#[derive(Debug, Deserialize)]
pub struct AccessQuery {
    pub key: String,
    #[serde(default)]
    pub disposition: Disposition,
}

/// GET `/api/browse` — one page of folders and files under a prefix.
pub async fn browse(
    State(state): State<AppState>,
    Query(q): Query<BrowseQuery>,
) -> Result<Json<ListingResult>, AppError> {
    let params = ListingParams {
        prefix: q.prefix,
        folders_page: q.folders_page,
        files_page: q.files_page,
        items_per_page: q.items_per_page,
    };
    let result = state.listing.list(params).await?;
    Ok(Json(result))
}

/// GET `/api/access` — metadata plus a time-limited signed link for one
/// object.
pub async fn get_access(
    State(state): State<AppState>,
    Query(q): Query<AccessQuery>,
) -> Result<Json<AccessGrant>, AppError> {
    let grant = state.access.grant(&q.key, q.disposition).await?;
    Ok(Json(grant))
}
