use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;

use crate::error::EngineError;
use crate::models::CandidateFeed;
use crate::services::feed_service;
use crate::web::AppState;

#[derive(Debug, Deserialize, Default)]
pub struct FeedQuery {
    pub page_size: Option<usize>,
}

pub async fn feed_handler(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Query(query): Query<FeedQuery>,
) -> Result<Json<CandidateFeed>, EngineError> {
    let page_size = query
        .page_size
        .unwrap_or(state.config.default_page_size)
        .clamp(1, 100);
    let feed = feed_service::get_feed(
        &state.pool,
        &state.config,
        state.responsiveness.as_ref(),
        &user_id,
        page_size,
    )
    .await?;
    Ok(Json(feed))
}
