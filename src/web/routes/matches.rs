use axum::extract::{Path, State};
use axum::Json;
use serde::Deserialize;

use crate::error::EngineError;
use crate::services::swipe_service;
use crate::web::AppState;

#[derive(Debug, Deserialize)]
pub struct UnmatchRequest {
    pub user_id: String,
}

pub async fn unmatch_handler(
    State(state): State<AppState>,
    Path(match_id): Path<String>,
    Json(req): Json<UnmatchRequest>,
) -> Result<Json<serde_json::Value>, EngineError> {
    swipe_service::unmatch(&state.pool, &req.user_id, &match_id).await?;
    Ok(Json(serde_json::json!({ "status": "ended" })))
}
