use axum::extract::State;
use axum::Json;
use serde::Deserialize;

use crate::error::EngineError;
use crate::models::Disposition;
use crate::services::swipe_service::{self, SwipeOutcome};
use crate::web::AppState;

#[derive(Debug, Deserialize)]
pub struct SwipeRequest {
    pub actor_id: String,
    pub target_id: String,
    pub disposition: Disposition,
}

/// The response always says whether a match was created, so the client can
/// open the match UI immediately.
pub async fn record_swipe_handler(
    State(state): State<AppState>,
    Json(req): Json<SwipeRequest>,
) -> Result<Json<SwipeOutcome>, EngineError> {
    let outcome = swipe_service::record_swipe(
        &state.pool,
        &req.actor_id,
        &req.target_id,
        req.disposition,
    )
    .await?;
    Ok(Json(outcome))
}
