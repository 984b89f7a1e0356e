pub mod routes;

use std::sync::Arc;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use sqlx::SqlitePool;
use tracing::{error, warn};

use crate::config::EngineConfig;
use crate::error::{Conflict, EngineError, Precondition};
use crate::services::responsiveness::ResponsivenessSource;

#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub config: Arc<EngineConfig>,
    pub responsiveness: Arc<dyn ResponsivenessSource>,
}

impl IntoResponse for EngineError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            EngineError::Precondition(p) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                match p {
                    Precondition::NoLocation => "no_location",
                    Precondition::IncompleteProfile => "incomplete_profile",
                },
                "complete your profile to see matches".to_string(),
            ),
            EngineError::Conflict(c) => (
                StatusCode::CONFLICT,
                match c {
                    Conflict::SelfSwipe => "self_swipe",
                    Conflict::DuplicateSignal => "already_recorded",
                    Conflict::BlockedPair => "blocked",
                },
                c.to_string(),
            ),
            EngineError::NotFound(what) => {
                (StatusCode::NOT_FOUND, "not_found", what.to_string())
            }
            EngineError::Transient(e) => {
                warn!("transient storage failure: {}", e);
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "transient",
                    "temporary failure, retry shortly".to_string(),
                )
            }
            EngineError::Integrity(msg) => {
                error!("data integrity violation: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "integrity",
                    "internal error".to_string(),
                )
            }
        };
        (
            status,
            Json(serde_json::json!({ "error": code, "message": message })),
        )
            .into_response()
    }
}
