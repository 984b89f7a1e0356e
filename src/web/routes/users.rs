use axum::extract::{Path, State};
use axum::Json;
use serde::Deserialize;

use crate::database::user_repo;
use crate::error::EngineError;
use crate::services::feed_service;
use crate::web::AppState;

#[derive(Debug, Deserialize)]
pub struct LocationUpdate {
    pub latitude: f64,
    pub longitude: f64,
}

/// Profile-store write-through. Moving invalidates the cached feed; the
/// next request recomputes against the new point.
pub async fn update_location_handler(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Json(update): Json<LocationUpdate>,
) -> Result<Json<serde_json::Value>, EngineError> {
    let updated =
        user_repo::update_location(&state.pool, &user_id, update.latitude, update.longitude)
            .await?;
    if !updated {
        return Err(EngineError::not_found(format!("user {}", user_id)));
    }
    feed_service::invalidate_for(&state.pool, &user_id).await?;
    Ok(Json(serde_json::json!({ "status": "ok" })))
}

#[derive(Debug, Deserialize)]
pub struct PreferencesUpdate {
    pub min_age: i64,
    pub max_age: i64,
    /// None means "any gender".
    pub interested_genders: Option<Vec<String>>,
    pub max_distance_km: f64,
}

pub async fn update_preferences_handler(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Json(update): Json<PreferencesUpdate>,
) -> Result<Json<serde_json::Value>, EngineError> {
    if user_repo::get_user(&state.pool, &user_id).await?.is_none() {
        return Err(EngineError::not_found(format!("user {}", user_id)));
    }

    let genders_json = update
        .interested_genders
        .as_ref()
        .map(|g| serde_json::to_string(g).unwrap_or_else(|_| "[]".to_string()));
    user_repo::upsert_preferences(
        &state.pool,
        user_repo::NewPreferences {
            user_id: &user_id,
            min_age: update.min_age,
            max_age: update.max_age,
            interested_genders: genders_json.as_deref(),
            max_distance_km: update.max_distance_km,
        },
    )
    .await?;
    feed_service::invalidate_for(&state.pool, &user_id).await?;
    Ok(Json(serde_json::json!({ "status": "ok" })))
}
