use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use uuid::Uuid;

pub const EVENT_MATCH_CREATED: &str = "match.created";
pub const EVENT_MATCH_ENDED: &str = "match.ended";

/// Outbox row for the notification/chat subsystems. Events are appended
/// here and drained externally; the engine never consumes them itself.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct MatchEventRow {
    pub event_id: String,
    pub event_type: String,
    pub match_id: String,
    pub payload: String,
    pub created_at: DateTime<Utc>,
}

const SQL_INSERT_EVENT: &str = r#"
INSERT INTO match_events (event_id, event_type, match_id, payload, created_at)
VALUES (?1, ?2, ?3, ?4, ?5)
"#;

pub async fn insert_event(
    pool: &SqlitePool,
    event_type: &str,
    match_id: &str,
    payload: &serde_json::Value,
    created_at: DateTime<Utc>,
) -> sqlx::Result<()> {
    sqlx::query(SQL_INSERT_EVENT)
        .bind(Uuid::new_v4().to_string())
        .bind(event_type)
        .bind(match_id)
        .bind(payload.to_string())
        .bind(created_at)
        .execute(pool)
        .await?;
    Ok(())
}

pub async fn list_events_for_match(
    pool: &SqlitePool,
    match_id: &str,
) -> sqlx::Result<Vec<MatchEventRow>> {
    sqlx::query_as::<_, MatchEventRow>(
        "SELECT event_id, event_type, match_id, payload, created_at \
         FROM match_events WHERE match_id = ?1 ORDER BY created_at, event_id",
    )
    .bind(match_id)
    .fetch_all(pool)
    .await
}
