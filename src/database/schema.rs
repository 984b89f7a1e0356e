use sqlx::SqlitePool;

/// Idempotent schema bootstrap. Applied at startup and by the test fixtures;
/// every statement is IF NOT EXISTS so re-running is harmless.
const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    user_id TEXT PRIMARY KEY,
    name TEXT,
    gender TEXT,
    city TEXT,
    main_photo_url TEXT,
    bio TEXT,
    photo_count INTEGER NOT NULL DEFAULT 0,
    birth_date TEXT,
    latitude REAL,
    longitude REAL,
    is_verified INTEGER NOT NULL DEFAULT 0,
    is_active INTEGER NOT NULL DEFAULT 1,
    created_at TEXT NOT NULL,
    last_active_at TEXT
);

CREATE INDEX IF NOT EXISTS idx_users_lat_lon ON users (latitude, longitude);

CREATE TABLE IF NOT EXISTS user_preferences (
    user_id TEXT PRIMARY KEY,
    min_age INTEGER NOT NULL,
    max_age INTEGER NOT NULL,
    interested_genders TEXT,
    max_distance_km REAL NOT NULL
);

CREATE TABLE IF NOT EXISTS swipes (
    swipe_id TEXT PRIMARY KEY,
    actor_id TEXT NOT NULL,
    target_id TEXT NOT NULL,
    disposition TEXT NOT NULL,
    created_at TEXT NOT NULL,
    UNIQUE (actor_id, target_id)
);

CREATE INDEX IF NOT EXISTS idx_swipes_target ON swipes (target_id, actor_id);

CREATE TABLE IF NOT EXISTS blocks (
    block_id TEXT PRIMARY KEY,
    blocker_id TEXT NOT NULL,
    blocked_id TEXT NOT NULL,
    created_at TEXT NOT NULL,
    UNIQUE (blocker_id, blocked_id)
);

CREATE INDEX IF NOT EXISTS idx_blocks_blocked ON blocks (blocked_id, blocker_id);

CREATE TABLE IF NOT EXISTS matches (
    match_id TEXT PRIMARY KEY,
    pair_key TEXT NOT NULL UNIQUE,
    user_a TEXT NOT NULL,
    user_b TEXT NOT NULL,
    status TEXT NOT NULL DEFAULT 'active',
    created_at TEXT NOT NULL,
    ended_at TEXT,
    ended_by TEXT
);

CREATE TABLE IF NOT EXISTS candidate_cache (
    viewer_id TEXT PRIMARY KEY,
    payload TEXT NOT NULL,
    generated_at TEXT NOT NULL,
    expires_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS match_events (
    event_id TEXT PRIMARY KEY,
    event_type TEXT NOT NULL,
    match_id TEXT NOT NULL,
    payload TEXT NOT NULL,
    created_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS precompute_cursor (
    id INTEGER PRIMARY KEY CHECK (id = 1),
    last_user_id TEXT NOT NULL DEFAULT '',
    updated_at TEXT NOT NULL
);
"#;

pub async fn ensure_schema(pool: &SqlitePool) -> sqlx::Result<()> {
    sqlx::raw_sql(SCHEMA).execute(pool).await?;
    Ok(())
}
