use std::env;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::routing::{get, post, put};
use axum::Router;
use dotenvy::dotenv;
use sqlx::sqlite::SqlitePoolOptions;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use ember::config::EngineConfig;
use ember::database::schema;
use ember::services::{precompute_service, responsiveness};
use ember::web::routes::{feed, matches, swipes, users};
use ember::web::AppState;

#[tokio::main]
async fn main() {
    dotenv().ok();
    tracing_subscriber::fmt::init();

    let db_url = env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let pool = SqlitePoolOptions::new()
        .connect(&db_url)
        .await
        .expect("cannot connect to database");
    schema::ensure_schema(&pool)
        .await
        .expect("cannot apply schema");

    let config = Arc::new(EngineConfig::from_env());
    let state = AppState {
        pool: pool.clone(),
        responsiveness: responsiveness::from_env(config.responsiveness_timeout),
        config: config.clone(),
    };

    // Off-peak in spirit: a low-priority loop that refreshes caches for
    // active users between live requests.
    {
        let state = state.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(state.config.precompute_interval);
            loop {
                interval.tick().await;
                match precompute_service::run_sweep(
                    &state.pool,
                    &state.config,
                    state.responsiveness.as_ref(),
                )
                .await
                {
                    Ok(report) => info!(
                        "precompute sweep: scanned={} refreshed={} skipped={} failed={} wrapped={}",
                        report.scanned,
                        report.refreshed,
                        report.skipped,
                        report.failed,
                        report.wrapped
                    ),
                    Err(e) => warn!("precompute sweep failed: {}", e),
                }
            }
        });
    }

    let app = Router::new()
        .route("/users/:user_id/feed", get(feed::feed_handler))
        .route("/users/:user_id/location", put(users::update_location_handler))
        .route(
            "/users/:user_id/preferences",
            put(users::update_preferences_handler),
        )
        .route("/swipes", post(swipes::record_swipe_handler))
        .route("/matches/:match_id/unmatch", post(matches::unmatch_handler))
        .layer(TraceLayer::new_for_http())
        .layer(CatchPanicLayer::new())
        .with_state(state);

    let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
    let port: u16 = env::var("PORT")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(3000);
    let addr: SocketAddr = format!("{}:{}", host, port)
        .parse()
        .expect("cannot parse host/port");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("cannot bind listener");
    info!("engine listening on http://{}", addr);

    axum::serve(listener, app).await.unwrap();
}
