use dotenvy::dotenv;
use sqlx::sqlite::SqlitePoolOptions;
use std::env;

use ember::config::EngineConfig;
use ember::database::schema;
use ember::services::{precompute_service, responsiveness};

/// One-shot cache refresh batch, for cron jobs and manual runs. Resumes
/// from the stored cursor, so repeated invocations walk the whole user base.
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

    let config = EngineConfig::from_env();
    let source = responsiveness::from_env(config.responsiveness_timeout);

    match precompute_service::run_sweep(&pool, &config, source.as_ref()).await {
        Ok(report) => {
            println!(
                "precompute sweep: scanned={}, refreshed={}, skipped={}, failed={}, wrapped={}",
                report.scanned, report.refreshed, report.skipped, report.failed, report.wrapped
            );
        }
        Err(e) => {
            eprintln!("precompute sweep failed: {}", e);
            std::process::exit(1);
        }
    }
}
