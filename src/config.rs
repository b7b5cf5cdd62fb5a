use crate::mailer::{DisabledMailer, Mailer, ResendMailer};
use crate::schemas::AppState;
use anyhow::Result;
use moka::future::Cache;
use sea_orm::Database;
use std::sync::Arc;
use std::time::Duration;

/// Initialize application configuration and state
pub async fn initialize_app_state_with_url(database_url: &str) -> Result<AppState> {
    // Load configuration
    dotenvy::dotenv().ok();

    // Connect to database
    tracing::info!("Connecting to database: {}", database_url);
    let db = Database::connect(database_url).await?;

    // Initialize cache
    let cache = Cache::builder()
        .max_capacity(1000)
        .time_to_live(Duration::from_secs(300)) // 5 minutes
        .build();

    let mailer = mailer_from_env();

    Ok(AppState { db, cache, mailer })
}

/// Build the outbound mailer from MAIL_API_KEY and MAIL_FROM. Without an
/// API key the mailer is disabled and dispatch requests report 503.
pub fn mailer_from_env() -> Arc<dyn Mailer> {
    match std::env::var("MAIL_API_KEY") {
        Ok(api_key) if !api_key.trim().is_empty() => {
            let from = std::env::var("MAIL_FROM")
                .unwrap_or_else(|_| "Aquadesk Reports <reports@aquadesk.app>".to_string());
            tracing::info!("Outbound mail enabled, sending as {}", from);
            Arc::new(ResendMailer::new(api_key, from))
        }
        _ => {
            tracing::warn!("MAIL_API_KEY is not set; report dispatch is disabled");
            Arc::new(DisabledMailer)
        }
    }
}
