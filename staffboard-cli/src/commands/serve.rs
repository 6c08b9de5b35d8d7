//! Serve command - run the HTTP API

use clap::Args;
use staffboard_api::AppState;
use staffboard_core::{Config, FallbackPool};
use staffboard_db::Database;

/// Arguments for the serve command
#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Address to listen on (overrides config and env)
    #[arg(short, long)]
    pub bind: Option<String>,
}

impl ServeArgs {
    /// Execute the serve command
    pub async fn execute(&self, config: &Config) -> anyhow::Result<()> {
        let db = Database::open(&config.database)
            .await
            .map_err(|e| anyhow::anyhow!("Failed to open database: {}", e))?;

        let state = AppState::new(db.clone(), FallbackPool::from_config(&config.reviews));
        tracing::info!(
            generic_reviews = state.selector.fallback().reviews().len(),
            timeout = ?config.server.request_timeout,
            "Starting review API"
        );

        staffboard_api::serve(&config.server, state).await?;

        db.close().await;
        Ok(())
    }
}
