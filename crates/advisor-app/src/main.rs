//! Advisor application binary - composition root.
//!
//! Ties together all Advisor crates into a single executable:
//! 1. Load configuration from TOML, apply CLI overrides
//! 2. Open the SQLite snapshot store and run migrations
//! 3. Build the analytics service and Gemini chat dispatcher
//! 4. Start the daily insight scheduler
//! 5. Start the axum REST API server

mod cli;

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;

use advisor_analytics::AnalyticsService;
use advisor_api::{load_or_generate_token, start_server, AppState};
use advisor_chat::{ChatDispatcher, GeminiClient, GeminiSettings, ToolRegistry};
use advisor_core::config::AdvisorConfig;
use advisor_insight::{DailyInsightJob, SmtpMailer};
use advisor_store::Database;

use cli::CliArgs;

/// Expand ~ to home directory in a path string.
fn resolve_data_dir(data_dir: &str) -> PathBuf {
    if data_dir.starts_with("~/") || data_dir.starts_with("~\\") {
        #[cfg(target_os = "windows")]
        let home = std::env::var("USERPROFILE").unwrap_or_else(|_| ".".to_string());
        #[cfg(not(target_os = "windows"))]
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
        PathBuf::from(home).join(&data_dir[2..])
    } else {
        PathBuf::from(data_dir)
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = CliArgs::parse();

    // Config.
    let config_file = args.resolve_config_path();
    let mut config = AdvisorConfig::load_or_default(&config_file);
    config.server.port = args.resolve_port(config.server.port);
    if let Some(dir) = args.resolve_data_dir() {
        config.general.data_dir = dir;
    }
    if let Some(level) = args.resolve_log_level() {
        config.general.log_level = level;
    }

    // Tracing.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.general.log_level)),
        )
        .init();

    tracing::info!("Starting Advisor v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!(path = %config_file.display(), "Configuration loaded");

    // Storage.
    let data_dir = resolve_data_dir(&config.general.data_dir);
    if let Err(e) = std::fs::create_dir_all(&data_dir) {
        tracing::error!(path = %data_dir.display(), error = %e, "Failed to create data directory");
        return Err(e.into());
    }

    let db_path = data_dir.join("advisor.db");
    let db = Arc::new(Database::new(&db_path)?);
    tracing::info!(path = %db_path.display(), "SQLite snapshot store opened");

    // Analytics + chat dispatcher.
    let analytics = Arc::new(AnalyticsService::new(Arc::clone(&db)));
    let backend = GeminiClient::new(
        &config.gemini.base_url,
        &config.gemini.api_key,
        config.gemini.timeout_secs,
    )?;
    let dispatcher = Arc::new(ChatDispatcher::new(
        Arc::new(backend),
        ToolRegistry::new(Arc::clone(&analytics)),
        GeminiSettings::new(config.gemini.api_key.clone(), &config.gemini.model),
    ));
    tracing::info!(model = %config.gemini.model, "Chat dispatcher ready");

    // Daily insight scheduler. An unreachable SMTP relay is not fatal to
    // the chat service.
    match SmtpMailer::new(&config.insight) {
        Ok(mailer) => {
            let job = Arc::new(DailyInsightJob::new(
                Arc::clone(&db),
                Arc::clone(&dispatcher),
                Arc::new(mailer),
                config.insight.clone(),
            ));
            tokio::spawn(async move {
                job.run_scheduled().await;
            });
        }
        Err(e) => {
            tracing::warn!(error = %e, "SMTP mailer unavailable, insight scheduler not started");
        }
    }

    // API server.
    let api_token = load_or_generate_token(&data_dir.join("api_token"));
    let state = AppState::new(config, dispatcher, api_token);
    start_server(state).await?;

    Ok(())
}
