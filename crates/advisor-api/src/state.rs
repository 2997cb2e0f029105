//! Application state shared across route handlers.

use std::sync::Arc;
use std::time::Instant;

use advisor_chat::ChatDispatcher;
use advisor_core::config::AdvisorConfig;

/// Shared state, cheap to clone into handler tasks.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AdvisorConfig>,
    pub dispatcher: Arc<ChatDispatcher>,
    /// Bearer token protected endpoints require.
    pub api_token: String,
    /// Server start time for uptime reporting.
    pub start_time: Instant,
}

impl AppState {
    pub fn new(config: AdvisorConfig, dispatcher: Arc<ChatDispatcher>, api_token: String) -> Self {
        Self {
            config: Arc::new(config),
            dispatcher,
            api_token,
            start_time: Instant::now(),
        }
    }
}
