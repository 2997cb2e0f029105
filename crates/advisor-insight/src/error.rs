//! Error types for the daily insight job.

use advisor_core::error::AdvisorError;

#[derive(Debug, thiserror::Error)]
pub enum InsightError {
    #[error("SMTP error: {0}")]
    Smtp(String),
    #[error("failed to build message: {0}")]
    Message(String),
    #[error("storage error: {0}")]
    Storage(String),
    #[error("chat error: {0}")]
    Chat(String),
}

impl From<AdvisorError> for InsightError {
    fn from(err: AdvisorError) -> Self {
        InsightError::Storage(err.to_string())
    }
}

impl From<InsightError> for AdvisorError {
    fn from(err: InsightError) -> Self {
        AdvisorError::Insight(err.to_string())
    }
}
