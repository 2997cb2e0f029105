//! Error types for the analytics query layer.

use advisor_core::error::AdvisorError;

/// Errors from analytics queries.
///
/// `UnknownEntity` and `InvalidField` are caller configuration errors
/// (the model asked for something that does not exist); they are surfaced
/// as-is with no retry or partial-result policy.
#[derive(Debug, thiserror::Error)]
pub enum AnalyticsError {
    #[error("unknown entity type: {0}")]
    UnknownEntity(String),
    #[error("invalid field name: {0}")]
    InvalidField(String),
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("storage error: {0}")]
    Storage(String),
}

impl From<AdvisorError> for AnalyticsError {
    fn from(err: AdvisorError) -> Self {
        AnalyticsError::Storage(err.to_string())
    }
}

impl From<AnalyticsError> for AdvisorError {
    fn from(err: AnalyticsError) -> Self {
        AdvisorError::Analytics(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = AnalyticsError::UnknownEntity("Gadget".to_string());
        assert_eq!(err.to_string(), "unknown entity type: Gadget");

        let err = AnalyticsError::InvalidField("1; DROP TABLE".to_string());
        assert_eq!(err.to_string(), "invalid field name: 1; DROP TABLE");

        let err = AnalyticsError::Storage("no such column".to_string());
        assert_eq!(err.to_string(), "storage error: no such column");
    }

    #[test]
    fn test_round_trip_through_advisor_error() {
        let err = AnalyticsError::UnknownEntity("Widget".to_string());
        let top: AdvisorError = err.into();
        assert!(top.to_string().contains("unknown entity type: Widget"));

        let back: AnalyticsError = top.into();
        assert!(matches!(back, AnalyticsError::Storage(_)));
    }
}
