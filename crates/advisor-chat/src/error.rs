//! Error types for the conversational dispatcher.

use advisor_core::error::AdvisorError;

/// Errors from the chat pipeline.
///
/// Only `MissingApiKey` is surfaced to callers of the dispatcher; every
/// other variant is converted to an apology string after being logged.
#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error("Gemini API key is not configured")]
    MissingApiKey,
    #[error("request failed: {0}")]
    Request(String),
    #[error("Gemini API error ({status}): {body}")]
    Api { status: u16, body: String },
    #[error("malformed model response: {0}")]
    MalformedResponse(String),
    #[error("tool '{name}' failed: {message}")]
    Tool { name: String, message: String },
    #[error("function-calling round limit reached after {0} rounds")]
    RoundLimit(usize),
}

impl From<reqwest::Error> for ChatError {
    fn from(err: reqwest::Error) -> Self {
        ChatError::Request(err.to_string())
    }
}

impl From<serde_json::Error> for ChatError {
    fn from(err: serde_json::Error) -> Self {
        ChatError::MalformedResponse(err.to_string())
    }
}

impl From<ChatError> for AdvisorError {
    fn from(err: ChatError) -> Self {
        AdvisorError::Model(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(
            ChatError::MissingApiKey.to_string(),
            "Gemini API key is not configured"
        );

        let err = ChatError::Api {
            status: 429,
            body: "quota exceeded".to_string(),
        };
        assert_eq!(err.to_string(), "Gemini API error (429): quota exceeded");

        let err = ChatError::Tool {
            name: "count_records".to_string(),
            message: "unknown entity type: Gadget".to_string(),
        };
        assert!(err.to_string().contains("count_records"));
        assert!(err.to_string().contains("Gadget"));
    }
}
