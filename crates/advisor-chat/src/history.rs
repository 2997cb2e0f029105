//! Lenient parsing of caller-supplied conversation history.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::protocol::Content;

/// One prior conversation turn as the caller supplies it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Turn {
    pub role: String,
    pub content: String,
}

/// Parse a JSON history array. Malformed input degrades to an empty
/// history with a warning; the chat must not fail because a front end
/// sent a bad transcript.
pub fn parse_history(raw: Option<&str>) -> Vec<Turn> {
    let Some(raw) = raw else {
        return Vec::new();
    };
    if raw.trim().is_empty() {
        return Vec::new();
    }
    match serde_json::from_str::<Vec<Turn>>(raw) {
        Ok(turns) => turns,
        Err(e) => {
            warn!(error = %e, "discarding malformed chat history");
            Vec::new()
        }
    }
}

/// Convert turns to wire contents. Any role other than "user" is treated
/// as the model's side.
pub fn to_contents(turns: &[Turn]) -> Vec<Content> {
    turns
        .iter()
        .map(|turn| {
            if turn.role == "user" {
                Content::user_text(&turn.content)
            } else {
                Content::model_text(&turn.content)
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_none_and_empty_are_empty() {
        assert!(parse_history(None).is_empty());
        assert!(parse_history(Some("")).is_empty());
        assert!(parse_history(Some("   ")).is_empty());
    }

    #[test]
    fn test_valid_history() {
        let raw = r#"[{"role": "user", "content": "hi"}, {"role": "model", "content": "hello"}]"#;
        let turns = parse_history(Some(raw));
        assert_eq!(turns.len(), 2);
        assert_eq!(turns[0].role, "user");
        assert_eq!(turns[1].content, "hello");
    }

    #[test]
    fn test_malformed_history_degrades_to_empty() {
        assert!(parse_history(Some("not json")).is_empty());
        assert!(parse_history(Some("{\"role\": \"user\"}")).is_empty());
        assert!(parse_history(Some("[{\"role\": 7}]")).is_empty());
    }

    #[test]
    fn test_to_contents_maps_roles() {
        let turns = vec![
            Turn {
                role: "user".to_string(),
                content: "hi".to_string(),
            },
            Turn {
                role: "assistant".to_string(),
                content: "hello".to_string(),
            },
        ];
        let contents = to_contents(&turns);
        assert_eq!(contents[0].role, "user");
        assert_eq!(contents[1].role, "model");
        assert_eq!(contents[1].text(), "hello");
    }
}
