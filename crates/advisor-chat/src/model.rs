//! Model selection: user-facing labels mapped to Gemini model ids.

/// The Gemini models the advisor can run on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelKind {
    Flash20,
    Pro20,
    Flash25,
    Pro25,
    Flash30,
    Pro30,
}

impl ModelKind {
    /// Baseline model used when no label or an unknown label is configured.
    pub const BASELINE: ModelKind = ModelKind::Flash20;

    /// Resolve a user-facing label ("Gemini 2.5 Pro"). Unknown labels fall
    /// back to the baseline rather than erroring, so a stale config value
    /// degrades instead of breaking chat.
    pub fn from_label(label: &str) -> Self {
        match label.trim() {
            "Gemini 2.0 Flash" => ModelKind::Flash20,
            "Gemini 2.0 Pro" => ModelKind::Pro20,
            "Gemini 2.5 Flash" => ModelKind::Flash25,
            "Gemini 2.5 Pro" => ModelKind::Pro25,
            "Gemini 3.0 Flash" => ModelKind::Flash30,
            "Gemini 3.0 Pro" => ModelKind::Pro30,
            _ => ModelKind::BASELINE,
        }
    }

    /// Model id as the generative-language API spells it.
    pub fn id(&self) -> &'static str {
        match self {
            ModelKind::Flash20 => "gemini-2.0-flash",
            ModelKind::Pro20 => "gemini-2.0-pro",
            ModelKind::Flash25 => "gemini-2.5-flash",
            ModelKind::Pro25 => "gemini-2.5-pro",
            ModelKind::Flash30 => "gemini-3.0-flash",
            ModelKind::Pro30 => "gemini-3.0-pro",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_labels() {
        assert_eq!(ModelKind::from_label("Gemini 2.0 Flash"), ModelKind::Flash20);
        assert_eq!(ModelKind::from_label("Gemini 2.0 Pro"), ModelKind::Pro20);
        assert_eq!(ModelKind::from_label("Gemini 2.5 Flash"), ModelKind::Flash25);
        assert_eq!(ModelKind::from_label("Gemini 2.5 Pro"), ModelKind::Pro25);
        assert_eq!(ModelKind::from_label("Gemini 3.0 Flash"), ModelKind::Flash30);
        assert_eq!(ModelKind::from_label("Gemini 3.0 Pro"), ModelKind::Pro30);
    }

    #[test]
    fn test_unknown_label_falls_back_to_baseline() {
        assert_eq!(ModelKind::from_label(""), ModelKind::Flash20);
        assert_eq!(ModelKind::from_label("Gemini 9.9 Ultra"), ModelKind::Flash20);
        assert_eq!(ModelKind::from_label("gemini 2.5 pro"), ModelKind::Flash20);
    }

    #[test]
    fn test_ids() {
        assert_eq!(ModelKind::Flash20.id(), "gemini-2.0-flash");
        assert_eq!(ModelKind::Pro30.id(), "gemini-3.0-pro");
    }
}
