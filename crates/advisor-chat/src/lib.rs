//! Conversational layer: Gemini client, tool registry, and the dispatcher
//! that runs the function-calling protocol over the analytics service.

pub mod chart;
pub mod client;
pub mod dispatcher;
pub mod error;
pub mod history;
pub mod model;
pub mod prompt;
pub mod protocol;
pub mod tools;

pub use chart::{extract_charts, ChartSpec};
pub use client::{GeminiClient, ModelBackend};
pub use dispatcher::{ChatDispatcher, GeminiSettings};
pub use error::ChatError;
pub use history::{parse_history, Turn};
pub use model::ModelKind;
pub use tools::ToolRegistry;
