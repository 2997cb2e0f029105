//! Conversational dispatcher: runs the Gemini function-calling protocol
//! over the tool registry and shapes the final reply.

use std::sync::Arc;

use tracing::{error, info};

use crate::client::ModelBackend;
use crate::error::ChatError;
use crate::history::{parse_history, to_contents};
use crate::model::ModelKind;
use crate::prompt::SYSTEM_INSTRUCTION;
use crate::protocol::{Content, FunctionCall, GenerateContentRequest, Part, Tool};
use crate::tools::ToolRegistry;

/// Upper bound on request/tool-call rounds within one `respond` call.
const MAX_TOOL_ROUNDS: usize = 8;

/// Credentials and model selection for one dispatcher instance.
#[derive(Debug, Clone)]
pub struct GeminiSettings {
    pub api_key: String,
    pub model: ModelKind,
}

impl GeminiSettings {
    pub fn new(api_key: impl Into<String>, model_label: &str) -> Self {
        Self {
            api_key: api_key.into(),
            model: ModelKind::from_label(model_label),
        }
    }
}

/// Orchestrates one chat exchange: history + query in, reply text out.
pub struct ChatDispatcher {
    backend: Arc<dyn ModelBackend>,
    tools: ToolRegistry,
    settings: GeminiSettings,
}

impl ChatDispatcher {
    pub fn new(
        backend: Arc<dyn ModelBackend>,
        tools: ToolRegistry,
        settings: GeminiSettings,
    ) -> Self {
        Self {
            backend,
            tools,
            settings,
        }
    }

    /// Names of the tools the model may call.
    pub fn tool_names(&self) -> Vec<&'static str> {
        self.tools.names()
    }

    /// Answer a query, optionally continuing a prior conversation.
    ///
    /// A missing credential is the caller's configuration problem and is
    /// returned as an error before any backend traffic. Every failure
    /// after that point is logged and folded into an apology reply so the
    /// chat surface always gets text back.
    pub async fn respond(&self, query: &str, history: Option<&str>) -> Result<String, ChatError> {
        if self.settings.api_key.trim().is_empty() {
            return Err(ChatError::MissingApiKey);
        }

        match self.run(query, history).await {
            Ok(reply) => Ok(reply),
            Err(e) => {
                error!(error = %e, "chat exchange failed");
                Ok(format!("Sorry, I encountered an error: {}", e))
            }
        }
    }

    async fn run(&self, query: &str, history: Option<&str>) -> Result<String, ChatError> {
        let mut contents = to_contents(&parse_history(history));
        contents.push(Content::user_text(query));

        let tools = vec![Tool {
            function_declarations: self.tools.declarations(),
        }];
        let system_instruction = Some(Content {
            role: "system".to_string(),
            parts: vec![Part::text(SYSTEM_INSTRUCTION)],
        });

        for round in 0..MAX_TOOL_ROUNDS {
            let request = GenerateContentRequest {
                contents: contents.clone(),
                tools: tools.clone(),
                system_instruction: system_instruction.clone(),
            };

            let response = self.backend.generate(self.settings.model, &request).await?;
            let candidate = response
                .candidates
                .into_iter()
                .next()
                .ok_or_else(|| ChatError::MalformedResponse("no candidates".to_string()))?;

            let calls: Vec<FunctionCall> = candidate
                .content
                .function_calls()
                .into_iter()
                .cloned()
                .collect();

            if calls.is_empty() {
                info!(rounds = round + 1, "chat exchange complete");
                return Ok(candidate.content.text());
            }

            let mut response_parts = Vec::with_capacity(calls.len());
            for call in &calls {
                let result = self.tools.dispatch(&call.name, &call.args)?;
                response_parts.push(Part::function_response(&call.name, result));
            }

            contents.push(candidate.content);
            contents.push(Content {
                role: "user".to_string(),
                parts: response_parts,
            });
        }

        Err(ChatError::RoundLimit(MAX_TOOL_ROUNDS))
    }
}
