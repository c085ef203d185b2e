//! Coach facade: one function per AI-backed feature.
//!
//! Every function builds a prompt, declares the JSON shape it expects, parses
//! the model's reply and checks it lightly. Any model failure or shape
//! mismatch is logged and replaced by a fixed, feature-specific fallback;
//! callers never see it. The one error that does propagate is a missing model
//! credential, which is detected before any prompt is built.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;
use tracing::error;

use crate::llm_client::{strip_json_fences, LlmError, ModelBackend};

pub mod interview;
pub mod prompts;
pub mod resume;
pub mod skills;

#[derive(Debug, Error)]
pub enum CoachError {
    #[error("Model API key is not configured")]
    MissingApiKey,
}

#[derive(Clone)]
pub struct Coach {
    backend: Arc<dyn ModelBackend>,
}

impl Coach {
    pub fn new(backend: Arc<dyn ModelBackend>) -> Self {
        Self { backend }
    }

    fn ensure_configured(&self) -> Result<(), CoachError> {
        if self.backend.is_configured() {
            Ok(())
        } else {
            Err(CoachError::MissingApiKey)
        }
    }

    /// Calls the model with a response schema and deserializes its JSON reply.
    async fn call_json<T: DeserializeOwned>(
        &self,
        prompt: &str,
        schema: &Value,
    ) -> Result<T, LlmError> {
        let text = self.backend.generate(prompt, Some(schema)).await?;
        serde_json::from_str(strip_json_fences(&text)).map_err(LlmError::Parse)
    }

    async fn call_text(&self, prompt: &str) -> Result<String, LlmError> {
        self.backend.generate(prompt, None).await
    }
}

/// Returns the model value when it passed, or logs and substitutes `fallback`.
fn or_fallback<T>(feature: &str, result: Result<T, LlmError>, fallback: impl FnOnce() -> T) -> T {
    match result {
        Ok(value) => value,
        Err(e) => {
            error!("Error {feature}: {e}");
            fallback()
        }
    }
}
