//! Scripted in-memory backend for tests.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::oneshot;

use super::{LlmError, ModelBackend};

/// Replays queued responses in order and records every prompt it receives.
/// An exhausted queue answers with a 503 API error.
pub struct ScriptedBackend {
    responses: Mutex<VecDeque<Result<String, LlmError>>>,
    prompts: Mutex<Vec<String>>,
    gate: Mutex<Option<(oneshot::Sender<()>, oneshot::Receiver<()>)>>,
    configured: bool,
}

/// A parked call: `started` fires once the call has taken its response,
/// which is returned only after `release` is sent or dropped.
pub struct Hold {
    pub started: oneshot::Receiver<()>,
    pub release: oneshot::Sender<()>,
}

impl ScriptedBackend {
    pub fn new() -> Self {
        Self {
            responses: Mutex::new(VecDeque::new()),
            prompts: Mutex::new(Vec::new()),
            gate: Mutex::new(None),
            configured: true,
        }
    }

    pub fn unconfigured() -> Self {
        Self {
            configured: false,
            ..Self::new()
        }
    }

    pub fn with_responses<I, S>(responses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let backend = Self::new();
        for r in responses {
            backend.push_ok(r);
        }
        backend
    }

    pub fn push_ok(&self, text: impl Into<String>) {
        self.responses.lock().unwrap().push_back(Ok(text.into()));
    }

    pub fn push_err(&self, err: LlmError) {
        self.responses.lock().unwrap().push_back(Err(err));
    }

    /// Parks the next call until the returned hold is released.
    pub fn hold_next_call(&self) -> Hold {
        let (started_tx, started) = oneshot::channel();
        let (release, release_rx) = oneshot::channel();
        *self.gate.lock().unwrap() = Some((started_tx, release_rx));
        Hold { started, release }
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }
}

#[async_trait]
impl ModelBackend for ScriptedBackend {
    async fn generate(&self, prompt: &str, _schema: Option<&Value>) -> Result<String, LlmError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        let response = self
            .responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(LlmError::Api {
                status: 503,
                message: "no scripted response".to_string(),
            }));

        let gate = self.gate.lock().unwrap().take();
        if let Some((started, release)) = gate {
            let _ = started.send(());
            let _ = release.await;
        }
        response
    }

    fn is_configured(&self) -> bool {
        self.configured
    }
}
