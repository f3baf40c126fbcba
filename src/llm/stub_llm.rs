use async_trait::async_trait;
use std::sync::Mutex;

use super::llm_interface::{LlmError, TranslationLLM};

/// In-process model that returns a canned reply and records every call
pub struct StubLLM {
    reply: Option<String>,
    calls: Mutex<Vec<(String, String)>>,
}

impl StubLLM {
    pub fn replying(text: &str) -> Self {
        Self {
            reply: Some(text.to_string()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// A stub whose every call fails with an API error
    pub fn failing() -> Self {
        Self {
            reply: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// `(prompt, system_instruction)` pairs in call order
    pub fn calls(&self) -> Vec<(String, String)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl TranslationLLM for StubLLM {
    async fn generate(&self, prompt: &str, system_instruction: &str) -> Result<String, LlmError> {
        self.calls
            .lock()
            .unwrap()
            .push((prompt.to_string(), system_instruction.to_string()));

        match &self.reply {
            Some(text) => Ok(text.clone()),
            None => Err(LlmError::Api {
                status: 503,
                message: "backend overloaded: quota project 1234".to_string(),
            }),
        }
    }
}
