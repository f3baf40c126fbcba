/// Wire types for the translate endpoint

use serde::{Deserialize, Serialize};

use super::prompt::build_prompt;

/// Body of `POST /translate`.
///
/// Clients send either a free-form `prompt`, or `text` plus
/// `targetLanguage` which are combined into one prompt.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslateRequest {
    #[serde(default)]
    pub prompt: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub target_language: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranslateResponse {
    pub translated: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl TranslateRequest {
    /// Resolve the prompt to send. A non-blank `prompt` wins over the
    /// two-field form. Returns `None` when nothing usable was supplied.
    pub fn into_prompt(self) -> Option<String> {
        let prompt = match self.prompt.filter(|p| !p.trim().is_empty()) {
            Some(prompt) => prompt,
            None => match (self.text, self.target_language) {
                (Some(text), Some(lang)) if !text.trim().is_empty() && !lang.trim().is_empty() => {
                    build_prompt(&text, &lang)
                }
                _ => return None,
            },
        };

        if prompt.trim().is_empty() {
            None
        } else {
            Some(prompt)
        }
    }
}
