use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::llm_interface::{LlmError, TranslationLLM};
use crate::config::LlmConfig;

/// Google Gemini `generateContent` client
pub struct GeminiLLM {
    client: Client,
    base_url: String,
    model: String,
    api_key: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    system_instruction: Content<'a>,
    contents: Vec<Content<'a>>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'a str>,
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
    error: Option<ApiErrorBody>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<CandidateContent>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    code: Option<u16>,
    #[serde(default)]
    message: String,
    status: Option<String>,
}

impl GeminiLLM {
    pub fn new(base_url: String, model: String, api_key: String) -> Self {
        info!("Initialized GeminiLLM: model={}, base_url={}", model, base_url);
        Self {
            client: Client::new(),
            base_url,
            model,
            api_key,
        }
    }

    pub fn from_config(config: &LlmConfig) -> Self {
        Self::new(
            config.base_url.clone(),
            config.model.clone(),
            config.api_key.clone(),
        )
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        )
    }
}

#[async_trait]
impl TranslationLLM for GeminiLLM {
    async fn generate(&self, prompt: &str, system_instruction: &str) -> Result<String, LlmError> {
        let request = GenerateContentRequest {
            system_instruction: Content {
                role: None,
                parts: vec![Part {
                    text: system_instruction,
                }],
            },
            contents: vec![Content {
                role: Some("user"),
                parts: vec![Part { text: prompt }],
            }],
        };

        debug!(
            "Sending generateContent request: model={}, prompt_len={}",
            self.model,
            prompt.len()
        );

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            // Error payloads are JSON, but proxies may answer with plain text
            let message = serde_json::from_str::<GenerateContentResponse>(&body)
                .ok()
                .and_then(|r| r.error)
                .map(|e| e.message)
                .unwrap_or(body);
            debug!("Gemini request failed with {}: {}", status, message);
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: GenerateContentResponse = serde_json::from_str(&body)?;
        extract_text(parsed)
    }
}

/// Join the text parts of the first candidate
fn extract_text(response: GenerateContentResponse) -> Result<String, LlmError> {
    if let Some(err) = response.error {
        return Err(LlmError::Api {
            status: err.code.unwrap_or(500),
            message: match err.status {
                Some(status) => format!("{}: {}", status, err.message),
                None => err.message,
            },
        });
    }

    let Some(candidate) = response.candidates.into_iter().next() else {
        if let Some(reason) = response.prompt_feedback.and_then(|f| f.block_reason) {
            warn!("Gemini blocked prompt: {}", reason);
            return Err(LlmError::Blocked(reason));
        }
        return Err(LlmError::EmptyResponse);
    };

    let text: String = candidate
        .content
        .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();

    if text.is_empty() {
        debug!("Empty candidate, finish_reason={:?}", candidate.finish_reason);
        return Err(LlmError::EmptyResponse);
    }
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{extract::Path, http::HeaderMap, http::StatusCode, routing::post, Json, Router};
    use serde_json::{json, Value};
    use std::sync::{Arc, Mutex};

    type Seen = Arc<Mutex<Vec<(String, Option<String>, Value)>>>;

    /// Start a local stand-in for the Gemini endpoint that always answers
    /// with `status` / `reply`, recording what it received.
    async fn fake_gemini(status: StatusCode, reply: Value) -> (String, Seen) {
        let seen: Seen = Arc::new(Mutex::new(Vec::new()));
        let recorder = seen.clone();

        let app = Router::new().route(
            "/models/:action",
            post(
                move |Path(action): Path<String>, headers: HeaderMap, Json(body): Json<Value>| {
                    let recorder = recorder.clone();
                    let reply = reply.clone();
                    async move {
                        let key = headers
                            .get("x-goog-api-key")
                            .and_then(|v| v.to_str().ok())
                            .map(|s| s.to_string());
                        recorder.lock().unwrap().push((action, key, body));
                        (status, Json(reply))
                    }
                },
            ),
        );

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        (format!("http://{}", addr), seen)
    }

    fn client(base_url: String) -> GeminiLLM {
        GeminiLLM::new(base_url, "gemini-1.5-flash".to_string(), "test-key".to_string())
    }

    #[tokio::test]
    async fn sends_system_instruction_and_prompt() {
        let (url, seen) = fake_gemini(
            StatusCode::OK,
            json!({
                "candidates": [{
                    "content": { "role": "model", "parts": [{ "text": "Bonjour" }] },
                    "finishReason": "STOP"
                }]
            }),
        )
        .await;

        let text = client(url)
            .generate("Translate 'hello' to French", "translate only")
            .await
            .unwrap();
        assert_eq!(text, "Bonjour");

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        let (action, key, body) = &seen[0];
        assert_eq!(action, "gemini-1.5-flash:generateContent");
        assert_eq!(key.as_deref(), Some("test-key"));
        assert_eq!(
            body,
            &json!({
                "systemInstruction": { "parts": [{ "text": "translate only" }] },
                "contents": [{
                    "role": "user",
                    "parts": [{ "text": "Translate 'hello' to French" }]
                }]
            })
        );
    }

    #[tokio::test]
    async fn joins_parts_of_first_candidate_only() {
        let (url, _) = fake_gemini(
            StatusCode::OK,
            json!({
                "candidates": [
                    { "content": { "parts": [{ "text": "Hola, " }, { "text": "mundo" }] } },
                    { "content": { "parts": [{ "text": "ignored" }] } }
                ]
            }),
        )
        .await;

        let text = client(url).generate("hello world to Spanish", "sys").await.unwrap();
        assert_eq!(text, "Hola, mundo");
    }

    #[tokio::test]
    async fn error_payload_maps_to_api_error() {
        let (url, _) = fake_gemini(
            StatusCode::BAD_REQUEST,
            json!({
                "error": {
                    "code": 400,
                    "message": "API key not valid",
                    "status": "INVALID_ARGUMENT"
                }
            }),
        )
        .await;

        match client(url).generate("hi to German", "sys").await {
            Err(LlmError::Api { status, message }) => {
                assert_eq!(status, 400);
                assert_eq!(message, "API key not valid");
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[tokio::test]
    async fn blocked_prompt_maps_to_blocked() {
        let (url, _) = fake_gemini(
            StatusCode::OK,
            json!({ "promptFeedback": { "blockReason": "SAFETY" } }),
        )
        .await;

        assert!(matches!(
            client(url).generate("hi to German", "sys").await,
            Err(LlmError::Blocked(reason)) if reason == "SAFETY"
        ));
    }

    #[tokio::test]
    async fn missing_candidates_is_empty_response() {
        let (url, _) = fake_gemini(StatusCode::OK, json!({ "candidates": [] })).await;
        assert!(matches!(
            client(url.clone()).generate("hi to German", "sys").await,
            Err(LlmError::EmptyResponse)
        ));

        let (url, _) = fake_gemini(
            StatusCode::OK,
            json!({ "candidates": [{ "finishReason": "SAFETY" }] }),
        )
        .await;
        assert!(matches!(
            client(url).generate("hi to German", "sys").await,
            Err(LlmError::EmptyResponse)
        ));
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_request_error() {
        let llm = client("http://127.0.0.1:1".to_string());
        assert!(matches!(
            llm.generate("hi to German", "sys").await,
            Err(LlmError::Request(_))
        ));
    }

    #[test]
    fn endpoint_tolerates_trailing_slash() {
        let llm = GeminiLLM::new(
            "https://example.test/v1beta/".to_string(),
            "gemini-1.5-flash".to_string(),
            "k".to_string(),
        );
        assert_eq!(
            llm.endpoint(),
            "https://example.test/v1beta/models/gemini-1.5-flash:generateContent"
        );
    }
}
