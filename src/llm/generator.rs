//! Core `NoteGenerator` trait and `ApiGenerator` implementation.
//!
//! `ApiGenerator` sends one composed prompt to a hosted text-generation
//! service and returns the text of the reply.  Two wire formats are spoken,
//! selected by [`LlmProvider`]:
//!
//! * **Gemini**: `POST {base}/v1beta/models/{model}:generateContent`
//! * **OpenAI-compatible**: `POST {base}/v1/chat/completions`
//!
//! All connection details come from [`LlmConfig`].  There is exactly one
//! request per call: no retry, no streaming.

use async_trait::async_trait;
use serde_json::{json, Value};
use thiserror::Error;

use crate::config::{LlmConfig, LlmProvider};

/// Upper bound on how much of an error body is kept in [`LlmError::Status`].
const MAX_ERROR_BODY: usize = 300;

// ---------------------------------------------------------------------------
// LlmError
// ---------------------------------------------------------------------------

/// Errors that can occur while generating notes.
#[derive(Debug, Error)]
pub enum LlmError {
    /// No API key configured and none found in the environment.
    #[error("no API key configured (set llm.api_key or {0})")]
    MissingApiKey(&'static str),

    /// HTTP transport or connection error.
    #[error("HTTP request failed: {0}")]
    Request(String),

    /// The service answered with a non-success status code.
    #[error("generation service returned {status}: {body}")]
    Status { status: u16, body: String },

    /// The request did not complete within the configured timeout.
    #[error("generation request timed out")]
    Timeout,

    /// The HTTP response could not be parsed as expected JSON.
    #[error("failed to parse generation response: {0}")]
    Parse(String),

    /// The service returned a response with no usable text content.
    #[error("generation service returned an empty response")]
    EmptyResponse,
}

impl From<reqwest::Error> for LlmError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            LlmError::Timeout
        } else {
            LlmError::Request(e.to_string())
        }
    }
}

// ---------------------------------------------------------------------------
// NoteGenerator trait
// ---------------------------------------------------------------------------

/// Async trait for prompt → text generation.
///
/// Implementors must be `Send + Sync` so they can be shared across requests
/// (e.g. wrapped in `Arc<dyn NoteGenerator>`).
#[async_trait]
pub trait NoteGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, LlmError>;
}

// ---------------------------------------------------------------------------
// ApiGenerator
// ---------------------------------------------------------------------------

/// Calls the configured hosted generation endpoint.
pub struct ApiGenerator {
    client: reqwest::Client,
    config: LlmConfig,
    api_key: Option<String>,
}

impl ApiGenerator {
    /// Build an `ApiGenerator` from application config.
    ///
    /// The API key is resolved once here (config first, then environment).
    /// A client-side timeout is applied only when `config.timeout_secs` is
    /// set.
    pub fn from_config(config: &LlmConfig) -> Self {
        let mut builder = reqwest::Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(std::time::Duration::from_secs(secs));
        }
        let client = builder.build().unwrap_or_else(|_| reqwest::Client::new());

        Self {
            client,
            config: config.clone(),
            api_key: config.resolved_api_key(),
        }
    }

    fn base_url(&self) -> &str {
        self.config.base_url.trim_end_matches('/')
    }

    async fn generate_gemini(&self, prompt: &str) -> Result<String, LlmError> {
        let key = self
            .api_key
            .as_deref()
            .ok_or(LlmError::MissingApiKey(LlmProvider::Gemini.api_key_env()))?;

        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url(),
            self.config.model
        );

        let mut body = json!({
            "contents": [
                { "parts": [ { "text": prompt } ] }
            ]
        });
        if let Some(t) = self.config.temperature {
            body["generationConfig"] = json!({ "temperature": t });
        }

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", key)
            .json(&body)
            .send()
            .await?;

        let json = read_json(response).await?;
        gemini_text(&json)
    }

    async fn generate_openai(&self, prompt: &str) -> Result<String, LlmError> {
        let url = format!("{}/v1/chat/completions", self.base_url());

        let mut body = json!({
            "model": self.config.model,
            "messages": [
                { "role": "user", "content": prompt }
            ],
            "stream": false
        });
        if let Some(t) = self.config.temperature {
            body["temperature"] = json!(t);
        }

        let mut req = self.client.post(&url).json(&body);

        // Local providers run without authentication.
        if let Some(key) = self.api_key.as_deref() {
            req = req.bearer_auth(key);
        }

        let response = req.send().await?;
        let json = read_json(response).await?;
        openai_text(&json)
    }
}

#[async_trait]
impl NoteGenerator for ApiGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
        log::debug!(
            "llm: sending {} char prompt to {:?} model {}",
            prompt.len(),
            self.config.provider,
            self.config.model
        );
        let text = match self.config.provider {
            LlmProvider::Gemini => self.generate_gemini(prompt).await?,
            LlmProvider::OpenAiCompatible => self.generate_openai(prompt).await?,
        };
        log::debug!("llm: received {} chars", text.len());
        Ok(text)
    }
}

// ---------------------------------------------------------------------------
// Response handling
// ---------------------------------------------------------------------------

async fn read_json(response: reqwest::Response) -> Result<Value, LlmError> {
    let status = response.status();
    if !status.is_success() {
        let mut body = response.text().await.unwrap_or_default();
        if body.len() > MAX_ERROR_BODY {
            let mut cut = MAX_ERROR_BODY;
            while !body.is_char_boundary(cut) {
                cut -= 1;
            }
            body.truncate(cut);
        }
        return Err(LlmError::Status {
            status: status.as_u16(),
            body,
        });
    }
    response
        .json()
        .await
        .map_err(|e| LlmError::Parse(e.to_string()))
}

/// Concatenate every text part of the first Gemini candidate.
fn gemini_text(json: &Value) -> Result<String, LlmError> {
    let parts = json["candidates"][0]["content"]["parts"]
        .as_array()
        .ok_or(LlmError::EmptyResponse)?;

    let text: String = parts
        .iter()
        .filter_map(|p| p["text"].as_str())
        .collect();

    if text.trim().is_empty() {
        return Err(LlmError::EmptyResponse);
    }
    Ok(text)
}

fn openai_text(json: &Value) -> Result<String, LlmError> {
    let text = json["choices"][0]["message"]["content"]
        .as_str()
        .ok_or(LlmError::EmptyResponse)?;

    if text.trim().is_empty() {
        return Err(LlmError::EmptyResponse);
    }
    Ok(text.to_string())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    use axum::extract::State;
    use axum::http::{HeaderMap, StatusCode};
    use axum::routing::post;
    use axum::{Json, Router};

    #[derive(Clone, Default)]
    struct Captured {
        body: Arc<Mutex<Option<Value>>>,
        headers: Arc<Mutex<Option<HeaderMap>>>,
    }

    async fn spawn_stub(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{addr}")
    }

    fn stub_router(reply: Value, captured: Captured) -> Router {
        async fn handler(
            State((reply, captured)): State<(Value, Captured)>,
            headers: HeaderMap,
            Json(body): Json<Value>,
        ) -> Json<Value> {
            *captured.body.lock().unwrap() = Some(body);
            *captured.headers.lock().unwrap() = Some(headers);
            Json(reply)
        }

        Router::new()
            .route("/v1beta/models/:call", post(handler))
            .route("/v1/chat/completions", post(handler))
            .with_state((reply, captured))
    }

    fn gemini_config(base_url: String, api_key: Option<&str>) -> LlmConfig {
        LlmConfig {
            provider: LlmProvider::Gemini,
            base_url,
            api_key: api_key.map(str::to_string),
            model: "gemini-2.0-flash".into(),
            temperature: None,
            timeout_secs: Some(5),
        }
    }

    #[tokio::test]
    async fn gemini_request_shape_and_reply() {
        let captured = Captured::default();
        let reply = json!({
            "candidates": [{
                "content": { "parts": [ { "text": "## Notes\n" }, { "text": "- point" } ] }
            }]
        });
        let base = spawn_stub(stub_router(reply, captured.clone())).await;

        let generator = ApiGenerator::from_config(&gemini_config(base, Some("g-key")));
        let text = generator.generate("Summarise.\n\nContent:\nabc").await.unwrap();
        assert_eq!(text, "## Notes\n- point");

        let body = captured.body.lock().unwrap().clone().unwrap();
        assert_eq!(
            body["contents"][0]["parts"][0]["text"],
            "Summarise.\n\nContent:\nabc"
        );
        assert!(body.get("generationConfig").is_none());

        let headers = captured.headers.lock().unwrap().clone().unwrap();
        assert_eq!(headers["x-goog-api-key"], "g-key");
    }

    #[tokio::test]
    async fn openai_request_shape_and_reply() {
        let captured = Captured::default();
        let reply = json!({ "choices": [ { "message": { "content": "Q1. What?" } } ] });
        let base = spawn_stub(stub_router(reply, captured.clone())).await;

        let config = LlmConfig {
            provider: LlmProvider::OpenAiCompatible,
            base_url: format!("{base}/"),
            api_key: Some("sk-test".into()),
            model: "gpt-4o-mini".into(),
            temperature: Some(0.2),
            timeout_secs: None,
        };
        let text = ApiGenerator::from_config(&config).generate("prompt").await.unwrap();
        assert_eq!(text, "Q1. What?");

        let body = captured.body.lock().unwrap().clone().unwrap();
        assert_eq!(body["model"], "gpt-4o-mini");
        assert_eq!(body["messages"][0]["role"], "user");
        assert_eq!(body["messages"][0]["content"], "prompt");
        assert!(body["temperature"].is_number());

        let headers = captured.headers.lock().unwrap().clone().unwrap();
        assert_eq!(headers["authorization"], "Bearer sk-test");
    }

    /// Build a generator with no key, regardless of the test environment.
    fn keyless(config: &LlmConfig) -> ApiGenerator {
        let mut generator = ApiGenerator::from_config(config);
        generator.api_key = None;
        generator
    }

    #[tokio::test]
    async fn gemini_without_key_is_missing_api_key() {
        let captured = Captured::default();
        let base = spawn_stub(stub_router(json!({}), captured.clone())).await;

        let err = keyless(&gemini_config(base, None))
            .generate("p")
            .await
            .unwrap_err();

        assert!(
            matches!(err, LlmError::MissingApiKey("GOOGLE_API_KEY")),
            "got {err:?}"
        );
        assert!(captured.body.lock().unwrap().is_none(), "request was sent");
    }

    #[tokio::test]
    async fn openai_without_key_sends_no_authorization() {
        let captured = Captured::default();
        let reply = json!({ "choices": [ { "message": { "content": "local notes" } } ] });
        let base = spawn_stub(stub_router(reply, captured.clone())).await;

        let config = LlmConfig {
            provider: LlmProvider::OpenAiCompatible,
            base_url: base,
            api_key: None,
            model: "llama3".into(),
            temperature: None,
            timeout_secs: Some(5),
        };
        let text = keyless(&config).generate("prompt").await.unwrap();
        assert_eq!(text, "local notes");

        let headers = captured.headers.lock().unwrap().clone().unwrap();
        assert!(headers.get("authorization").is_none());
        let body = captured.body.lock().unwrap().clone().unwrap();
        assert!(body.get("temperature").is_none());
    }

    #[tokio::test]
    async fn empty_candidates_is_empty_response() {
        let base = spawn_stub(stub_router(json!({ "candidates": [] }), Captured::default())).await;
        let err = ApiGenerator::from_config(&gemini_config(base, Some("k")))
            .generate("p")
            .await
            .unwrap_err();
        assert!(matches!(err, LlmError::EmptyResponse), "got {err:?}");
    }

    #[tokio::test]
    async fn non_success_status_is_reported() {
        let router = Router::new().route(
            "/v1beta/models/:call",
            post(|| async { (StatusCode::FORBIDDEN, "API key not valid") }),
        );
        let base = spawn_stub(router).await;

        let err = ApiGenerator::from_config(&gemini_config(base, Some("bad")))
            .generate("p")
            .await
            .unwrap_err();
        match err {
            LlmError::Status { status, body } => {
                assert_eq!(status, 403);
                assert!(body.contains("API key not valid"));
            }
            other => panic!("expected Status, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn unreachable_service_is_request_error() {
        // Port 9 (discard) on localhost is not listening in test environments.
        let config = gemini_config("http://127.0.0.1:9".into(), Some("k"));
        let err = ApiGenerator::from_config(&config).generate("p").await.unwrap_err();
        assert!(matches!(err, LlmError::Request(_) | LlmError::Timeout), "got {err:?}");
    }

    #[test]
    fn gemini_text_ignores_non_text_parts() {
        let json = json!({
            "candidates": [{ "content": { "parts": [ { "inlineData": {} }, { "text": "ok" } ] } }]
        });
        assert_eq!(gemini_text(&json).unwrap(), "ok");
    }

    #[test]
    fn openai_blank_content_is_empty_response() {
        let json = json!({ "choices": [ { "message": { "content": "  " } } ] });
        assert!(matches!(openai_text(&json), Err(LlmError::EmptyResponse)));
    }

    #[test]
    fn generator_is_object_safe() {
        let config = LlmConfig {
            api_key: Some("k".into()),
            ..LlmConfig::default()
        };
        let generator: Box<dyn NoteGenerator> = Box::new(ApiGenerator::from_config(&config));
        drop(generator);
    }
}
