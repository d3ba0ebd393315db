//! Generative-AI backend contract and the Gemini `generateContent` transport.
//!
//! The façade only sees [`GenerativeBackend`]: one call per attempt, returning
//! the primary text plus any web-grounding citations, or a [`BackendError`]
//! whose message and status code the classifier can inspect.

use std::collections::VecDeque;
use std::fmt::{Display, Formatter};
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};

use crate::config::ClientConfig;
use crate::http_client::{HttpClient, HttpRequest, ReqwestHttpClient};
use crate::{ChatRole, ChatTurn};

pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";

/// One outbound generation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateRequest {
    pub model: String,
    pub contents: Vec<ChatTurn>,
    pub system_instruction: Option<String>,
    /// Enables the live web-search tool.
    pub web_grounding: bool,
}

impl GenerateRequest {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            contents: Vec::new(),
            system_instruction: None,
            web_grounding: false,
        }
    }

    /// Single user turn carrying the whole prompt.
    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.contents.push(ChatTurn::user(prompt));
        self
    }

    pub fn with_contents(mut self, contents: Vec<ChatTurn>) -> Self {
        self.contents = contents;
        self
    }

    pub fn with_system_instruction(mut self, instruction: impl Into<String>) -> Self {
        self.system_instruction = Some(instruction.into());
        self
    }

    pub fn with_web_grounding(mut self) -> Self {
        self.web_grounding = true;
        self
    }
}

/// Web citation as reported by the backend; either field may be missing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroundingChunk {
    pub title: Option<String>,
    pub uri: Option<String>,
}

/// Backend reply: primary text plus grounding metadata of the first candidate.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerateResponse {
    pub text: Option<String>,
    pub candidate_count: usize,
    pub grounding: Vec<GroundingChunk>,
}

impl GenerateResponse {
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            candidate_count: 1,
            grounding: Vec::new(),
        }
    }

    pub fn with_grounding(mut self, grounding: Vec<GroundingChunk>) -> Self {
        self.grounding = grounding;
        self
    }

    /// Non-empty primary text, if any.
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref().filter(|text| !text.is_empty())
    }

    /// True when the reply carries neither text nor any candidate at all.
    pub fn is_empty(&self) -> bool {
        self.text().is_none() && self.candidate_count == 0
    }
}

/// Failure class of a backend call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendErrorKind {
    /// Connection, timeout or body read failure.
    Transport,
    /// Upstream answered with a non-success status.
    Status,
    /// Transport succeeded but the reply had no text and no candidates.
    EmptyResponse,
    /// The reply envelope itself could not be decoded.
    Decode,
}

/// Error raised by one backend attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendError {
    kind: BackendErrorKind,
    message: String,
    status: Option<u16>,
}

impl BackendError {
    pub fn transport(message: impl Into<String>) -> Self {
        Self {
            kind: BackendErrorKind::Transport,
            message: message.into(),
            status: None,
        }
    }

    pub fn status(status: u16, message: impl Into<String>) -> Self {
        Self {
            kind: BackendErrorKind::Status,
            message: message.into(),
            status: Some(status),
        }
    }

    pub fn empty_response() -> Self {
        Self {
            kind: BackendErrorKind::EmptyResponse,
            message: String::from("AI response was empty or malformed"),
            status: None,
        }
    }

    pub fn decode(message: impl Into<String>) -> Self {
        Self {
            kind: BackendErrorKind::Decode,
            message: message.into(),
            status: None,
        }
    }

    pub const fn kind(&self) -> BackendErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub const fn status_code(&self) -> Option<u16> {
        self.status
    }

    /// HTTP 403 or a `PERMISSION_DENIED` marker.
    pub fn mentions_permission_denied(&self) -> bool {
        self.status == Some(403) || self.mentions_any(&["403", "PERMISSION_DENIED"])
    }

    /// HTTP 429 or a `RESOURCE_EXHAUSTED` marker.
    pub fn mentions_rate_limit(&self) -> bool {
        self.status == Some(429) || self.mentions_any(&["429", "RESOURCE_EXHAUSTED"])
    }

    // Only transport and status text comes from the remote side; decoder
    // messages carry line/column numbers that must not read as status codes.
    fn mentions_any(&self, markers: &[&str]) -> bool {
        matches!(
            self.kind,
            BackendErrorKind::Transport | BackendErrorKind::Status
        ) && markers.iter().any(|marker| self.message.contains(marker))
    }
}

impl Display for BackendError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.status {
            Some(status) => write!(f, "{} (status {status})", self.message),
            None => f.write_str(&self.message),
        }
    }
}

impl std::error::Error for BackendError {}

/// Generative-AI backend contract: one network call per invocation.
pub trait GenerativeBackend: Send + Sync {
    fn generate<'a>(
        &'a self,
        request: &'a GenerateRequest,
    ) -> Pin<Box<dyn Future<Output = Result<GenerateResponse, BackendError>> + Send + 'a>>;
}

/// Backend double that replays a fixed script of outcomes and records requests.
#[derive(Debug, Default)]
pub struct ScriptedBackend {
    script: Mutex<VecDeque<Result<GenerateResponse, BackendError>>>,
    requests: Mutex<Vec<GenerateRequest>>,
}

impl ScriptedBackend {
    pub fn new(script: impl IntoIterator<Item = Result<GenerateResponse, BackendError>>) -> Self {
        Self {
            script: Mutex::new(script.into_iter().collect()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<GenerateRequest> {
        self.requests
            .lock()
            .map(|requests| requests.clone())
            .unwrap_or_default()
    }
}

impl GenerativeBackend for ScriptedBackend {
    fn generate<'a>(
        &'a self,
        request: &'a GenerateRequest,
    ) -> Pin<Box<dyn Future<Output = Result<GenerateResponse, BackendError>> + Send + 'a>> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(request.clone());
        }
        let next = self
            .script
            .lock()
            .ok()
            .and_then(|mut script| script.pop_front())
            .unwrap_or_else(|| Err(BackendError::transport("scripted backend exhausted")));
        Box::pin(async move { next })
    }
}

/// Gemini REST backend (`models/{model}:generateContent`).
#[derive(Clone)]
pub struct GeminiBackend {
    http_client: Arc<dyn HttpClient>,
    api_key: String,
    endpoint: String,
    timeout_ms: u64,
}

impl GeminiBackend {
    pub fn new(http_client: Arc<dyn HttpClient>, api_key: impl Into<String>) -> Self {
        Self {
            http_client,
            api_key: api_key.into(),
            endpoint: String::from(DEFAULT_ENDPOINT),
            timeout_ms: 60_000,
        }
    }

    /// Production backend over reqwest, configured from `config`.
    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(Arc::new(ReqwestHttpClient::new()), config.api_key.clone())
            .with_endpoint(config.endpoint.clone())
            .with_timeout_ms(config.timeout_ms)
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    fn url_for(&self, model: &str) -> String {
        format!(
            "{}/models/{model}:generateContent",
            self.endpoint.trim_end_matches('/')
        )
    }
}

impl GenerativeBackend for GeminiBackend {
    fn generate<'a>(
        &'a self,
        request: &'a GenerateRequest,
    ) -> Pin<Box<dyn Future<Output = Result<GenerateResponse, BackendError>> + Send + 'a>> {
        Box::pin(async move {
            let body = serde_json::to_string(&WireRequest::from_request(request))
                .map_err(|e| BackendError::decode(format!("failed to encode request: {e}")))?;

            let http_request = HttpRequest::post_json(self.url_for(&request.model), body)
                .with_header("x-goog-api-key", &self.api_key)
                .with_timeout_ms(self.timeout_ms);

            tracing::debug!(
                model = %request.model,
                turns = request.contents.len(),
                web_grounding = request.web_grounding,
                "dispatching generateContent"
            );

            let response = self
                .http_client
                .execute(http_request)
                .await
                .map_err(|error| BackendError::transport(error.message()))?;

            if !response.is_success() {
                return Err(status_error(response.status, &response.body));
            }

            let wire: WireResponse = serde_json::from_str(&response.body).map_err(|e| {
                BackendError::decode(format!("failed to decode generateContent reply: {e}"))
            })?;

            Ok(wire.into_response())
        })
    }
}

fn status_error(status: u16, body: &str) -> BackendError {
    match serde_json::from_str::<WireErrorEnvelope>(body) {
        Ok(envelope) => {
            let detail = envelope.error;
            let marker = detail.status.unwrap_or_default();
            BackendError::status(
                status,
                format!("upstream returned {status} {marker}: {}", detail.message),
            )
        }
        Err(_) => BackendError::status(status, format!("upstream returned {status}")),
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct WireRequest<'a> {
    contents: Vec<WireContent<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<WireContent<'a>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tools: Vec<WireTool>,
}

impl<'a> WireRequest<'a> {
    fn from_request(request: &'a GenerateRequest) -> Self {
        Self {
            contents: request
                .contents
                .iter()
                .map(|turn| WireContent {
                    role: Some(match turn.role {
                        ChatRole::User => "user",
                        ChatRole::Model => "model",
                    }),
                    parts: vec![WirePart { text: &turn.text }],
                })
                .collect(),
            system_instruction: request.system_instruction.as_deref().map(|text| WireContent {
                role: None,
                parts: vec![WirePart { text }],
            }),
            tools: if request.web_grounding {
                vec![WireTool {
                    google_search: WireEmpty {},
                }]
            } else {
                Vec::new()
            },
        }
    }
}

#[derive(Debug, Serialize)]
struct WireContent<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'static str>,
    parts: Vec<WirePart<'a>>,
}

#[derive(Debug, Serialize)]
struct WirePart<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct WireTool {
    google_search: WireEmpty,
}

#[derive(Debug, Serialize)]
struct WireEmpty {}

#[derive(Debug, Deserialize)]
struct WireResponse {
    #[serde(default)]
    candidates: Vec<WireCandidate>,
}

impl WireResponse {
    fn into_response(self) -> GenerateResponse {
        let candidate_count = self.candidates.len();
        let Some(first) = self.candidates.into_iter().next() else {
            return GenerateResponse::default();
        };

        let texts: Vec<String> = first
            .content
            .map(|content| content.parts)
            .unwrap_or_default()
            .into_iter()
            .filter_map(|part| part.text)
            .collect();
        let text = (!texts.is_empty()).then(|| texts.concat());

        let grounding = first
            .grounding_metadata
            .map(|metadata| metadata.grounding_chunks)
            .unwrap_or_default()
            .into_iter()
            .map(|chunk| {
                let web = chunk.web.unwrap_or_default();
                GroundingChunk {
                    title: web.title,
                    uri: web.uri,
                }
            })
            .collect();

        GenerateResponse {
            text,
            candidate_count,
            grounding,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireCandidate {
    #[serde(default)]
    content: Option<WireReplyContent>,
    #[serde(default)]
    grounding_metadata: Option<WireGroundingMetadata>,
}

#[derive(Debug, Deserialize)]
struct WireReplyContent {
    #[serde(default)]
    parts: Vec<WireReplyPart>,
}

#[derive(Debug, Deserialize)]
struct WireReplyPart {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireGroundingMetadata {
    #[serde(default)]
    grounding_chunks: Vec<WireGroundingChunk>,
}

#[derive(Debug, Deserialize)]
struct WireGroundingChunk {
    #[serde(default)]
    web: Option<WireWeb>,
}

#[derive(Debug, Default, Deserialize)]
struct WireWeb {
    #[serde(default)]
    uri: Option<String>,
    #[serde(default)]
    title: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WireErrorEnvelope {
    error: WireErrorDetail,
}

#[derive(Debug, Deserialize)]
struct WireErrorDetail {
    #[serde(default)]
    message: String,
    #[serde(default)]
    status: Option<String>,
}
