//! Chat-completion client with the reasoning continuation loop.

use std::time::Duration;

use reqwest::StatusCode;
use tracing::{debug, warn};

use crate::error::{CompletionError, ConfigError};

use super::cancel::CancelHandle;
use super::conversation::Conversation;
use super::types::{ChatMessage, CompletionRequest, CompletionResponse, ErrorResponse};

/// Default OpenRouter API root.
pub const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1";

/// Maximum requests per call before giving up on a model that keeps reasoning.
pub const MAX_REASONING_ITERATIONS: usize = 8;

/// Default connect/request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

const TEMPERATURE: f32 = 0.0;
const MAX_TOKENS: u32 = 300;
const CHOICES: u32 = 1;

/// Outcome of inspecting one response message.
#[derive(Debug, PartialEq, Eq)]
enum Step {
    /// Non-blank content: the final answer, trimmed.
    Final(String),
    /// Blank content with a reasoning trace to feed back.
    Reasoning(String),
}

/// Client for an OpenAI-compatible chat-completions endpoint.
pub struct CompletionClient {
    pub(super) http: reqwest::Client,
    pub(super) base_url: String,
    pub(super) api_key: String,
    max_iterations: usize,
}

impl CompletionClient {
    /// Build a client with the given transport timeout.
    pub fn new(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, ConfigError> {
        let http = reqwest::Client::builder()
            .connect_timeout(timeout)
            .timeout(timeout)
            .build()
            .map_err(ConfigError::HttpClient)?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            max_iterations: MAX_REASONING_ITERATIONS,
        })
    }

    /// Override the reasoning iteration bound (at least one request is always sent).
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations.max(1);
        self
    }

    pub fn has_api_key(&self) -> bool {
        !self.api_key.trim().is_empty()
    }

    pub fn max_iterations(&self) -> usize {
        self.max_iterations
    }

    pub(super) fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    /// Generate a reply without external cancellation.
    pub async fn complete(
        &self,
        model: &str,
        system_prompt: &str,
        user_prompt: &str,
    ) -> Result<String, CompletionError> {
        self.complete_with_cancel(model, system_prompt, user_prompt, &CancelHandle::new())
            .await
    }

    /// Generate a reply, re-submitting the transcript while the model answers
    /// with reasoning steps instead of content.
    ///
    /// Returns the first non-blank content, trimmed. Fails with
    /// [`CompletionError::Canceled`] as soon as `cancel` fires, including while
    /// a request is on the wire.
    pub async fn complete_with_cancel(
        &self,
        model: &str,
        system_prompt: &str,
        user_prompt: &str,
        cancel: &CancelHandle,
    ) -> Result<String, CompletionError> {
        let mut conversation = Conversation::new(system_prompt, user_prompt);

        for iteration in 1..=self.max_iterations {
            if cancel.is_canceled() {
                return Err(CompletionError::Canceled);
            }

            debug!(
                "Completion request {}/{} for {} ({} turns)",
                iteration,
                self.max_iterations,
                model,
                conversation.len()
            );

            let response = self.send(model, conversation.turns(), cancel).await?;
            let message = response
                .choices
                .into_iter()
                .next()
                .map(|choice| choice.message)
                .ok_or(CompletionError::EmptyResponse)?;

            match next_step(message)? {
                Step::Final(text) => {
                    debug!("Final answer after {} request(s)", iteration);
                    return Ok(text);
                }
                Step::Reasoning(reasoning) => {
                    debug!("Reasoning step {} ({} chars)", iteration, reasoning.len());
                    conversation.push_reasoning(&reasoning);
                }
            }
        }

        warn!(
            "Model {} still reasoning after {} requests",
            model, self.max_iterations
        );
        Err(CompletionError::ReasoningBudgetExceeded {
            iterations: self.max_iterations,
        })
    }

    /// Send one request and decode the response, racing it against `cancel`.
    async fn send(
        &self,
        model: &str,
        messages: &[ChatMessage],
        cancel: &CancelHandle,
    ) -> Result<CompletionResponse, CompletionError> {
        let body = CompletionRequest {
            model,
            messages,
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
            n: CHOICES,
        };

        let request = self
            .http
            .post(self.url("chat/completions"))
            .bearer_auth(&self.api_key)
            .json(&body);

        let exchange = async move {
            let response = request.send().await?;
            let status = response.status();
            let text = response.text().await?;
            Ok::<_, reqwest::Error>((status, text))
        };

        let in_flight = cancel.request_token();
        let result = tokio::select! {
            biased;
            _ = in_flight.cancelled() => return Err(CompletionError::Canceled),
            result = exchange => result,
        };

        match result {
            Ok((status, text)) => parse_response(status, &text),
            // The transport reports aborted calls as errors too.
            Err(_) if cancel.is_canceled() => Err(CompletionError::Canceled),
            Err(e) => Err(CompletionError::Transport(describe_transport_error(&e))),
        }
    }
}

/// Classify an HTTP response into a decoded body or a remote failure.
fn parse_response(status: StatusCode, body: &str) -> Result<CompletionResponse, CompletionError> {
    if !status.is_success() {
        return Err(CompletionError::Remote {
            status: status.as_u16(),
            message: ErrorResponse::message_from_body(body),
        });
    }

    serde_json::from_str(body).map_err(|e| {
        let preview: String = body.chars().take(200).collect();
        CompletionError::InvalidResponse(format!("{e}. Body: {preview}"))
    })
}

/// Decide whether a response message ends the loop or continues it.
fn next_step(message: ChatMessage) -> Result<Step, CompletionError> {
    let content = message.content.trim();
    if !content.is_empty() {
        return Ok(Step::Final(content.to_string()));
    }

    match message.reasoning {
        Some(reasoning) if !reasoning.trim().is_empty() => Ok(Step::Reasoning(reasoning)),
        _ => Err(CompletionError::EmptyResponse),
    }
}

pub(super) fn describe_transport_error(e: &reqwest::Error) -> String {
    if e.is_timeout() {
        format!("request timed out ({e})")
    } else if e.is_connect() {
        format!("connection failed ({e})")
    } else {
        e.to_string()
    }
}
