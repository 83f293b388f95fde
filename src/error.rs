//! Error types for gitbot modules using thiserror.

use thiserror::Error;

/// Render an optional remote message as `": message"`.
fn detail_suffix(message: &Option<String>) -> String {
    message
        .as_deref()
        .map(|m| format!(": {m}"))
        .unwrap_or_default()
}

/// Errors from a single chat-completion call, one kind per failure.
#[derive(Error, Debug)]
pub enum CompletionError {
    #[error("Could not reach the completion endpoint: {0}")]
    Transport(String),

    #[error("Completion endpoint returned HTTP {status}{}", detail_suffix(.message))]
    Remote { status: u16, message: Option<String> },

    #[error("Model returned neither a message nor a reasoning step")]
    EmptyResponse,

    #[error("Completion endpoint returned an unreadable body: {0}")]
    InvalidResponse(String),

    #[error("Model did not produce a final answer after {iterations} reasoning steps")]
    ReasoningBudgetExceeded { iterations: usize },

    #[error("Completion request was canceled")]
    Canceled,
}

impl CompletionError {
    pub fn is_canceled(&self) -> bool {
        matches!(self, CompletionError::Canceled)
    }

    /// Whether the host should show this failure to the user.
    pub fn is_user_facing(&self) -> bool {
        !self.is_canceled()
    }
}

/// Errors from the model-listing endpoint.
#[derive(Error, Debug)]
pub enum ModelListError {
    #[error("Could not reach the model-listing endpoint: {0}")]
    Transport(String),

    #[error("Model-listing endpoint returned HTTP {status}{}", detail_suffix(.message))]
    Remote { status: u16, message: Option<String> },

    #[error("Model-listing endpoint returned an unreadable body: {0}")]
    InvalidResponse(String),
}

/// Errors from the end-to-end commit message generation.
#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("No staged changes found. Stage your changes first.")]
    NoChangesDetected,

    #[error("No API key configured. Pass --api-key or set GITBOT_API_KEY / OPENROUTER_API_KEY")]
    MissingApiKey,

    #[error("No model configured. Pass --model or set GITBOT_MODEL")]
    MissingModel,

    #[error(transparent)]
    Completion(#[from] CompletionError),
}

impl GenerateError {
    /// Benign outcomes that should not be presented as errors.
    pub fn is_silent(&self) -> bool {
        match self {
            GenerateError::NoChangesDetected => true,
            GenerateError::Completion(e) => e.is_canceled(),
            _ => false,
        }
    }
}

/// Errors from writing a generated message to its destination.
#[derive(Error, Debug)]
pub enum SinkError {
    #[error("Failed to write commit message: {0}")]
    Io(#[source] std::io::Error),

    #[error("Failed to create commit: {0}")]
    Git(#[source] git2::Error),

    #[error("Git config error (missing user.name or user.email): {0}")]
    Signature(#[source] git2::Error),
}

/// Errors from resolving configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read prompt file {path}: {source}")]
    PromptFile {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to open repository: {0}")]
    Repository(#[source] git2::Error),

    #[error("Repository at {0} has no working directory")]
    BareRepository(String),

    #[error("Failed to build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),
}
