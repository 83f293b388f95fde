//! gitbot - Generates commit messages for pending changes with an LLM.
//!
//! # Overview
//!
//! gitbot assembles a unified diff of the selected changes (staged files,
//! explicitly chosen files, and files git does not track yet), sends it to an
//! OpenAI-compatible chat-completion endpoint, and returns the model's reply as
//! a commit message. Reasoning models that answer with thinking steps instead
//! of content are driven to a final answer by re-submitting the growing
//! transcript, up to a fixed number of requests. Every call can be canceled
//! from another task through a [`CancelHandle`].

pub mod commit;
pub mod config;
pub mod error;
pub mod git;
pub mod llm;

// Re-export commonly used types
pub use commit::{
    CommitMessageSink, DiffAssembler, FileSink, GenerateRequest, GitCommitSink, PromptLanguage,
    deliver, generate_commit_message,
};
pub use config::{Settings, SettingsOverrides};
pub use error::{CompletionError, ConfigError, GenerateError, ModelListError, SinkError};
pub use git::{CommandGitExecutor, GitExecutor, GitOutput};
pub use llm::{CancelHandle, CompletionClient, ModelInfo};
