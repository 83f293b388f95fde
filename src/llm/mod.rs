//! Chat-completion endpoint client.

pub mod cancel;
pub mod client;
pub mod conversation;
pub mod models;
pub mod types;

pub use cancel::CancelHandle;
pub use client::{
    CompletionClient, DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS, MAX_REASONING_ITERATIONS,
};
pub use conversation::Conversation;
pub use types::{ChatMessage, ModelInfo, ModelPricing, Role};
