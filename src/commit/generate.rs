//! End-to-end commit message generation: diff, prompt, completion.

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::commit::diff::DiffAssembler;
use crate::commit::prompt::build_user_prompt;
use crate::error::GenerateError;
use crate::git::GitExecutor;
use crate::llm::{CancelHandle, CompletionClient};

/// Inputs the host supplies for one generation.
#[derive(Debug, Clone)]
pub struct GenerateRequest<'a> {
    pub repo_root: &'a Path,
    /// Tracked files the caller selected, or `None` for the whole staged set.
    pub explicit_paths: Option<&'a [PathBuf]>,
    /// Files marked for commit that git does not track yet.
    pub unversioned: &'a [PathBuf],
    pub model: &'a str,
    pub system_prompt: &'a str,
    pub user_template: &'a str,
}

/// Generate a commit message for the requested changes.
///
/// Fails with [`GenerateError::NoChangesDetected`] before any network call
/// when the diff is empty.
pub async fn generate_commit_message<E: GitExecutor>(
    assembler: &DiffAssembler<E>,
    client: &CompletionClient,
    request: &GenerateRequest<'_>,
    cancel: &CancelHandle,
) -> Result<String, GenerateError> {
    let diff = assembler
        .build_diff(request.repo_root, request.explicit_paths, request.unversioned)
        .await;

    if diff.trim().is_empty() {
        return Err(GenerateError::NoChangesDetected);
    }

    if !client.has_api_key() {
        return Err(GenerateError::MissingApiKey);
    }

    let model = request.model.trim();
    if model.is_empty() {
        return Err(GenerateError::MissingModel);
    }

    let user_prompt = build_user_prompt(request.user_template, &diff);
    debug!(
        "Diff: {} chars, user prompt: {} chars",
        diff.len(),
        user_prompt.len()
    );
    info!("Requesting commit message from {model}");

    let message = client
        .complete_with_cancel(model, request.system_prompt, &user_prompt, cancel)
        .await?;

    Ok(message)
}
