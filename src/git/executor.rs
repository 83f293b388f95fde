//! Git CLI spawning.

use std::path::Path;
use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, warn};

/// Captured result of one git invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitOutput {
    pub success: bool,
    /// stdout followed by stderr.
    pub output: String,
}

impl GitOutput {
    /// Output of a successful invocation, or an empty string.
    pub fn into_text(self) -> String {
        if self.success { self.output } else { String::new() }
    }
}

/// Trait for running git commands in a repository.
///
/// This abstraction allows mocking the git subprocess in tests.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GitExecutor: Send + Sync {
    /// Run `git <args>` with `repo_root` as the working directory.
    ///
    /// Never fails: spawn errors are reported as an unsuccessful [`GitOutput`].
    async fn run(&self, repo_root: &Path, args: &[String]) -> GitOutput;
}

/// Executor that calls the real git binary.
#[derive(Debug, Clone, Default)]
pub struct CommandGitExecutor;

#[async_trait]
impl GitExecutor for CommandGitExecutor {
    async fn run(&self, repo_root: &Path, args: &[String]) -> GitOutput {
        debug!("git {} (in {})", args.join(" "), repo_root.display());

        let output = Command::new("git")
            .args(args)
            .current_dir(repo_root)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await;

        match output {
            Ok(output) => {
                let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
                text.push_str(&String::from_utf8_lossy(&output.stderr));

                if !output.status.success() {
                    warn!(
                        "git {} exited with {}: {}",
                        args.first().map(String::as_str).unwrap_or_default(),
                        output.status,
                        text.trim()
                    );
                }

                GitOutput {
                    success: output.status.success(),
                    output: text,
                }
            }
            Err(e) => {
                warn!("Failed to spawn git: {e}");
                GitOutput {
                    success: false,
                    output: String::new(),
                }
            }
        }
    }
}

/// Check if the git CLI is installed and accessible.
pub fn check_git_installed() -> bool {
    which::which("git").is_ok()
}
