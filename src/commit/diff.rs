//! Assembly of the unified diff payload sent to the model.
//!
//! The payload covers staged changes (optionally narrowed to an explicit
//! selection) plus files the caller marked for commit that git does not track
//! yet. Every git failure degrades to an empty section; callers only ever see
//! an empty payload.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::git::{GitExecutor, relativize};

/// Hash of git's empty tree, used as the base when there is no commit to diff against.
pub const EMPTY_TREE_SHA: &str = "4b825dc642cb6eb9a060e54bf8d69288fbee4904";

/// Context lines requested from git.
const CONTEXT_ARG: &str = "--unified=3";

/// Builds the diff payload for a repository through a [`GitExecutor`].
pub struct DiffAssembler<E: GitExecutor> {
    executor: E,
}

impl<E: GitExecutor> DiffAssembler<E> {
    pub fn new(executor: E) -> Self {
        Self { executor }
    }

    /// Build the combined diff for `repo_root`.
    ///
    /// - `explicit_paths`: absolute paths the caller selected, or `None` for the
    ///   whole staged set.
    /// - `unversioned`: absolute paths of files not yet in the index.
    ///
    /// Returns an empty string when nothing could be diffed.
    pub async fn build_diff(
        &self,
        repo_root: &Path,
        explicit_paths: Option<&[PathBuf]>,
        unversioned: &[PathBuf],
    ) -> String {
        let mut sections = Vec::new();

        // A selection made only of unversioned files skips the staged section.
        if explicit_paths.is_some() || unversioned.is_empty() {
            let staged = self.staged_diff(repo_root, explicit_paths).await;
            if !staged.trim().is_empty() {
                sections.push(staged);
            }
        }

        for file in unversioned {
            let section = self.unversioned_diff(repo_root, file).await;
            if !section.trim().is_empty() {
                sections.push(section);
            }
        }

        debug!("Assembled diff from {} section(s)", sections.len());
        sections.join("\n")
    }

    /// Diff of the index against the last commit, restricted to `paths` when given.
    ///
    /// When the index yields nothing, falls back to diffing against HEAD, or,
    /// on an unborn branch, the index against the empty tree.
    async fn staged_diff(&self, repo_root: &Path, paths: Option<&[PathBuf]>) -> String {
        let cached = self.run_diff(repo_root, &["--cached"], paths).await;
        if !cached.trim().is_empty() {
            return cached;
        }

        if self.has_head(repo_root).await {
            self.run_diff(repo_root, &["HEAD"], paths).await
        } else {
            debug!("HEAD is unborn, diffing the index against the empty tree");
            self.run_diff(repo_root, &["--cached", EMPTY_TREE_SHA], paths)
                .await
        }
    }

    /// Whether HEAD resolves to a commit.
    async fn has_head(&self, repo_root: &Path) -> bool {
        self.executor
            .run(repo_root, &head_probe_args())
            .await
            .success
    }

    /// Diff for a file outside the index: whatever git already has staged for
    /// it, otherwise a synthesized new-file section.
    async fn unversioned_diff(&self, repo_root: &Path, file: &Path) -> String {
        let single = [file.to_path_buf()];
        let cached = self.run_diff(repo_root, &["--cached"], Some(&single)).await;
        if !cached.trim().is_empty() {
            return cached;
        }

        new_file_diff(repo_root, file).unwrap_or_default()
    }

    async fn run_diff(
        &self,
        repo_root: &Path,
        mode: &[&str],
        paths: Option<&[PathBuf]>,
    ) -> String {
        let args = diff_args(repo_root, mode, paths);
        self.executor.run(repo_root, &args).await.into_text()
    }
}

fn head_probe_args() -> Vec<String> {
    ["rev-parse", "--verify", "--quiet", "HEAD"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

/// Build `diff --unified=3 <mode...> [-- <relative paths>...]`.
fn diff_args(repo_root: &Path, mode: &[&str], paths: Option<&[PathBuf]>) -> Vec<String> {
    let mut args = vec!["diff".to_string(), CONTEXT_ARG.to_string()];
    args.extend(mode.iter().map(|m| m.to_string()));

    let relative: Vec<String> = paths
        .unwrap_or_default()
        .iter()
        .filter_map(|p| relativize(repo_root, p))
        .collect();

    if !relative.is_empty() {
        args.push("--".to_string());
        args.extend(relative);
    }

    args
}

/// Synthesize the unified diff git would show for `file` once staged as a new file.
///
/// Returns `None` if the file cannot be read or is not text.
pub fn new_file_diff(repo_root: &Path, file: &Path) -> Option<String> {
    let content = match fs::read_to_string(file) {
        Ok(content) => content,
        Err(e) => {
            warn!("Skipping unversioned file {}: {e}", file.display());
            return None;
        }
    };

    if content.contains('\0') {
        debug!("Skipping binary file {}", file.display());
        return None;
    }

    let rel = relativize(repo_root, file)?;
    Some(render_new_file_diff(&rel, &content))
}

/// Render a new-file section for `rel` with the given text content.
pub fn render_new_file_diff(rel: &str, content: &str) -> String {
    let lines: Vec<&str> = content.lines().collect();

    let mut diff = String::new();
    diff.push_str(&format!("diff --git a/{rel} b/{rel}\n"));
    diff.push_str("new file mode 100644\n");
    diff.push_str("--- /dev/null\n");
    diff.push_str(&format!("+++ b/{rel}\n"));
    // git emits no hunk for an empty file
    if lines.is_empty() {
        return diff;
    }
    diff.push_str(&format!("@@ -0,0 +1,{} @@\n", lines.len()));
    for line in lines {
        diff.push('+');
        diff.push_str(line);
        diff.push('\n');
    }
    diff
}
