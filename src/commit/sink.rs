//! Destinations for a generated commit message.

use std::io::Write;
use std::path::{Path, PathBuf};

use git2::{ErrorCode, Oid, Repository};
use tempfile::NamedTempFile;
use tracing::debug;

use crate::error::SinkError;

/// Something that can receive the final commit message text.
pub trait CommitMessageSink {
    fn set_text(&mut self, text: &str) -> Result<(), SinkError>;
}

/// Write the message through `sink` when one is available; the text is
/// returned either way.
pub fn deliver(
    text: String,
    sink: Option<&mut dyn CommitMessageSink>,
) -> Result<String, SinkError> {
    if let Some(sink) = sink {
        sink.set_text(&text)?;
    }
    Ok(text)
}

/// Writes the message to a file, e.g. `.git/COMMIT_EDITMSG` from a
/// `prepare-commit-msg` hook.
#[derive(Debug, Clone)]
pub struct FileSink {
    path: PathBuf,
}

impl FileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CommitMessageSink for FileSink {
    fn set_text(&mut self, text: &str) -> Result<(), SinkError> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        // Write next to the target, then rename over it.
        let mut file = NamedTempFile::new_in(dir).map_err(SinkError::Io)?;
        file.write_all(text.as_bytes()).map_err(SinkError::Io)?;
        if !text.ends_with('\n') {
            file.write_all(b"\n").map_err(SinkError::Io)?;
        }
        file.persist(&self.path).map_err(|e| SinkError::Io(e.error))?;

        debug!("Wrote commit message to {}", self.path.display());
        Ok(())
    }
}

/// Commits the current index with the message.
pub struct GitCommitSink<'r> {
    repo: &'r Repository,
    last_commit: Option<Oid>,
}

impl<'r> GitCommitSink<'r> {
    pub fn new(repo: &'r Repository) -> Self {
        Self {
            repo,
            last_commit: None,
        }
    }

    /// Id of the commit created by the last successful `set_text`.
    pub fn last_commit(&self) -> Option<Oid> {
        self.last_commit
    }
}

impl CommitMessageSink for GitCommitSink<'_> {
    fn set_text(&mut self, text: &str) -> Result<(), SinkError> {
        let oid = commit_index(self.repo, text)?;
        self.last_commit = Some(oid);
        Ok(())
    }
}

/// Create a commit on HEAD from the index as it is, without staging anything.
///
/// On an unborn branch the commit becomes the root commit.
pub fn commit_index(repo: &Repository, message: &str) -> Result<Oid, SinkError> {
    let mut index = repo.index().map_err(SinkError::Git)?;
    let tree_id = index.write_tree().map_err(SinkError::Git)?;
    let tree = repo.find_tree(tree_id).map_err(SinkError::Git)?;

    let sig = repo.signature().map_err(SinkError::Signature)?;

    let parent = match repo.head() {
        Ok(head) => Some(head.peel_to_commit().map_err(SinkError::Git)?),
        Err(e) if e.code() == ErrorCode::UnbornBranch || e.code() == ErrorCode::NotFound => None,
        Err(e) => return Err(SinkError::Git(e)),
    };
    let parents: Vec<&git2::Commit> = parent.iter().collect();

    let oid = repo
        .commit(Some("HEAD"), &sig, &sig, message, &tree, &parents)
        .map_err(SinkError::Git)?;

    debug!("Created commit {oid}");
    Ok(oid)
}
