//! Path normalization between caller paths and git's repo-relative form.

use std::collections::HashSet;
use std::fs;
use std::path::{Component, Path, PathBuf};

use git2::Repository;

use crate::error::ConfigError;

/// Canonical form of a path, or the path itself when it cannot be resolved
/// (for example because the file no longer exists).
pub fn canonical_or_self(path: &Path) -> PathBuf {
    fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}

/// Convert an absolute path to git's repo-relative form (forward slashes).
///
/// Returns `None` when the path is the repository root itself. Paths outside
/// the repository are returned unchanged so git can report on them.
pub fn relativize(repo_root: &Path, path: &Path) -> Option<String> {
    let direct = path.strip_prefix(repo_root).ok().filter(|rel| {
        rel.components()
            .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
    });

    let relative = match direct {
        Some(rel) => rel.to_path_buf(),
        None => {
            let root = canonical_or_self(repo_root);
            let target = canonical_or_self(path);
            match target.strip_prefix(&root) {
                Ok(rel) => rel.to_path_buf(),
                Err(_) => return Some(path.to_string_lossy().into_owned()),
            }
        }
    };

    let parts: Vec<String> = relative
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect();

    if parts.is_empty() {
        None
    } else {
        Some(parts.join("/"))
    }
}

/// Select the unversioned files out of the caller's full marked-file set.
///
/// Anything whose canonical path is already covered by `tracked` is dropped so
/// a file is never diffed twice. Order of `marked` is preserved.
pub fn narrow_unversioned(tracked: &[PathBuf], marked: &[PathBuf]) -> Vec<PathBuf> {
    let tracked_canonical: HashSet<PathBuf> =
        tracked.iter().map(|p| canonical_or_self(p)).collect();

    let mut seen = HashSet::new();
    marked
        .iter()
        .filter(|p| {
            let canonical = canonical_or_self(p);
            !tracked_canonical.contains(&canonical) && seen.insert(canonical)
        })
        .cloned()
        .collect()
}

/// Locate the working directory of the repository containing `start`.
pub fn discover_repo_root(start: &Path) -> Result<PathBuf, ConfigError> {
    let repo = Repository::discover(start).map_err(ConfigError::Repository)?;
    let workdir = repo
        .workdir()
        .ok_or_else(|| ConfigError::BareRepository(repo.path().display().to_string()))?;
    Ok(canonical_or_self(workdir))
}
