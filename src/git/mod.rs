//! Git CLI integration and path handling.

pub mod executor;
pub mod paths;

pub use executor::{CommandGitExecutor, GitExecutor, GitOutput, check_git_installed};
pub use paths::{canonical_or_self, discover_repo_root, narrow_unversioned, relativize};
