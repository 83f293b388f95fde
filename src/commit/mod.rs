//! AI-generated commit messages from staged changes.

pub mod diff;
pub mod generate;
pub mod prompt;
pub mod sink;

pub use diff::{DiffAssembler, EMPTY_TREE_SHA, new_file_diff, render_new_file_diff};
pub use generate::{GenerateRequest, generate_commit_message};
pub use prompt::{DEFAULT_USER_TEMPLATE, PromptLanguage, build_user_prompt};
pub use sink::{CommitMessageSink, FileSink, GitCommitSink, commit_index, deliver};
