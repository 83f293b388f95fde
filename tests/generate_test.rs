//! End-to-end tests: real repository, mocked completion endpoint.

mod common;

use std::time::Duration;

use common::{TestRepo, completion_body, git_available};
use gitbot::commit::{
    DEFAULT_USER_TEMPLATE, DiffAssembler, FileSink, GenerateRequest, GitCommitSink, deliver,
    generate_commit_message,
};
use gitbot::error::GenerateError;
use gitbot::git::CommandGitExecutor;
use gitbot::llm::{CancelHandle, CompletionClient};
use serde_json::Value;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const SYSTEM_PROMPT: &str = "Write a conventional commit message.";

async fn mount_answer(server: &MockServer, answer: &str) {
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_body(Some(answer), None)))
        .mount(server)
        .await;
}

fn request<'a>(repo: &'a std::path::Path, model: &'a str) -> GenerateRequest<'a> {
    GenerateRequest {
        repo_root: repo,
        explicit_paths: None,
        unversioned: &[],
        model,
        system_prompt: SYSTEM_PROMPT,
        user_template: DEFAULT_USER_TEMPLATE,
    }
}

#[tokio::test]
async fn test_generate_sends_staged_diff_and_returns_message() {
    if !git_available() {
        return;
    }

    let repo = TestRepo::new();
    repo.write_staged("src/math.rs", "pub fn add(a: i32, b: i32) -> i32 {\n    a + b\n}\n");

    let server = MockServer::start().await;
    mount_answer(&server, "feat(math): add integer addition").await;

    let client = CompletionClient::new("test-key", server.uri(), Duration::from_secs(10)).unwrap();
    let assembler = DiffAssembler::new(CommandGitExecutor);
    let root = repo.root();

    let message = generate_commit_message(
        &assembler,
        &client,
        &request(&root, "test/model"),
        &CancelHandle::new(),
    )
    .await
    .unwrap();

    assert_eq!(message, "feat(math): add integer addition");

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    let body: Value = requests[0].body_json().unwrap();
    assert_eq!(body["messages"][0]["content"], SYSTEM_PROMPT);

    let user = body["messages"][1]["content"].as_str().unwrap();
    assert!(user.starts_with("Here's the git diff:\n\ndiff --git a/src/math.rs b/src/math.rs"));
    assert!(user.contains("+    a + b"));
}

#[tokio::test]
async fn test_generate_without_changes_makes_no_request() {
    if !git_available() {
        return;
    }

    let repo = TestRepo::new();
    let server = MockServer::start().await;
    mount_answer(&server, "unused").await;

    let client = CompletionClient::new("test-key", server.uri(), Duration::from_secs(10)).unwrap();
    let assembler = DiffAssembler::new(CommandGitExecutor);
    let root = repo.root();

    let result = generate_commit_message(
        &assembler,
        &client,
        &request(&root, "test/model"),
        &CancelHandle::new(),
    )
    .await;

    match result {
        Err(e @ GenerateError::NoChangesDetected) => assert!(e.is_silent()),
        other => panic!("Expected NoChangesDetected, got: {:?}", other),
    }
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_generate_on_clean_committed_repo_makes_no_request() {
    if !git_available() {
        return;
    }

    let repo = TestRepo::new();
    repo.write_staged("secret.txt", "line one\nline two\n");
    repo.commit("init");

    let server = MockServer::start().await;
    mount_answer(&server, "unused").await;

    let client = CompletionClient::new("test-key", server.uri(), Duration::from_secs(10)).unwrap();
    let assembler = DiffAssembler::new(CommandGitExecutor);
    let root = repo.root();

    let result = generate_commit_message(
        &assembler,
        &client,
        &request(&root, "test/model"),
        &CancelHandle::new(),
    )
    .await;

    assert!(matches!(result, Err(GenerateError::NoChangesDetected)));
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_generated_message_commits_staged_changes() {
    if !git_available() {
        return;
    }

    let repo = TestRepo::new();
    repo.write_staged("README.md", "# demo\n");
    repo.commit("init");
    repo.write_staged("README.md", "# demo\n\nUsage notes.\n");
    let mut config = repo.repo.config().unwrap();
    config.set_str("user.name", "Test User").unwrap();
    config.set_str("user.email", "test@example.com").unwrap();

    let server = MockServer::start().await;
    mount_answer(&server, "docs: add usage notes").await;

    let client = CompletionClient::new("test-key", server.uri(), Duration::from_secs(10)).unwrap();
    let assembler = DiffAssembler::new(CommandGitExecutor);
    let root = repo.root();

    let message = generate_commit_message(
        &assembler,
        &client,
        &request(&root, "test/model"),
        &CancelHandle::new(),
    )
    .await
    .unwrap();

    let editmsg = repo.root().join(".git").join("COMMIT_EDITMSG");
    let message = deliver(message, Some(&mut FileSink::new(&editmsg))).unwrap();
    assert_eq!(std::fs::read_to_string(&editmsg).unwrap(), "docs: add usage notes\n");

    let mut sink = GitCommitSink::new(&repo.repo);
    deliver(message, Some(&mut sink)).unwrap();

    let head = repo.repo.head().unwrap().peel_to_commit().unwrap();
    assert_eq!(Some(head.id()), sink.last_commit());
    assert_eq!(head.message().unwrap(), "docs: add usage notes");
    assert_eq!(head.parent_count(), 1);
}
