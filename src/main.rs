//! gitbot - CLI entry point.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use dialoguer::Confirm;
use git2::Repository;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use gitbot::commit::{
    DiffAssembler, FileSink, GenerateRequest, GitCommitSink, PromptLanguage, deliver,
    generate_commit_message,
};
use gitbot::config::{Settings, SettingsOverrides};
use gitbot::error::GenerateError;
use gitbot::git::{CommandGitExecutor, check_git_installed, discover_repo_root, narrow_unversioned};
use gitbot::llm::CancelHandle;

/// Environment variable holding the log filter.
const LOG_ENV_VAR: &str = "GITBOT_LOG";

/// Exit status after Ctrl-C, as shells report SIGINT.
const EXIT_CANCELED: u8 = 130;

/// Generate commit messages for pending changes with an LLM.
#[derive(Parser, Debug)]
#[command(name = "gitbot")]
#[command(about = "Generate commit messages for pending changes with an LLM")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// API key (defaults to GITBOT_API_KEY, then OPENROUTER_API_KEY)
    #[arg(long, global = true)]
    api_key: Option<String>,

    /// Endpoint base URL (defaults to GITBOT_BASE_URL, then OpenRouter)
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate a commit message for the staged or selected changes
    Generate(GenerateArgs),

    /// List the models the endpoint offers
    Models {
        /// Only show models whose id or name contains this text
        #[arg(long)]
        filter: Option<String>,
    },
}

#[derive(Args, Debug)]
struct GenerateArgs {
    /// Repository directory (discovered from the current directory by default)
    #[arg(long)]
    repo: Option<PathBuf>,

    /// Tracked file to include (repeatable); without any, the staged set is used
    #[arg(long = "path", value_name = "FILE")]
    paths: Vec<PathBuf>,

    /// Untracked file to include as a new file (repeatable)
    #[arg(long, value_name = "FILE")]
    unversioned: Vec<PathBuf>,

    /// Every file marked for commit (repeatable); those not given with --path
    /// are treated as untracked
    #[arg(long, value_name = "FILE")]
    marked: Vec<PathBuf>,

    /// Model id (defaults to GITBOT_MODEL, then anthropic/claude-3.5-sonnet)
    #[arg(long)]
    model: Option<String>,

    /// Language of the built-in system prompt
    #[arg(long, value_enum)]
    language: Option<PromptLanguage>,

    /// File with a custom system prompt
    #[arg(long, value_name = "FILE")]
    system_prompt: Option<PathBuf>,

    /// File with a custom user-prompt template ({diff} marks the diff)
    #[arg(long, value_name = "FILE")]
    user_template: Option<PathBuf>,

    /// Also write the message to this file (e.g. .git/COMMIT_EDITMSG)
    #[arg(long, value_name = "FILE")]
    write: Option<PathBuf>,

    /// Commit the staged changes with the generated message
    #[arg(long)]
    commit: bool,

    /// Skip the confirmation before committing
    #[arg(short, long, requires = "commit")]
    yes: bool,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let overrides = SettingsOverrides {
        api_key: cli.api_key,
        base_url: cli.base_url,
        ..Default::default()
    };

    match cli.command {
        Command::Generate(args) => run_generate(args, overrides).await,
        Command::Models { filter } => run_models(filter.as_deref(), overrides).await,
    }
}

fn init_tracing(verbose: bool) {
    let fallback = if verbose { "gitbot=debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| EnvFilter::new(fallback));

    // stdout carries the message only
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run_generate(args: GenerateArgs, mut overrides: SettingsOverrides) -> Result<ExitCode> {
    if !check_git_installed() {
        bail!("git is required but was not found on PATH");
    }

    let cwd = std::env::current_dir().context("Failed to read the current directory")?;
    let start = args
        .repo
        .as_deref()
        .map(|dir| cwd.join(dir))
        .unwrap_or_else(|| cwd.clone());
    let repo_root = discover_repo_root(&start)
        .context("Not a git repository. Run gitbot from within a git repository.")?;
    debug!("Repository root: {}", repo_root.display());

    overrides.model = args.model;
    overrides.language = args.language;
    overrides.system_prompt_file = args.system_prompt;
    overrides.user_template_file = args.user_template;
    let settings = Settings::resolve(overrides).context("Invalid configuration")?;
    let client = settings.client()?;

    let paths = absolutize(&cwd, &args.paths);
    let candidates = absolutize(&cwd, &[args.marked, args.unversioned].concat());
    let unversioned = narrow_unversioned(&paths, &candidates);

    let request = GenerateRequest {
        repo_root: &repo_root,
        explicit_paths: (!paths.is_empty()).then_some(paths.as_slice()),
        unversioned: &unversioned,
        model: &settings.model,
        system_prompt: &settings.system_prompt,
        user_template: &settings.user_template,
    };

    let cancel = CancelHandle::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            on_interrupt.cancel();
        }
    });

    eprintln!("Generating commit message with {}...", settings.model);

    let assembler = DiffAssembler::new(CommandGitExecutor);
    let message = match generate_commit_message(&assembler, &client, &request, &cancel).await {
        Ok(message) => message,
        Err(GenerateError::NoChangesDetected) => {
            eprintln!("{}", GenerateError::NoChangesDetected);
            return Ok(ExitCode::SUCCESS);
        }
        Err(e) if e.is_silent() => {
            eprintln!("Canceled.");
            return Ok(ExitCode::from(EXIT_CANCELED));
        }
        Err(e) => return Err(e).context("Failed to generate commit message"),
    };

    let message = match &args.write {
        Some(path) => deliver(message, Some(&mut FileSink::new(path)))
            .with_context(|| format!("Failed to write {}", path.display()))?,
        None => message,
    };

    println!("{}", message);

    if args.commit {
        commit_message(&repo_root, message, args.yes)?;
    }

    Ok(ExitCode::SUCCESS)
}

/// Commit the staged index with `message`, asking first unless `yes`.
fn commit_message(repo_root: &Path, message: String, yes: bool) -> Result<()> {
    if !yes {
        eprintln!();
        let confirmed = Confirm::new()
            .with_prompt("Commit staged changes with this message?")
            .default(true)
            .interact()
            .context("Confirmation prompt failed")?;

        if !confirmed {
            eprintln!("Commit skipped.");
            return Ok(());
        }
    }

    let repo = Repository::open(repo_root).context("Failed to open repository")?;
    let mut sink = GitCommitSink::new(&repo);
    deliver(message, Some(&mut sink)).context("Failed to commit")?;

    if let Some(oid) = sink.last_commit() {
        eprintln!("✓ Created commit {}", oid);
    }
    Ok(())
}

async fn run_models(filter: Option<&str>, overrides: SettingsOverrides) -> Result<ExitCode> {
    let settings = Settings::resolve(overrides).context("Invalid configuration")?;
    let client = settings.client()?;

    let models = client
        .list_models(filter)
        .await
        .context("Failed to list models")?;

    if models.is_empty() {
        eprintln!("No models found.");
        return Ok(ExitCode::SUCCESS);
    }

    for model in &models {
        println!(
            "{:<48} {}  (prompt {}, completion {})",
            model.id,
            model.name,
            price_or_dash(&model.pricing.prompt),
            price_or_dash(&model.pricing.completion)
        );
    }

    Ok(ExitCode::SUCCESS)
}

fn absolutize(cwd: &Path, paths: &[PathBuf]) -> Vec<PathBuf> {
    paths.iter().map(|p| cwd.join(p)).collect()
}

fn price_or_dash(price: &str) -> &str {
    if price.is_empty() { "-" } else { price }
}
