//! Settings resolved from command-line flags and environment variables.

use std::env;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use tracing::warn;

use crate::commit::prompt::{DEFAULT_USER_TEMPLATE, PromptLanguage};
use crate::error::ConfigError;
use crate::llm::{CompletionClient, DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS};

/// Environment variables checked for the API key, in order.
pub const API_KEY_ENV_VARS: [&str; 2] = ["GITBOT_API_KEY", "OPENROUTER_API_KEY"];

/// Environment variable for the model id.
pub const MODEL_ENV_VAR: &str = "GITBOT_MODEL";

/// Environment variable for the endpoint base URL.
pub const BASE_URL_ENV_VAR: &str = "GITBOT_BASE_URL";

/// Environment variable to override the transport timeout (seconds).
pub const TIMEOUT_ENV_VAR: &str = "GITBOT_HTTP_TIMEOUT";

/// Model used when none is configured.
pub const DEFAULT_MODEL: &str = "anthropic/claude-3.5-sonnet";

/// Values given explicitly by the caller; `None` falls back to the environment
/// and then to defaults.
#[derive(Debug, Clone, Default)]
pub struct SettingsOverrides {
    pub api_key: Option<String>,
    pub model: Option<String>,
    pub base_url: Option<String>,
    pub language: Option<PromptLanguage>,
    pub system_prompt_file: Option<PathBuf>,
    pub user_template_file: Option<PathBuf>,
}

/// Fully resolved configuration for one run.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Empty when no key is configured.
    pub api_key: String,
    pub model: String,
    pub language: PromptLanguage,
    pub system_prompt: String,
    pub user_template: String,
    pub base_url: String,
    pub timeout: Duration,
}

impl Settings {
    pub fn resolve(overrides: SettingsOverrides) -> Result<Self, ConfigError> {
        let language = overrides.language.unwrap_or_default();

        let system_prompt = match overrides.system_prompt_file {
            Some(path) => read_prompt_file(path)?,
            None => language.default_system_prompt().to_string(),
        };

        let user_template = match overrides.user_template_file {
            Some(path) => read_prompt_file(path)?,
            None => DEFAULT_USER_TEMPLATE.to_string(),
        };

        Ok(Self {
            api_key: resolve_api_key(overrides.api_key).unwrap_or_default(),
            model: first_non_empty(overrides.model, &[MODEL_ENV_VAR])
                .unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            language,
            system_prompt,
            user_template,
            base_url: first_non_empty(overrides.base_url, &[BASE_URL_ENV_VAR])
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            timeout: get_timeout(),
        })
    }

    /// Build the completion client for these settings.
    pub fn client(&self) -> Result<CompletionClient, ConfigError> {
        CompletionClient::new(&self.api_key, &self.base_url, self.timeout)
    }
}

/// API key from the explicit value, then `GITBOT_API_KEY`, then `OPENROUTER_API_KEY`.
pub fn resolve_api_key(explicit: Option<String>) -> Option<String> {
    first_non_empty(explicit, &API_KEY_ENV_VARS)
}

fn first_non_empty(explicit: Option<String>, env_vars: &[&str]) -> Option<String> {
    explicit
        .into_iter()
        .chain(env_vars.iter().filter_map(|name| env::var(name).ok()))
        .map(|value| value.trim().to_string())
        .find(|value| !value.is_empty())
}

fn read_prompt_file(path: PathBuf) -> Result<String, ConfigError> {
    fs::read_to_string(&path).map_err(|source| ConfigError::PromptFile {
        path: path.display().to_string(),
        source,
    })
}

/// Get the configured transport timeout.
///
/// Reads from GITBOT_HTTP_TIMEOUT if set, otherwise uses 30 seconds.
/// Logs a warning if the variable is set but invalid (non-numeric or zero).
fn get_timeout() -> Duration {
    match env::var(TIMEOUT_ENV_VAR) {
        Ok(v) if !v.is_empty() => match v.parse::<u64>() {
            Ok(secs) if secs > 0 => Duration::from_secs(secs),
            _ => {
                warn!(
                    "Invalid {} value '{}', using default {}s",
                    TIMEOUT_ENV_VAR, v, DEFAULT_TIMEOUT_SECS
                );
                Duration::from_secs(DEFAULT_TIMEOUT_SECS)
            }
        },
        _ => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
    }
}
