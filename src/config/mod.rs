//! Application configuration loaded from CLI, environment, and files.
//!
//! This module provides a unified configuration struct that merges values
//! from command-line arguments, environment variables, and configuration
//! files using ortho-config's layered approach.
//!
//! # Precedence
//!
//! Configuration values are loaded with the following precedence (lowest to
//! highest):
//!
//! 1. **Defaults** – Built-in application defaults
//! 2. **Configuration file** – `.sigcheck.toml` in current directory, home
//!    directory, or XDG config directory
//! 3. **Environment variables** – `SIGCHECK_FILENAME`,
//!    `SIGCHECK_GITEE_TOKEN`, or legacy `GITEE_TOKEN`
//! 4. **Command-line arguments** – `--filename`/`-f` and
//!    `--gitee-token`/`-g`
//!
//! # Configuration File
//!
//! ```toml
//! filename = "sig/sigs.yaml"
//! gitee_token = "example"
//! organization = "open_euler"
//! workers = 5
//! retry_attempts = 2
//! ```

use std::env;
use std::time::Duration;

use camino::Utf8PathBuf;
use ortho_config::OrthoConfig;
use serde::{Deserialize, Serialize};

use crate::check::{
    CheckOptions, DEFAULT_QUEUE_CAPACITY, DEFAULT_WORKERS, RetryPolicy,
};
use crate::error::SigCheckError;
use crate::gitee::{ApiBase, DEFAULT_API_BASE, DEFAULT_REQUEST_TIMEOUT, OrganizationName};

/// Organization used when none is configured.
pub const DEFAULT_ORGANIZATION: &str = "open_euler";

const DEFAULT_RETRY_ATTEMPTS: u32 = 2;
const DEFAULT_RETRY_DELAY_MILLIS: u64 = 500;

/// Configuration for `sig checkrepo`, supporting CLI, environment, and file
/// sources.
///
/// # Example
///
/// ```no_run
/// use ortho_config::OrthoConfig;
/// use sigcheck::SigCheckConfig;
///
/// let config = SigCheckConfig::load().expect("failed to load configuration");
/// let filename = config.require_filename().expect("SIG file required");
/// let token = config.resolve_token().expect("token required");
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, OrthoConfig)]
#[serde(default)]
#[ortho_config(
    prefix = "SIGCHECK",
    discovery(
        dotfile_name = ".sigcheck.toml",
        config_file_name = "sigcheck.toml",
        app_name = "sigcheck"
    )
)]
pub struct SigCheckConfig {
    /// Path of the SIG ownership file to check.
    ///
    /// Can be provided via:
    /// - CLI: `--filename <PATH>` or `-f <PATH>`
    /// - Environment: `SIGCHECK_FILENAME`
    /// - Config file: `filename = "..."`
    #[ortho_config(cli_short = 'f')]
    pub filename: Option<String>,

    /// Personal access token for the hosting API.
    ///
    /// Can be provided via:
    /// - CLI: `--gitee-token <TOKEN>` or `-g <TOKEN>` (`sig checkrepo` also
    ///   accepts the older `--giteetoken` spelling)
    /// - Environment: `SIGCHECK_GITEE_TOKEN` or `GITEE_TOKEN` (legacy)
    /// - Config file: `gitee_token = "..."`
    #[ortho_config(cli_short = 'g')]
    pub gitee_token: Option<String>,

    /// Organization that owns every referenced repository.
    #[ortho_config(cli_short = 'o')]
    pub organization: String,

    /// API base URL; defaults to Gitee's v5 API.
    #[ortho_config()]
    pub api_base: String,

    /// Number of concurrent validators.
    #[ortho_config(cli_short = 'w')]
    pub workers: usize,

    /// Capacity of the work and results queues.
    #[ortho_config()]
    pub queue_capacity: usize,

    /// Total attempts per repository for transient API errors.
    #[ortho_config()]
    pub retry_attempts: u32,

    /// Pause between attempts, in milliseconds.
    #[ortho_config()]
    pub retry_delay_millis: u64,

    /// Bound on a single API request, in seconds.
    #[ortho_config()]
    pub request_timeout_seconds: u64,
}

impl Default for SigCheckConfig {
    fn default() -> Self {
        Self {
            filename: None,
            gitee_token: None,
            organization: DEFAULT_ORGANIZATION.to_owned(),
            api_base: DEFAULT_API_BASE.to_owned(),
            workers: DEFAULT_WORKERS,
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            retry_attempts: DEFAULT_RETRY_ATTEMPTS,
            retry_delay_millis: DEFAULT_RETRY_DELAY_MILLIS,
            request_timeout_seconds: DEFAULT_REQUEST_TIMEOUT.as_secs(),
        }
    }
}

impl SigCheckConfig {
    /// Returns the SIG file path or an error if missing.
    ///
    /// # Errors
    ///
    /// Returns [`SigCheckError::MissingSigFile`] when no path is configured.
    pub fn require_filename(&self) -> Result<Utf8PathBuf, SigCheckError> {
        self.filename
            .as_deref()
            .map(str::trim)
            .filter(|filename| !filename.is_empty())
            .map(Utf8PathBuf::from)
            .ok_or(SigCheckError::MissingSigFile)
    }

    /// Resolves the token from configuration or the legacy `GITEE_TOKEN`
    /// environment variable.
    ///
    /// # Errors
    ///
    /// Returns [`SigCheckError::MissingToken`] when no token source provides a
    /// value.
    pub fn resolve_token(&self) -> Result<String, SigCheckError> {
        self.gitee_token
            .clone()
            .or_else(|| env::var("GITEE_TOKEN").ok())
            .ok_or(SigCheckError::MissingToken)
    }

    /// Parses the configured API base.
    ///
    /// # Errors
    ///
    /// Returns [`SigCheckError::InvalidUrl`] when `api_base` is not an HTTP(S)
    /// URL.
    pub fn api_base(&self) -> Result<ApiBase, SigCheckError> {
        ApiBase::parse(&self.api_base)
    }

    /// Bound on a single API request.
    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }

    /// Builds the explicit options passed into the check pipeline.
    ///
    /// # Errors
    ///
    /// Returns [`SigCheckError::Configuration`] when the organization is not
    /// addressable or a concurrency/retry setting is zero.
    pub fn check_options(&self) -> Result<CheckOptions, SigCheckError> {
        let organization =
            OrganizationName::new(&self.organization).map_err(|error| {
                SigCheckError::Configuration {
                    message: error.to_string(),
                }
            })?;

        let zero_setting = [
            (self.workers == 0, "workers"),
            (self.queue_capacity == 0, "queue_capacity"),
            (self.retry_attempts == 0, "retry_attempts"),
            (self.request_timeout_seconds == 0, "request_timeout_seconds"),
        ]
        .into_iter()
        .find_map(|(is_zero, setting)| is_zero.then_some(setting));
        if let Some(setting) = zero_setting {
            return Err(SigCheckError::Configuration {
                message: format!("{setting} must be at least 1"),
            });
        }

        Ok(CheckOptions {
            organization,
            workers: self.workers,
            queue_capacity: self.queue_capacity,
            retry: RetryPolicy {
                attempts: self.retry_attempts,
                delay: Duration::from_millis(self.retry_delay_millis),
            },
        })
    }
}

#[cfg(test)]
mod tests;
