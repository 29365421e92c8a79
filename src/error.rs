//! Error types exposed by the SIG repository checker.

use thiserror::Error;

use crate::check::ValidationFailure;
use crate::gitee::rate_limit::RateLimitInfo;

/// Errors surfaced while loading configuration, scanning the SIG file, or
/// talking to the code-hosting API.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SigCheckError {
    /// The CLI did not include a SIG file path.
    #[error("SIG file path is required (use --filename or -f)")]
    MissingSigFile,

    /// The SIG file does not exist.
    #[error("sig file not existed {path}")]
    SigFileNotFound {
        /// Path supplied by the caller.
        path: String,
    },

    /// The SIG file exists but could not be read.
    #[error("failed to read sig file {path}: {message}")]
    SigFileUnreadable {
        /// Path supplied by the caller.
        path: String,
        /// Error detail from the underlying I/O operation.
        message: String,
    },

    /// The SIG file content is not a valid ownership document.
    #[error("malformed sig file {path}: {message}")]
    MalformedSigFile {
        /// Path supplied by the caller.
        path: String,
        /// Parser or validation detail.
        message: String,
    },

    /// The authentication token was missing.
    #[error("gitee token is required (use --gitee-token or -g)")]
    MissingToken,

    /// A repository name contains characters the API cannot address.
    #[error("invalid repository name `{name}`")]
    InvalidRepositoryName {
        /// The rejected name.
        name: String,
    },

    /// An organization name contains characters the API cannot address.
    #[error("invalid organization name `{name}`")]
    InvalidOrganizationName {
        /// The rejected name.
        name: String,
    },

    /// The API base URL could not be parsed.
    #[error("API base URL is invalid: {0}")]
    InvalidUrl(String),

    /// The authentication token was rejected.
    #[error("gitee rejected the token: {message}")]
    Authentication {
        /// Error message returned with the 401/403 response.
        message: String,
    },

    /// The API returned a non-authentication client error.
    #[error("gitee API error: {message}")]
    Api {
        /// Response body describing the failure.
        message: String,
    },

    /// The API returned a server-side (5xx) error.
    #[error("gitee API unavailable: {message}")]
    Unavailable {
        /// Status and message describing the failure.
        message: String,
    },

    /// Networking failed while calling the API.
    #[error("network error talking to gitee: {message}")]
    Network {
        /// Transport-level error detail.
        message: String,
    },

    /// A single API request exceeded its timeout.
    #[error("request timed out: {message}")]
    Timeout {
        /// Which request timed out and after how long.
        message: String,
    },

    /// Rate limit exceeded.
    #[error("gitee API rate limit exceeded: {message}")]
    RateLimitExceeded {
        /// Rate limit info if available from response headers.
        rate_limit: Option<RateLimitInfo>,
        /// Error message from the API.
        message: String,
    },

    /// Configuration could not be loaded or is inconsistent.
    #[error("configuration error: {message}")]
    Configuration {
        /// Details about the configuration failure.
        message: String,
    },

    /// Local I/O operation failed.
    #[error("I/O error: {message}")]
    Io {
        /// Error detail from the underlying I/O operation.
        message: String,
    },

    /// A validator worker terminated abnormally.
    #[error("validator worker failed: {message}")]
    WorkerFailed {
        /// Join error detail.
        message: String,
    },

    /// The run was cancelled before every repository was checked.
    #[error("check interrupted before all repositories were verified; invalid so far: [{}]", join_failures(.failures))]
    Interrupted {
        /// Failures detected before cancellation.
        failures: Vec<ValidationFailure>,
    },

    /// One or more repository references could not be confirmed.
    #[error("failed to recognise gitee projects: {}", join_failures(.failures))]
    InvalidProjects {
        /// Every failure, in receipt order.
        failures: Vec<ValidationFailure>,
    },
}

impl SigCheckError {
    /// Returns true when retrying the same request may succeed.
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::Network { .. }
                | Self::Timeout { .. }
                | Self::Unavailable { .. }
                | Self::RateLimitExceeded { .. }
        )
    }
}

fn join_failures(failures: &[ValidationFailure]) -> String {
    failures
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::SigCheckError;
    use crate::check::{FailureReason, ValidationFailure};
    use crate::gitee::RepositoryName;

    fn failure(name: &str, reason: FailureReason) -> ValidationFailure {
        let repository = RepositoryName::new(name).expect("repository name should be valid");
        ValidationFailure::new(repository, reason)
    }

    #[rstest]
    #[case::network(SigCheckError::Network { message: "reset".to_owned() }, true)]
    #[case::timeout(SigCheckError::Timeout { message: "30s".to_owned() }, true)]
    #[case::unavailable(SigCheckError::Unavailable { message: "502".to_owned() }, true)]
    #[case::rate_limit(
        SigCheckError::RateLimitExceeded { rate_limit: None, message: "slow down".to_owned() },
        true
    )]
    #[case::authentication(SigCheckError::Authentication { message: "401".to_owned() }, false)]
    #[case::api(SigCheckError::Api { message: "422".to_owned() }, false)]
    #[case::config(SigCheckError::MissingToken, false)]
    fn classifies_transient_errors(#[case] error: SigCheckError, #[case] expected: bool) {
        assert_eq!(error.is_transient(), expected, "classification of {error:?}");
    }

    #[rstest]
    fn invalid_projects_message_joins_every_failure() {
        let error = SigCheckError::InvalidProjects {
            failures: vec![
                failure("repoB", FailureReason::NotFound),
                failure(
                    "repoD",
                    FailureReason::Unverified {
                        message: "gitee API error: forbidden".to_owned(),
                    },
                ),
            ],
        };

        assert_eq!(
            error.to_string(),
            "failed to recognise gitee projects: repoB,repoD (gitee API error: forbidden)"
        );
    }

    #[rstest]
    fn interrupted_message_lists_failures_found_so_far() {
        let error = SigCheckError::Interrupted {
            failures: vec![failure("repoB", FailureReason::NotFound)],
        };

        let rendered = error.to_string();
        assert!(rendered.contains("interrupted"), "got `{rendered}`");
        assert!(rendered.contains("[repoB]"), "got `{rendered}`");
    }
}
