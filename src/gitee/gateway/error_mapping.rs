//! Error mapping helpers for the Octocrab gateway implementation.

use http::StatusCode;

use crate::error::SigCheckError;
use crate::gitee::rate_limit::RateLimitInfo;

/// Checks if an API status indicates an authentication failure.
pub(super) const fn is_auth_failure(status: StatusCode) -> bool {
    matches!(status, StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN)
}

/// Checks if an octocrab error represents a network/transport issue.
pub(super) const fn is_network_error(error: &octocrab::Error) -> bool {
    matches!(
        error,
        octocrab::Error::Http { .. }
            | octocrab::Error::Hyper { .. }
            | octocrab::Error::Service { .. }
    )
}

/// Checks whether a response represents a rate limit error, based on the
/// status plus either the message text or an exhausted quota header.
pub(super) fn is_rate_limit_response(
    status: StatusCode,
    message: &str,
    rate_limit: Option<&RateLimitInfo>,
) -> bool {
    if status == StatusCode::TOO_MANY_REQUESTS {
        return true;
    }

    let message_indicates_rate_limit = message.to_lowercase().contains("rate limit");
    let quota_exhausted = rate_limit.is_some_and(RateLimitInfo::is_exhausted);

    status == StatusCode::FORBIDDEN && (message_indicates_rate_limit || quota_exhausted)
}

pub(super) fn map_octocrab_error(operation: &str, error: &octocrab::Error) -> SigCheckError {
    if let octocrab::Error::GitHub { source, .. } = error {
        return map_http_error(
            operation,
            source.status_code,
            Some(source.message.clone()),
            None,
        );
    }

    if is_network_error(error) {
        return SigCheckError::Network {
            message: format!("{operation} failed: {error}"),
        };
    }

    SigCheckError::Api {
        message: format!("{operation} failed: {error}"),
    }
}

pub(super) fn map_http_error(
    operation: &str,
    status: StatusCode,
    maybe_message: Option<String>,
    rate_limit: Option<RateLimitInfo>,
) -> SigCheckError {
    let message = maybe_message.unwrap_or_else(|| "unknown error".to_owned());

    if is_rate_limit_response(status, &message, rate_limit.as_ref()) {
        let base_message = format!("{operation} failed: {message}");
        let message = match &rate_limit {
            Some(info) => format!(
                "{base_message} (resets at {reset})",
                reset = info.reset_at()
            ),
            None => base_message,
        };
        return SigCheckError::RateLimitExceeded {
            rate_limit,
            message,
        };
    }

    if is_auth_failure(status) {
        SigCheckError::Authentication {
            message: format!("{operation} failed: API returned {status} {message}"),
        }
    } else if status.is_server_error() {
        SigCheckError::Unavailable {
            message: format!("{operation} failed with status {status}: {message}"),
        }
    } else {
        SigCheckError::Api {
            message: format!("{operation} failed with status {status}: {message}"),
        }
    }
}
