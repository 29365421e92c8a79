//! Octocrab client construction helpers for gateway implementations.

use http::Uri;
use octocrab::Octocrab;

use crate::error::SigCheckError;
use crate::gitee::locator::{AccessToken, ApiBase};

use super::error_mapping::map_octocrab_error;

/// Builds an Octocrab client for the given token and API base URL.
///
/// # Errors
///
/// Returns `SigCheckError::InvalidUrl` when the base URI cannot be parsed or
/// `SigCheckError::Api` when Octocrab fails to construct a client.
pub(super) fn build_octocrab_client(
    token: &AccessToken,
    api_base: &ApiBase,
) -> Result<Octocrab, SigCheckError> {
    let base_uri: Uri = api_base
        .as_str()
        .parse::<Uri>()
        .map_err(|error| SigCheckError::InvalidUrl(error.to_string()))?;

    Octocrab::builder()
        .personal_token(token.as_ref())
        .base_uri(base_uri)
        .map_err(|error| SigCheckError::Api {
            message: format!("build client failed: {error}"),
        })?
        .build()
        .map_err(|error| map_octocrab_error("build client", &error))
}
