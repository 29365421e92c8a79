//! Octocrab-backed repository existence checks.

use std::time::Duration;

use async_trait::async_trait;
use http::{StatusCode, Uri};
use octocrab::Octocrab;

use crate::error::SigCheckError;
use crate::gitee::locator::{
    AccessToken, ApiBase, OrganizationName, RepositoryName, repository_path,
};
use crate::gitee::rate_limit::RateLimitInfo;

use super::RepositoryGateway;
use super::client::build_octocrab_client;
use super::error_mapping::{map_http_error, map_octocrab_error};
use super::http_utils::extract_api_message;

/// Default bound on a single existence check.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

const OPERATION: &str = "repository lookup";

/// Octocrab-backed repository gateway.
pub struct OctocrabRepositoryGateway {
    client: Octocrab,
    request_timeout: Duration,
}

impl OctocrabRepositoryGateway {
    /// Creates a new gateway from an Octocrab client.
    #[must_use]
    pub const fn new(client: Octocrab, request_timeout: Duration) -> Self {
        Self {
            client,
            request_timeout,
        }
    }

    /// Builds an Octocrab client for the given token and API base.
    ///
    /// Must be called from within a Tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns `SigCheckError::InvalidUrl` when the base URI cannot be parsed or
    /// `SigCheckError::Api` when Octocrab fails to construct a client.
    pub fn for_token(
        token: &AccessToken,
        api_base: &ApiBase,
        request_timeout: Duration,
    ) -> Result<Self, SigCheckError> {
        let octocrab = build_octocrab_client(token, api_base)?;
        Ok(Self::new(octocrab, request_timeout))
    }
}

#[async_trait]
impl RepositoryGateway for OctocrabRepositoryGateway {
    async fn repository_exists(
        &self,
        organization: &OrganizationName,
        repository: &RepositoryName,
    ) -> Result<bool, SigCheckError> {
        let uri: Uri = repository_path(organization, repository)
            .parse::<Uri>()
            .map_err(|error| SigCheckError::InvalidUrl(error.to_string()))?;

        let response = tokio::time::timeout(self.request_timeout, self.client._get(uri))
            .await
            .map_err(|_elapsed| SigCheckError::Timeout {
                message: format!(
                    "{OPERATION} for {organization}/{repository} exceeded {:?}",
                    self.request_timeout
                ),
            })?
            .map_err(|error| map_octocrab_error(OPERATION, &error))?;

        match response.status() {
            status if status.is_success() => Ok(true),
            StatusCode::NOT_FOUND => Ok(false),
            status => {
                let rate_limit = RateLimitInfo::from_headers(response.headers());
                let body = self
                    .client
                    .body_to_string(response)
                    .await
                    .unwrap_or_else(|_| String::new());

                Err(map_http_error(
                    OPERATION,
                    status,
                    extract_api_message(&body),
                    rate_limit,
                ))
            }
        }
    }
}
