//! Gateways for checking repositories through Octocrab.
//!
//! The trait-based design lets the validator pool run against mocks in tests
//! while the Octocrab implementation handles real HTTP requests.

mod client;
mod error_mapping;
mod http_utils;
mod repository;

pub use repository::{DEFAULT_REQUEST_TIMEOUT, OctocrabRepositoryGateway};

use async_trait::async_trait;

use crate::error::SigCheckError;
use crate::gitee::locator::{OrganizationName, RepositoryName};

/// Gateway that can confirm a repository exists.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RepositoryGateway: Send + Sync {
    /// Returns whether `organization/repository` exists.
    ///
    /// `Ok(false)` means the API answered that the repository is absent;
    /// every other failure to get an answer is an error.
    async fn repository_exists(
        &self,
        organization: &OrganizationName,
        repository: &RepositoryName,
    ) -> Result<bool, SigCheckError>;
}
