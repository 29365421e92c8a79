//! Repository existence checks against a Gitee-style REST API.
//!
//! This module wraps Octocrab to address `GET /repos/{org}/{repo}` on a
//! configurable API base and maps each outcome into "exists", "missing", or
//! a classified [`SigCheckError`](crate::SigCheckError) that the validator
//! pool can retry or report.

pub mod gateway;
pub mod locator;
pub mod rate_limit;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use gateway::{DEFAULT_REQUEST_TIMEOUT, OctocrabRepositoryGateway, RepositoryGateway};
pub use locator::{AccessToken, ApiBase, DEFAULT_API_BASE, OrganizationName, RepositoryName};
pub use rate_limit::RateLimitInfo;

#[cfg(test)]
pub use gateway::MockRepositoryGateway;
