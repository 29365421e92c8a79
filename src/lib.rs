//! Sigcheck library crate verifying SIG repository references.
//!
//! The library reads a SIG ownership file, streams every repository it
//! references through a bounded pool of validators, and confirms each one
//! exists on Gitee via Octocrab. References that cannot be confirmed are
//! collected and surfaced as a single error that the CLI can display.

pub mod check;
pub mod config;
pub mod error;
pub mod gitee;
pub mod sig;

pub use check::{
    CheckOptions, CheckSummary, FailureReason, RetryPolicy, ValidationFailure,
    check_sig_repositories,
};
pub use config::SigCheckConfig;
pub use error::SigCheckError;
pub use gitee::{
    AccessToken, ApiBase, OctocrabRepositoryGateway, OrganizationName, RateLimitInfo,
    RepositoryGateway, RepositoryName,
};
pub use sig::{ScanReport, Sig, SigFile, scan_sig_yaml};
