//! Scripted in-memory gateway for exercising the validator pool without a
//! network.
//!
//! # Examples
//!
//! ```
//! use sigcheck::gitee::test_support::ScriptedGateway;
//!
//! let gateway = ScriptedGateway::new()
//!     .with_missing("repoB")
//!     .with_transient_failures("repoX", 1);
//! assert_eq!(gateway.calls(), 0);
//! ```

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use super::gateway::RepositoryGateway;
use super::locator::{OrganizationName, RepositoryName};
use crate::error::SigCheckError;

/// Gateway that answers from a script and counts every call.
///
/// Unscripted repositories exist.
#[derive(Debug, Default)]
pub struct ScriptedGateway {
    missing: HashSet<String>,
    permanent_errors: HashMap<String, SigCheckError>,
    transient_failures: Mutex<HashMap<String, usize>>,
    calls: AtomicUsize,
}

impl ScriptedGateway {
    /// Creates a gateway where every repository exists.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks `repository` as absent.
    #[must_use]
    pub fn with_missing(mut self, repository: &str) -> Self {
        self.missing.insert(repository.to_owned());
        self
    }

    /// Makes the first `count` checks of `repository` fail with a network
    /// error before it resolves normally.
    #[must_use]
    pub fn with_transient_failures(self, repository: &str, count: usize) -> Self {
        if let Ok(mut failures) = self.transient_failures.lock() {
            failures.insert(repository.to_owned(), count);
        }
        self
    }

    /// Makes every check of `repository` fail with `error`.
    #[must_use]
    pub fn with_error(mut self, repository: &str, error: SigCheckError) -> Self {
        self.permanent_errors.insert(repository.to_owned(), error);
        self
    }

    /// Number of calls made so far.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn take_transient_failure(&self, repository: &str) -> bool {
        let Ok(mut failures) = self.transient_failures.lock() else {
            return false;
        };
        match failures.get_mut(repository) {
            Some(remaining) if *remaining > 0 => {
                *remaining -= 1;
                true
            }
            _ => false,
        }
    }
}

#[async_trait]
impl RepositoryGateway for ScriptedGateway {
    async fn repository_exists(
        &self,
        organization: &OrganizationName,
        repository: &RepositoryName,
    ) -> Result<bool, SigCheckError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let name = repository.as_str();

        if self.take_transient_failure(name) {
            return Err(SigCheckError::Network {
                message: format!("connection reset checking {organization}/{name}"),
            });
        }
        if let Some(error) = self.permanent_errors.get(name) {
            return Err(error.clone());
        }
        Ok(!self.missing.contains(name))
    }
}
