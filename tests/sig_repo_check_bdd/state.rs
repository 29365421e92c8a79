//! Scenario state and shared utilities for SIG repository check BDD tests.

use camino::Utf8PathBuf;
use rstest_bdd::Slot;
use rstest_bdd_macros::ScenarioState;
use sigcheck::{CheckSummary, SigCheckError};
use tempfile::TempDir;
use wiremock::MockServer;

pub(crate) use crate::support::runtime::{
    MockGitee, SharedRuntime, any_repository_path_pattern, ensure_mock_gitee,
    repository_request_path,
};

/// Organization every scenario checks repositories under.
pub(crate) const ORGANIZATION: &str = "open_euler";

#[derive(ScenarioState, Default)]
pub(crate) struct CheckState {
    pub(crate) runtime: Slot<SharedRuntime>,
    pub(crate) server: Slot<MockServer>,
    pub(crate) temp_dir: Slot<TempDir>,
    pub(crate) sig_path: Slot<Utf8PathBuf>,
    pub(crate) summary: Slot<CheckSummary>,
    pub(crate) error: Slot<SigCheckError>,
}

/// Ensures the runtime and mock server exist, panicking with context otherwise.
pub(crate) fn mock_gitee(check_state: &CheckState) -> MockGitee {
    ensure_mock_gitee(&check_state.runtime, &check_state.server)
        .unwrap_or_else(|error| panic!("failed to start mock Gitee API: {error}"))
}
