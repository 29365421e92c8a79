//! Collector stage: drains the results queue into the invalid project list.

use tokio::sync::mpsc;
use tracing::debug;

use super::ValidationFailure;

/// Receives failures until every sender has been dropped.
///
/// The list is in receipt order and is not deduplicated.
pub async fn collect_failures(
    mut results: mpsc::Receiver<ValidationFailure>,
) -> Vec<ValidationFailure> {
    let mut invalid_projects = Vec::new();
    while let Some(failure) = results.recv().await {
        debug!(failure = %failure, "collected failure");
        invalid_projects.push(failure);
    }
    invalid_projects
}
