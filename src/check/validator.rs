//! Validator workers: pull references, check them, report failures.

use std::sync::Arc;

use tokio::sync::{Mutex, mpsc};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::error::SigCheckError;
use crate::gitee::{OrganizationName, RepositoryGateway, RepositoryName};

use super::{FailureReason, RetryPolicy, ValidationFailure};

/// Shared, read-only inputs for every worker in the pool.
pub struct ValidatorContext<G: ?Sized> {
    /// Existence-check collaborator.
    pub gateway: Arc<G>,
    /// Namespace references are resolved under.
    pub organization: OrganizationName,
    /// Retry policy for transient errors.
    pub retry: RetryPolicy,
}

/// Work queue shared by every worker; each reference is received once.
pub type SharedWorkQueue = Arc<Mutex<mpsc::Receiver<RepositoryName>>>;

/// Result of checking one reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// The repository exists.
    Exists,
    /// The check finished and the reference could not be confirmed.
    Failed(ValidationFailure),
    /// Cancellation cut the retries short; the reference was not fully
    /// checked.
    Abandoned(ValidationFailure),
}

/// Runs one worker until the work queue is closed and drained or `cancel`
/// fires, returning how many references it fully checked.
///
/// An in-flight API call always completes; cancellation is observed between
/// references and during retry delays.
pub async fn run_validator<G>(
    worker_id: usize,
    context: Arc<ValidatorContext<G>>,
    work: SharedWorkQueue,
    results: mpsc::Sender<ValidationFailure>,
    cancel: CancellationToken,
) -> usize
where
    G: RepositoryGateway + ?Sized,
{
    debug!(worker_id, "validator started");
    let mut checked = 0_usize;

    while let Some(repository) = next_reference(&work, &cancel).await {
        let failure = match validate_reference(&context, repository, &cancel).await {
            Verdict::Exists => {
                checked += 1;
                continue;
            }
            Verdict::Failed(failure) => {
                checked += 1;
                failure
            }
            Verdict::Abandoned(failure) => failure,
        };
        if results.send(failure).await.is_err() {
            warn!(worker_id, "results queue closed; stopping validator");
            break;
        }
    }

    debug!(worker_id, checked, "validator finished");
    checked
}

async fn next_reference(work: &SharedWorkQueue, cancel: &CancellationToken) -> Option<RepositoryName> {
    if cancel.is_cancelled() {
        return None;
    }
    tokio::select! {
        biased;
        () = cancel.cancelled() => None,
        repository = async { work.lock().await.recv().await } => repository,
    }
}

/// Checks one reference, retrying transient errors per the policy.
pub async fn validate_reference<G>(
    context: &ValidatorContext<G>,
    repository: RepositoryName,
    cancel: &CancellationToken,
) -> Verdict
where
    G: RepositoryGateway + ?Sized,
{
    let organization = &context.organization;
    let mut attempt = 1_u32;

    loop {
        let error = match context
            .gateway
            .repository_exists(organization, &repository)
            .await
        {
            Ok(true) => {
                debug!(repository = %repository, "repository exists");
                return Verdict::Exists;
            }
            Ok(false) => {
                warn!(organization = %organization, repository = %repository, "repository not found");
                return Verdict::Failed(ValidationFailure::new(
                    repository,
                    FailureReason::NotFound,
                ));
            }
            Err(error) => error,
        };

        if !error.is_transient() || attempt >= context.retry.attempts {
            return Verdict::Failed(unverified(repository, &error, attempt));
        }

        warn!(
            repository = %repository,
            attempt,
            error = %error,
            "transient error checking repository; retrying"
        );
        if let SigCheckError::RateLimitExceeded {
            rate_limit: Some(info),
            ..
        } = &error
        {
            debug!(
                seconds_until_reset = info.seconds_until_reset(),
                "rate limit window"
            );
        }

        tokio::select! {
            biased;
            () = cancel.cancelled() => {
                return Verdict::Abandoned(unverified(repository, &error, attempt));
            }
            () = tokio::time::sleep(context.retry.delay) => {}
        }
        attempt += 1;
    }
}

fn unverified(repository: RepositoryName, error: &SigCheckError, attempts: u32) -> ValidationFailure {
    warn!(
        repository = %repository,
        attempts,
        error = %error,
        "could not verify repository"
    );
    ValidationFailure::new(
        repository,
        FailureReason::Unverified {
            message: error.to_string(),
        },
    )
}
