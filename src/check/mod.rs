//! Concurrent validation pipeline for SIG repository references.
//!
//! The pipeline has three stages connected by two bounded queues:
//!
//! 1. the scanner ([`crate::sig::scan_sig_yaml`]) streams references onto the
//!    work queue;
//! 2. a fixed pool of validators ([`validator::run_validator`]) checks each
//!    reference against a [`RepositoryGateway`] and emits failures onto the
//!    results queue;
//! 3. the collector ([`collector::collect_failures`]) drains the results
//!    queue into the invalid project list.
//!
//! [`check_sig_repositories`] wires the stages together and only reads the
//! collected list after every worker has been joined and the results queue
//! has closed.

pub mod collector;
pub mod validator;

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use camino::Utf8Path;
use tokio::sync::{Mutex, mpsc};
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use crate::error::SigCheckError;
use crate::gitee::{OrganizationName, RepositoryGateway, RepositoryName};
use crate::sig::{ensure_sig_file_exists, scan_sig_yaml};

use self::collector::collect_failures;
use self::validator::{ValidatorContext, run_validator};

/// Default number of concurrent validators.
pub const DEFAULT_WORKERS: usize = 5;
/// Default capacity of the work and results queues.
pub const DEFAULT_QUEUE_CAPACITY: usize = 50;

/// Why a repository reference could not be confirmed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureReason {
    /// The API answered that the repository does not exist.
    NotFound,
    /// The check could not be completed.
    Unverified {
        /// The last error observed for this reference.
        message: String,
    },
}

/// One repository reference that could not be confirmed to exist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationFailure {
    repository: RepositoryName,
    reason: FailureReason,
}

impl ValidationFailure {
    /// Creates a failure record.
    #[must_use]
    pub const fn new(repository: RepositoryName, reason: FailureReason) -> Self {
        Self { repository, reason }
    }

    /// The repository that failed.
    #[must_use]
    pub const fn repository(&self) -> &RepositoryName {
        &self.repository
    }

    /// Why it failed.
    #[must_use]
    pub const fn reason(&self) -> &FailureReason {
        &self.reason
    }
}

impl fmt::Display for ValidationFailure {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.reason {
            FailureReason::NotFound => write!(formatter, "{}", self.repository),
            FailureReason::Unverified { message } => {
                write!(formatter, "{} ({message})", self.repository)
            }
        }
    }
}

/// Bounded retry policy for transient API errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts per reference, including the first.
    pub attempts: u32,
    /// Pause between attempts.
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: 2,
            delay: Duration::from_millis(500),
        }
    }
}

/// Explicit settings for one pipeline run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckOptions {
    /// Namespace every reference is resolved under.
    pub organization: OrganizationName,
    /// Number of concurrent validators.
    pub workers: usize,
    /// Capacity of the work and results queues.
    pub queue_capacity: usize,
    /// Retry policy for transient errors.
    pub retry: RetryPolicy,
}

impl CheckOptions {
    /// Options with default concurrency and retry settings.
    #[must_use]
    pub fn new(organization: OrganizationName) -> Self {
        Self {
            organization,
            workers: DEFAULT_WORKERS,
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            retry: RetryPolicy::default(),
        }
    }
}

/// Outcome of a run in which every reference resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckSummary {
    /// Number of references scanned and checked.
    pub scanned: usize,
}

/// Checks every repository referenced by the SIG file at `path`.
///
/// # Errors
///
/// - [`SigCheckError::SigFileNotFound`] before any work when the file is
///   missing;
/// - the scanner's load errors, after in-flight work has drained;
/// - [`SigCheckError::WorkerFailed`] when a validator panicked;
/// - [`SigCheckError::Interrupted`] when `cancel` fired while references were
///   still unqueued or unchecked, listing failures found so far;
/// - [`SigCheckError::InvalidProjects`] listing every reference that could
///   not be confirmed.
pub async fn check_sig_repositories<G>(
    path: &Utf8Path,
    gateway: Arc<G>,
    options: &CheckOptions,
    cancel: CancellationToken,
) -> Result<CheckSummary, SigCheckError>
where
    G: RepositoryGateway + ?Sized + 'static,
{
    validate_options(options)?;
    ensure_sig_file_exists(path)?;
    info!(
        path = %path,
        organization = %options.organization,
        workers = options.workers,
        "starting to validate all of the repos in sig file"
    );

    let (work_sender, work_receiver) = mpsc::channel::<RepositoryName>(options.queue_capacity);
    let (result_sender, result_receiver) =
        mpsc::channel::<ValidationFailure>(options.queue_capacity);
    let work_queue = Arc::new(Mutex::new(work_receiver));

    let collector = tokio::spawn(collect_failures(result_receiver));

    let context = Arc::new(ValidatorContext {
        gateway,
        organization: options.organization.clone(),
        retry: options.retry,
    });
    let workers: Vec<_> = (0..options.workers)
        .map(|worker_id| {
            tokio::spawn(run_validator(
                worker_id,
                Arc::clone(&context),
                Arc::clone(&work_queue),
                result_sender.clone(),
                cancel.clone(),
            ))
        })
        .collect();
    // Workers now hold the only handles on both queues: the results queue
    // closes when the last one exits, and the scanner stops if all of them die.
    drop(result_sender);
    drop(work_queue);

    let scan_result = scan_sig_yaml(path, work_sender, &cancel).await;

    let mut checked = 0_usize;
    let mut worker_panics = Vec::new();
    for (worker_id, handle) in workers.into_iter().enumerate() {
        match handle.await {
            Ok(count) => checked += count,
            Err(join_error) => {
                error!(worker_id, error = %join_error, "validator worker failed");
                worker_panics.push(format!("worker {worker_id}: {join_error}"));
            }
        }
    }

    let failures = collector.await.map_err(|join_error| SigCheckError::WorkerFailed {
        message: format!("collector: {join_error}"),
    })?;

    let scan = match scan_result {
        Ok(scan) => scan,
        Err(scan_error) => {
            for failure in &failures {
                warn!(failure = %failure, "failure collected before the scan error");
            }
            return Err(scan_error);
        }
    };

    if !worker_panics.is_empty() {
        return Err(SigCheckError::WorkerFailed {
            message: worker_panics.join("; "),
        });
    }

    if !scan.is_complete() || checked < scan.queued {
        warn!(
            queued = scan.queued,
            total = scan.total,
            checked,
            invalid = failures.len(),
            "check stopped before every reference was verified"
        );
        if cancel.is_cancelled() {
            return Err(SigCheckError::Interrupted { failures });
        }
        return Err(SigCheckError::WorkerFailed {
            message: format!(
                "validators stopped with {} of {} references unchecked",
                scan.total.saturating_sub(checked),
                scan.total
            ),
        });
    }

    if !failures.is_empty() {
        return Err(SigCheckError::InvalidProjects { failures });
    }

    info!(scanned = scan.total, "projects successfully verified");
    Ok(CheckSummary {
        scanned: scan.total,
    })
}

fn validate_options(options: &CheckOptions) -> Result<(), SigCheckError> {
    if options.workers == 0 {
        return Err(SigCheckError::Configuration {
            message: "at least one validator worker is required".to_owned(),
        });
    }
    if options.queue_capacity == 0 {
        return Err(SigCheckError::Configuration {
            message: "queue capacity must be at least 1".to_owned(),
        });
    }
    if options.retry.attempts == 0 {
        return Err(SigCheckError::Configuration {
            message: "retry attempts must be at least 1".to_owned(),
        });
    }
    Ok(())
}
