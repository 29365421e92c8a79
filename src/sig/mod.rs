//! SIG ownership file loading and the scanner stage of the check pipeline.
//!
//! A SIG file lists, for each Special Interest Group, the repositories it
//! owns:
//!
//! ```yaml
//! sigs:
//! - name: Infrastructure
//!   repositories:
//!   - infrastructure
//!   - community
//! ```
//!
//! The whole document is parsed and every entry validated before the first
//! reference is queued, so a malformed file never leaks a partial prefix
//! into the pipeline.

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::ambient_authority;
use cap_std::fs_utf8::Dir;
use serde::Deserialize;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::error::SigCheckError;
use crate::gitee::RepositoryName;

#[derive(Debug, Deserialize)]
struct RawSigFile {
    #[serde(default)]
    sigs: Vec<RawSig>,
}

#[derive(Debug, Deserialize)]
struct RawSig {
    name: String,
    #[serde(default)]
    repositories: Vec<String>,
}

/// One SIG and the repositories it owns, in file order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sig {
    /// SIG display name.
    pub name: String,
    /// Validated repository references.
    pub repositories: Vec<RepositoryName>,
}

/// A parsed and validated SIG ownership file.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SigFile {
    sigs: Vec<Sig>,
}

impl SigFile {
    /// Parses SIG file content.
    ///
    /// # Errors
    ///
    /// Returns [`SigCheckError::MalformedSigFile`] when the content is empty,
    /// is not valid YAML of the expected shape, or names a repository that
    /// cannot be addressed through the API.
    pub fn parse(path: &Utf8Path, content: &str) -> Result<Self, SigCheckError> {
        let malformed = |message: String| SigCheckError::MalformedSigFile {
            path: path.to_string(),
            message,
        };

        if content.trim().is_empty() {
            return Err(malformed("file is empty".to_owned()));
        }

        let raw: RawSigFile =
            serde_yaml::from_str(content).map_err(|error| malformed(error.to_string()))?;

        let sigs = raw
            .sigs
            .into_iter()
            .map(|sig| {
                let repositories = sig
                    .repositories
                    .iter()
                    .map(|entry| RepositoryName::new(entry))
                    .collect::<Result<Vec<_>, _>>()
                    .map_err(|error| malformed(format!("sig `{}`: {error}", sig.name)))?;
                Ok(Sig {
                    name: sig.name,
                    repositories,
                })
            })
            .collect::<Result<Vec<_>, SigCheckError>>()?;

        Ok(Self { sigs })
    }

    /// SIGs in file order.
    #[must_use]
    pub fn sigs(&self) -> &[Sig] {
        &self.sigs
    }

    /// Total number of repository references across all SIGs.
    #[must_use]
    pub fn repository_count(&self) -> usize {
        self.sigs.iter().map(|sig| sig.repositories.len()).sum()
    }
}

/// Checks that the SIG file exists before any work starts.
///
/// # Errors
///
/// Returns [`SigCheckError::SigFileNotFound`] when nothing exists at `path`
/// and [`SigCheckError::SigFileUnreadable`] when existence cannot be
/// determined.
pub fn ensure_sig_file_exists(path: &Utf8Path) -> Result<(), SigCheckError> {
    match path.try_exists() {
        Ok(true) => Ok(()),
        Ok(false) => Err(SigCheckError::SigFileNotFound {
            path: path.to_string(),
        }),
        Err(error) => Err(SigCheckError::SigFileUnreadable {
            path: path.to_string(),
            message: error.to_string(),
        }),
    }
}

/// Reads, parses, and validates the SIG file at `path`.
///
/// # Errors
///
/// Returns [`SigCheckError::SigFileUnreadable`] when the file cannot be read
/// and [`SigCheckError::MalformedSigFile`] when its content is invalid.
pub fn load_sig_file(path: &Utf8Path) -> Result<SigFile, SigCheckError> {
    let unreadable = |message: String| SigCheckError::SigFileUnreadable {
        path: path.to_string(),
        message,
    };

    let parent = match path.parent() {
        Some(parent) if !parent.as_str().is_empty() => parent.to_path_buf(),
        _ => Utf8PathBuf::from("."),
    };
    let file_name = path
        .file_name()
        .ok_or_else(|| unreadable("path has no file name".to_owned()))?;

    let dir = Dir::open_ambient_dir(&parent, ambient_authority())
        .map_err(|error| unreadable(format!("failed to open directory '{parent}': {error}")))?;
    let content = dir
        .read_to_string(file_name)
        .map_err(|error| unreadable(error.to_string()))?;

    SigFile::parse(path, &content)
}

/// How far a scan got.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanReport {
    /// References handed to the work queue.
    pub queued: usize,
    /// References in the SIG file.
    pub total: usize,
}

impl ScanReport {
    /// Whether every reference in the file was queued.
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.queued == self.total
    }
}

/// Streams every repository reference in the SIG file onto `work_queue`.
///
/// The queue is closed when this function returns, on every path, because
/// the sender is consumed. Sending blocks while the queue is full. If
/// `cancel` fires the scan stops early; the report then shows fewer queued
/// references than the file holds.
///
/// # Errors
///
/// Returns the load errors of [`load_sig_file`]; nothing is queued in that
/// case.
pub async fn scan_sig_yaml(
    path: &Utf8Path,
    work_queue: mpsc::Sender<RepositoryName>,
    cancel: &CancellationToken,
) -> Result<ScanReport, SigCheckError> {
    let sig_file = load_sig_file(path)?;
    let total = sig_file.repository_count();
    info!(
        path = %path,
        sigs = sig_file.sigs().len(),
        repositories = total,
        "scanning SIG file"
    );

    let mut queued = 0_usize;
    for sig in sig_file.sigs {
        debug!(sig = %sig.name, repositories = sig.repositories.len(), "queueing SIG repositories");
        for repository in sig.repositories {
            tokio::select! {
                biased;
                () = cancel.cancelled() => {
                    warn!(queued, "scan cancelled before all references were queued");
                    return Ok(ScanReport { queued, total });
                }
                sent = work_queue.send(repository) => {
                    if sent.is_err() {
                        warn!(queued, "work queue closed before scan completed");
                        return Ok(ScanReport { queued, total });
                    }
                    queued += 1;
                }
            }
        }
    }

    debug!(queued, "scan complete");
    Ok(ScanReport { queued, total })
}
