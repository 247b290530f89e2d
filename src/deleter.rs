use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info};

use crate::cancel::CancellationToken;
use crate::error::DeleteError;
use crate::events::{DeleteEvent, EventSink};
use crate::size::entry_size;

/// Removes one path from disk, returning the bytes it occupied.
pub trait Remover: Send + Sync {
    fn remove(&self, path: &Path) -> io::Result<u64>;
}

/// Removes paths from the real filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsRemover;

impl Remover for FsRemover {
    fn remove(&self, path: &Path) -> io::Result<u64> {
        safe_remove(path)
    }
}

/// Remove a file or directory tree. Symlinks are unlinked, never followed.
pub fn safe_remove(path: &Path) -> io::Result<u64> {
    let meta = fs::symlink_metadata(path)?;
    let size = entry_size(path);
    if meta.is_dir() {
        fs::remove_dir_all(path)?;
    } else {
        fs::remove_file(path)?;
    }
    Ok(size)
}

/// Paths to delete, in order, first occurrence kept.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeletionRequest {
    paths: Vec<PathBuf>,
}

impl DeletionRequest {
    pub fn new<I, P>(paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        let mut unique: Vec<PathBuf> = Vec::new();
        for path in paths {
            let path = path.into();
            if !unique.contains(&path) {
                unique.push(path);
            }
        }
        Self { paths: unique }
    }

    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum DeletionOutcome {
    Removed { bytes_freed: u64 },
    Failed(DeleteError),
}

impl DeletionOutcome {
    pub fn is_removed(&self) -> bool {
        matches!(self, DeletionOutcome::Removed { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeletionResult {
    pub path: PathBuf,
    pub outcome: DeletionOutcome,
}

/// Deletes paths one after another; a failed path never stops the rest.
#[derive(Debug, Clone, Default)]
pub struct DeletionEngine<R = FsRemover> {
    remover: R,
}

impl DeletionEngine {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<R: Remover> DeletionEngine<R> {
    pub fn with_remover(remover: R) -> Self {
        Self { remover }
    }

    /// Attempt every path in order, emitting one `Progress` per attempt and
    /// a final `Complete`. Cancellation is honoured between paths only, in
    /// which case `Cancelled` replaces `Complete`.
    pub fn delete_all<S>(
        &self,
        request: &DeletionRequest,
        sink: &S,
        cancel: &CancellationToken,
    ) -> Vec<DeletionResult>
    where
        S: EventSink<DeleteEvent> + ?Sized,
    {
        let total = request.len();
        let mut results = Vec::with_capacity(total);
        let mut bytes_freed = 0u64;

        for (idx, path) in request.paths().iter().enumerate() {
            if cancel.is_cancelled() {
                info!(done = idx, total, "deletion cancelled");
                sink.emit(DeleteEvent::Cancelled { done: idx });
                return results;
            }

            let outcome = match self.remover.remove(path) {
                Ok(freed) => {
                    debug!(path = %path.display(), freed, "removed");
                    bytes_freed += freed;
                    DeletionOutcome::Removed { bytes_freed: freed }
                }
                Err(e) => {
                    debug!(path = %path.display(), error = %e, "failed to remove");
                    DeletionOutcome::Failed(DeleteError::from(e))
                }
            };

            sink.emit(DeleteEvent::Progress {
                done: idx + 1,
                total,
                path: path.clone(),
                error: match &outcome {
                    DeletionOutcome::Failed(e) => Some(e.clone()),
                    DeletionOutcome::Removed { .. } => None,
                },
            });
            results.push(DeletionResult {
                path: path.clone(),
                outcome,
            });
        }

        let removed = results.iter().filter(|r| r.outcome.is_removed()).count();
        let failed = results.len() - removed;
        info!(removed, failed, bytes_freed, "deletion complete");
        sink.emit(DeleteEvent::Complete {
            removed,
            failed,
            bytes_freed,
        });
        results
    }
}
