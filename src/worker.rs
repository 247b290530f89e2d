use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc};
use std::thread::{self, JoinHandle};

use tracing::error;

use crate::cancel::CancellationToken;
use crate::deleter::{DeletionEngine, DeletionRequest, DeletionResult};
use crate::error::EngineError;
use crate::events::{DeleteEvent, ScanEvent};
use crate::scanner::{ScanEngine, ScanRequest, ScanSummary};

/// A running background operation: its event stream, a cancel switch and
/// the thread's eventual result.
pub struct OperationHandle<E, T> {
    events: mpsc::Receiver<E>,
    cancel: CancellationToken,
    thread: JoinHandle<T>,
    op: &'static str,
}

pub type ScanHandle = OperationHandle<ScanEvent, ScanSummary>;
pub type DeleteHandle = OperationHandle<DeleteEvent, Vec<DeletionResult>>;

impl<E, T> OperationHandle<E, T> {
    pub fn events(&self) -> &mpsc::Receiver<E> {
        &self.events
    }

    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn is_finished(&self) -> bool {
        self.thread.is_finished()
    }

    /// Block until the worker exits.
    pub fn wait(self) -> Result<T, EngineError> {
        let op = self.op;
        self.thread.join().map_err(|_| {
            error!(op, "worker panicked");
            EngineError::WorkerPanicked(op)
        })
    }
}

/// Clears a busy flag when dropped, including during a panic.
struct BusyGuard(Arc<AtomicBool>);

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

fn claim(flag: &Arc<AtomicBool>, op: &'static str) -> Result<BusyGuard, EngineError> {
    flag.compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
        .map_err(|_| EngineError::AlreadyRunning(op))?;
    Ok(BusyGuard(Arc::clone(flag)))
}

/// Launches scans and deletions on background threads, one of each at a time.
#[derive(Default)]
pub struct Workers {
    scanner: Arc<ScanEngine>,
    scan_busy: Arc<AtomicBool>,
    delete_busy: Arc<AtomicBool>,
}

impl Workers {
    pub fn new(scanner: ScanEngine) -> Self {
        Self {
            scanner: Arc::new(scanner),
            ..Self::default()
        }
    }

    pub fn is_scanning(&self) -> bool {
        self.scan_busy.load(Ordering::SeqCst)
    }

    pub fn is_deleting(&self) -> bool {
        self.delete_busy.load(Ordering::SeqCst)
    }

    pub fn start_scan(&self, request: ScanRequest) -> Result<ScanHandle, EngineError> {
        let guard = claim(&self.scan_busy, "scan")?;
        let (tx, rx) = mpsc::channel::<ScanEvent>();
        let cancel = CancellationToken::new();
        let token = cancel.clone();
        let scanner = Arc::clone(&self.scanner);

        let thread = thread::Builder::new()
            .name("tidycache-scan".to_string())
            .spawn(move || {
                let _guard = guard;
                scanner.scan(&request, &tx, &token)
            })?;

        Ok(OperationHandle {
            events: rx,
            cancel,
            thread,
            op: "scan",
        })
    }

    pub fn start_deletion<I, P>(&self, paths: I) -> Result<DeleteHandle, EngineError>
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        let guard = claim(&self.delete_busy, "deletion")?;
        let request = DeletionRequest::new(paths);
        let (tx, rx) = mpsc::channel::<DeleteEvent>();
        let cancel = CancellationToken::new();
        let token = cancel.clone();

        let thread = thread::Builder::new()
            .name("tidycache-delete".to_string())
            .spawn(move || {
                let _guard = guard;
                DeletionEngine::new().delete_all(&request, &tx, &token)
            })?;

        Ok(OperationHandle {
            events: rx,
            cancel,
            thread,
            op: "deletion",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn scan_streams_events_then_completes() {
        let root = tempfile::tempdir().unwrap();
        fs::create_dir_all(root.path().join("app/cache")).unwrap();
        fs::write(root.path().join("app/cache/blob"), vec![0u8; 12]).unwrap();

        let workers = Workers::default();
        let handle = workers
            .start_scan(ScanRequest::new([root.path()], 0))
            .unwrap();
        let events: Vec<ScanEvent> = handle.events().iter().collect();
        let summary = handle.wait().unwrap();

        assert_eq!(summary.total, 1);
        assert!(events
            .iter()
            .any(|e| matches!(e, ScanEvent::CandidateFound(c) if c.size_bytes == 12)));
        assert_eq!(events.last(), Some(&ScanEvent::Complete { total: 1 }));
        assert!(!workers.is_scanning());
    }

    #[test]
    fn second_scan_is_rejected_while_busy() {
        let root = tempfile::tempdir().unwrap();
        let workers = Workers::default();

        let held = claim(&workers.scan_busy, "scan").unwrap();
        assert!(workers.is_scanning());
        let err = workers
            .start_scan(ScanRequest::new([root.path()], 0))
            .err()
            .unwrap();
        assert!(matches!(err, EngineError::AlreadyRunning("scan")));

        drop(held);
        let handle = workers
            .start_scan(ScanRequest::new([root.path()], 0))
            .unwrap();
        handle.wait().unwrap();
    }

    #[test]
    fn deletion_runs_in_background() {
        let root = tempfile::tempdir().unwrap();
        let victim = root.path().join("Temp");
        fs::create_dir_all(&victim).unwrap();
        fs::write(victim.join("x"), b"abc").unwrap();

        let workers = Workers::default();
        let handle = workers.start_deletion([&victim]).unwrap();
        let events: Vec<DeleteEvent> = handle.events().iter().collect();
        let results = handle.wait().unwrap();

        assert!(!victim.exists());
        assert_eq!(results.len(), 1);
        assert!(results[0].outcome.is_removed());
        assert_eq!(
            events.last(),
            Some(&DeleteEvent::Complete {
                removed: 1,
                failed: 0,
                bytes_freed: 3
            })
        );
        assert!(!workers.is_deleting());
    }

    #[test]
    fn scan_and_deletion_may_overlap() {
        let workers = Workers::default();

        let _scan_held = claim(&workers.scan_busy, "scan").unwrap();
        let handle = workers.start_deletion(Vec::<PathBuf>::new()).unwrap();
        assert!(handle.wait().unwrap().is_empty());
    }
}
