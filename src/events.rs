use std::path::PathBuf;
use std::sync::{mpsc, Mutex};

use serde::Serialize;

use crate::error::DeleteError;

/// A directory found to be disposable: its name matched and it is not empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Candidate {
    pub path: PathBuf,
    pub size_bytes: u64,
    /// 1-based order of discovery within one scan.
    pub discovered_at: u64,
}

/// Messages sent from a scan thread to whoever consumes the results.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanEvent {
    /// About to list `current`. Safe to coalesce.
    Progress { found: u64, current: PathBuf },
    CandidateFound(Candidate),
    Complete { total: u64 },
    Cancelled { found: u64 },
}

/// Messages sent from a deletion thread.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteEvent {
    /// `done` is the 1-based index of the path just attempted.
    Progress {
        done: usize,
        total: usize,
        path: PathBuf,
        error: Option<DeleteError>,
    },
    Complete {
        removed: usize,
        failed: usize,
        bytes_freed: u64,
    },
    Cancelled { done: usize },
}

/// Where background work reports to. Implementations must not block for long.
pub trait EventSink<E>: Send {
    fn emit(&self, event: E);
}

impl<E: Send> EventSink<E> for mpsc::Sender<E> {
    fn emit(&self, event: E) {
        // A dropped receiver only means nobody is listening anymore.
        let _ = self.send(event);
    }
}

impl<E: Send> EventSink<E> for Mutex<Vec<E>> {
    fn emit(&self, event: E) {
        if let Ok(mut events) = self.lock() {
            events.push(event);
        }
    }
}
