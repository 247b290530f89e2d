use std::sync::{Arc, Mutex};
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use tracing::debug;

use crate::cancel::CancellationToken;
use crate::deleter::{DeletionOutcome, DeletionResult};
use crate::error::EngineError;
use crate::events::{DeleteEvent, ScanEvent};
use crate::scanner::{ScanEngine, ScanRequest, ScanSummary};
use crate::store::ResultStore;
use crate::utils::display_path;
use crate::worker::Workers;

/// Token of whatever operation is currently running, for the Ctrl-C handler.
#[derive(Clone, Default)]
pub struct Interrupt(Arc<Mutex<Option<CancellationToken>>>);

impl Interrupt {
    /// Cancel the running operation. Returns false if nothing was running.
    pub fn trigger(&self) -> bool {
        match self.0.lock() {
            Ok(slot) => match slot.as_ref() {
                Some(token) => {
                    token.cancel();
                    true
                }
                None => false,
            },
            Err(_) => false,
        }
    }

    fn arm(&self, token: CancellationToken) {
        if let Ok(mut slot) = self.0.lock() {
            *slot = Some(token);
        }
    }

    fn disarm(&self) {
        if let Ok(mut slot) = self.0.lock() {
            *slot = None;
        }
    }
}

/// Result of a clean pass as seen by the user.
#[derive(Debug, Default)]
pub struct CleanReport {
    pub results: Vec<DeletionResult>,
    pub bytes_freed: u64,
    pub cancelled: bool,
}

impl CleanReport {
    pub fn failed(&self) -> usize {
        self.results.iter().filter(|r| !r.outcome.is_removed()).count()
    }
}

/// Drives the background workers and keeps the results on this thread.
pub struct App {
    workers: Workers,
    store: ResultStore,
    interrupt: Interrupt,
    show_progress: bool,
}

impl App {
    pub fn new(scanner: ScanEngine, show_progress: bool) -> Self {
        Self {
            workers: Workers::new(scanner),
            store: ResultStore::new(),
            interrupt: Interrupt::default(),
            show_progress,
        }
    }

    pub fn interrupt(&self) -> Interrupt {
        self.interrupt.clone()
    }

    pub fn store(&self) -> &ResultStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut ResultStore {
        &mut self.store
    }

    fn progress_bar(&self, len: Option<u64>) -> ProgressBar {
        if !self.show_progress {
            return ProgressBar::hidden();
        }
        match len {
            Some(len) => {
                let pb = ProgressBar::new(len);
                if let Ok(style) = ProgressStyle::default_bar()
                    .template("[{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} | {msg}")
                {
                    pb.set_style(style.progress_chars("=>-"));
                }
                pb
            }
            None => {
                let pb = ProgressBar::new_spinner();
                if let Ok(style) = ProgressStyle::default_spinner()
                    .template("{spinner} [{elapsed_precise}] Found {pos} | Scanning: {msg}")
                {
                    pb.set_style(style);
                }
                pb.enable_steady_tick(Duration::from_millis(100));
                pb
            }
        }
    }

    /// Run a scan to completion, filling the store as events arrive.
    pub fn scan(&mut self, request: ScanRequest) -> Result<ScanSummary, EngineError> {
        self.store.clear();
        let handle = self.workers.start_scan(request)?;
        self.interrupt.arm(handle.token());
        let pb = self.progress_bar(None);

        for event in handle.events().iter() {
            self.store.apply(&event);
            match event {
                ScanEvent::Progress { found, current } => {
                    pb.set_position(found);
                    pb.set_message(display_path(&current));
                }
                ScanEvent::CandidateFound(candidate) => {
                    pb.set_position(candidate.discovered_at);
                }
                ScanEvent::Complete { .. } | ScanEvent::Cancelled { .. } => {}
            }
        }

        pb.finish_and_clear();
        self.interrupt.disarm();
        handle.wait()
    }

    /// Delete whatever is selected in the store, dropping removed entries.
    pub fn clean_selected(&mut self) -> Result<CleanReport, EngineError> {
        let paths = self.store.selected_paths();
        let handle = self.workers.start_deletion(paths)?;
        self.interrupt.arm(handle.token());
        let pb = self.progress_bar(Some(self.store.selected_count() as u64));
        let mut report = CleanReport::default();

        for event in handle.events().iter() {
            match event {
                DeleteEvent::Progress {
                    done, path, error, ..
                } => {
                    pb.set_position(done as u64);
                    pb.set_message(display_path(&path));
                    match error {
                        None => {
                            self.store.remove(&path);
                        }
                        Some(e) => debug!(path = %path.display(), error = %e, "not deleted"),
                    }
                }
                DeleteEvent::Complete { bytes_freed, .. } => {
                    report.bytes_freed = bytes_freed;
                }
                DeleteEvent::Cancelled { .. } => {
                    report.cancelled = true;
                }
            }
        }

        pb.finish_and_clear();
        self.interrupt.disarm();
        report.results = handle.wait()?;
        if report.cancelled {
            report.bytes_freed = report
                .results
                .iter()
                .map(|r| match r.outcome {
                    DeletionOutcome::Removed { bytes_freed } => bytes_freed,
                    DeletionOutcome::Failed(_) => 0,
                })
                .sum();
        }
        Ok(report)
    }
}
