use std::path::{Path, PathBuf};

use crate::events::{Candidate, ScanEvent};

/// Candidates gathered from one scan plus the user's selection.
///
/// Lives on the foreground side and is only ever changed from received
/// events or explicit selection calls.
#[derive(Debug, Default)]
pub struct ResultStore {
    entries: Vec<Candidate>,
    selected: Vec<bool>, // parallel to entries
    current_path: Option<PathBuf>,
    finished: bool,
    cancelled: bool,
}

impl ResultStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one scan event into the store.
    pub fn apply(&mut self, event: &ScanEvent) {
        match event {
            ScanEvent::Progress { current, .. } => {
                self.current_path = Some(current.clone());
            }
            ScanEvent::CandidateFound(candidate) => {
                if !self.entries.iter().any(|e| e.path == candidate.path) {
                    self.entries.push(candidate.clone());
                    self.selected.push(false);
                }
            }
            ScanEvent::Complete { .. } => {
                self.finished = true;
                self.current_path = None;
            }
            ScanEvent::Cancelled { .. } => {
                self.finished = true;
                self.cancelled = true;
                self.current_path = None;
            }
        }
    }

    /// Forget everything; used when a new scan starts.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn was_cancelled(&self) -> bool {
        self.cancelled
    }

    pub fn current_path(&self) -> Option<&Path> {
        self.current_path.as_deref()
    }

    /// Entries in arrival order.
    pub fn entries(&self) -> &[Candidate] {
        &self.entries
    }

    pub fn is_selected(&self, path: &Path) -> bool {
        self.position(path)
            .map(|idx| self.selected[idx])
            .unwrap_or(false)
    }

    /// Returns false if `path` is not in the store.
    pub fn set_selected(&mut self, path: &Path, value: bool) -> bool {
        match self.position(path) {
            Some(idx) => {
                self.selected[idx] = value;
                true
            }
            None => false,
        }
    }

    pub fn select_all(&mut self) {
        self.set_all(true);
    }

    pub fn deselect_all(&mut self) {
        self.set_all(false);
    }

    /// Select exactly the entries for which `pred` holds.
    pub fn select_where<F>(&mut self, mut pred: F)
    where
        F: FnMut(&Candidate) -> bool,
    {
        for (entry, sel) in self.entries.iter().zip(self.selected.iter_mut()) {
            *sel = pred(entry);
        }
    }

    /// Selected paths in arrival order, ready for a deletion request.
    pub fn selected_paths(&self) -> Vec<PathBuf> {
        self.selected_entries().map(|e| e.path.clone()).collect()
    }

    pub fn selected_count(&self) -> usize {
        self.selected.iter().filter(|s| **s).count()
    }

    pub fn total_bytes(&self) -> u64 {
        self.entries.iter().map(|e| e.size_bytes).sum()
    }

    /// Total bytes of only the selected entries.
    pub fn selected_bytes(&self) -> u64 {
        self.selected_entries().map(|e| e.size_bytes).sum()
    }

    /// Largest first; ties keep discovery order.
    pub fn sorted_by_size(&self) -> Vec<&Candidate> {
        let mut view: Vec<&Candidate> = self.entries.iter().collect();
        view.sort_by(|a, b| b.size_bytes.cmp(&a.size_bytes));
        view
    }

    /// Drop an entry, e.g. after it has been deleted.
    pub fn remove(&mut self, path: &Path) -> Option<Candidate> {
        let idx = self.position(path)?;
        self.selected.remove(idx);
        Some(self.entries.remove(idx))
    }

    fn position(&self, path: &Path) -> Option<usize> {
        self.entries.iter().position(|e| e.path == path)
    }

    fn set_all(&mut self, val: bool) {
        for s in &mut self.selected {
            *s = val;
        }
    }

    fn selected_entries(&self) -> impl Iterator<Item = &Candidate> {
        self.entries
            .iter()
            .zip(self.selected.iter())
            .filter(|(_, sel)| **sel)
            .map(|(e, _)| e)
    }
}
