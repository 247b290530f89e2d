use std::path::{Path, PathBuf};
use std::time::Instant;

use tracing::{debug, info};

use crate::cancel::CancellationToken;
use crate::classifier::DirectoryClassifier;
use crate::events::{Candidate, EventSink, ScanEvent};
use crate::size::SizeEstimator;

/// What to scan. Roots keep caller order; duplicates are dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanRequest {
    roots: Vec<PathBuf>,
    max_depth: usize,
}

impl ScanRequest {
    /// `max_depth == 0` means unbounded.
    pub fn new<I, P>(roots: I, max_depth: usize) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        let mut unique: Vec<PathBuf> = Vec::new();
        for root in roots {
            let root = root.into();
            if !unique.contains(&root) {
                unique.push(root);
            }
        }
        Self {
            roots: unique,
            max_depth,
        }
    }

    pub fn roots(&self) -> &[PathBuf] {
        &self.roots
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Whether the children of a non-matching directory at `depth` get examined.
    fn descends_into(&self, depth: usize) -> bool {
        self.max_depth == 0 || depth < self.max_depth
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanSummary {
    pub total: u64,
    pub cancelled: bool,
}

/// Children still to visit in one directory.
struct Frame {
    children: std::vec::IntoIter<PathBuf>,
    depth: usize,
}

/// Depth-first walker that reports disposable directories as it finds them.
#[derive(Debug, Clone, Default)]
pub struct ScanEngine {
    classifier: DirectoryClassifier,
    sizer: SizeEstimator,
}

impl ScanEngine {
    pub fn new(classifier: DirectoryClassifier) -> Self {
        Self {
            classifier,
            sizer: SizeEstimator::new(),
        }
    }

    pub fn classifier(&self) -> &DirectoryClassifier {
        &self.classifier
    }

    /// Walk every root in order, emitting events into `sink`.
    ///
    /// Always ends with exactly one `Complete` or `Cancelled` event.
    pub fn scan<S>(
        &self,
        request: &ScanRequest,
        sink: &S,
        cancel: &CancellationToken,
    ) -> ScanSummary
    where
        S: EventSink<ScanEvent> + ?Sized,
    {
        let started = Instant::now();
        let mut found = 0u64;

        for root in request.roots() {
            if !self.walk_root(root, request, sink, cancel, &mut found) {
                info!(found, "scan cancelled");
                sink.emit(ScanEvent::Cancelled { found });
                return ScanSummary {
                    total: found,
                    cancelled: true,
                };
            }
        }

        info!(
            found,
            roots = request.roots().len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "scan complete"
        );
        sink.emit(ScanEvent::Complete { total: found });
        ScanSummary {
            total: found,
            cancelled: false,
        }
    }

    /// Returns false if cancellation was observed.
    fn walk_root<S>(
        &self,
        root: &Path,
        request: &ScanRequest,
        sink: &S,
        cancel: &CancellationToken,
        found: &mut u64,
    ) -> bool
    where
        S: EventSink<ScanEvent> + ?Sized,
    {
        if cancel.is_cancelled() {
            return false;
        }
        sink.emit(ScanEvent::Progress {
            found: *found,
            current: root.to_path_buf(),
        });
        let mut stack = vec![Frame {
            children: list_subdirs(root).into_iter(),
            depth: 0,
        }];

        while let Some(frame) = stack.last_mut() {
            let Some(child) = frame.children.next() else {
                stack.pop();
                continue;
            };
            let depth = frame.depth + 1;

            if cancel.is_cancelled() {
                return false;
            }

            let name = child
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();

            if self.classifier.matches(&name) {
                let size = self.sizer.compute_size(&child);
                if size == 0 {
                    debug!(path = %child.display(), "skipping empty match");
                    continue;
                }
                *found += 1;
                debug!(path = %child.display(), size, "candidate");
                sink.emit(ScanEvent::CandidateFound(Candidate {
                    path: child,
                    size_bytes: size,
                    discovered_at: *found,
                }));
                continue;
            }

            if request.descends_into(depth) {
                sink.emit(ScanEvent::Progress {
                    found: *found,
                    current: child.clone(),
                });
                stack.push(Frame {
                    children: list_subdirs(&child).into_iter(),
                    depth,
                });
            }
        }
        true
    }
}

/// Immediate subdirectories of `path`, in listing order. Symlinks are not
/// followed. An unreadable directory has no children.
fn list_subdirs(path: &Path) -> Vec<PathBuf> {
    let read_dir = match std::fs::read_dir(path) {
        Ok(rd) => rd,
        Err(e) => {
            debug!(path = %path.display(), error = %e, "cannot list directory");
            return Vec::new();
        }
    };

    read_dir
        .flatten()
        .filter(|entry| entry.file_type().map(|t| t.is_dir()).unwrap_or(false))
        .map(|entry| entry.path())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::sync::Mutex;

    fn write(path: &Path, len: usize) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, vec![0u8; len]).unwrap();
    }

    fn run(request: &ScanRequest) -> (ScanSummary, Vec<ScanEvent>) {
        let sink = Mutex::new(Vec::<ScanEvent>::new());
        let summary = ScanEngine::default().scan(request, &sink, &CancellationToken::new());
        (summary, sink.into_inner().unwrap())
    }

    fn candidates(events: &[ScanEvent]) -> Vec<Candidate> {
        events
            .iter()
            .filter_map(|e| match e {
                ScanEvent::CandidateFound(c) => Some(c.clone()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn match_is_sized_and_not_descended() {
        let root = tempfile::tempdir().unwrap();
        let cache = root.path().join("app/Cache");
        write(&cache.join("a"), 10);
        write(&cache.join("b"), 20);
        write(&cache.join("nested/temp/c"), 30);

        let (summary, events) = run(&ScanRequest::new([root.path()], 0));
        let found = candidates(&events);

        assert_eq!(found.len(), 1);
        assert_eq!(found[0].path, cache);
        assert_eq!(found[0].size_bytes, 60);
        assert_eq!(found[0].discovered_at, 1);
        assert_eq!(summary, ScanSummary { total: 1, cancelled: false });
        assert_eq!(events.last(), Some(&ScanEvent::Complete { total: 1 }));
    }

    #[test]
    fn empty_match_is_skipped() {
        let root = tempfile::tempdir().unwrap();
        fs::create_dir_all(root.path().join("temp/empty_sub/cache_inside")).unwrap();

        let (summary, events) = run(&ScanRequest::new([root.path()], 0));

        assert!(candidates(&events).is_empty());
        assert_eq!(summary.total, 0);
        // Nothing below the empty match was listed.
        assert!(!events.iter().any(|e| matches!(
            e,
            ScanEvent::Progress { current, .. } if current.starts_with(root.path().join("temp"))
        )));
    }

    #[test]
    fn depth_limit_bounds_descent() {
        let root = tempfile::tempdir().unwrap();
        write(&root.path().join("vendor/crashes/dump.bin"), 5);

        let (_, shallow) = run(&ScanRequest::new([root.path()], 1));
        assert!(candidates(&shallow).is_empty());

        let (_, deep) = run(&ScanRequest::new([root.path()], 2));
        assert_eq!(candidates(&deep).len(), 1);

        let (_, unbounded) = run(&ScanRequest::new([root.path()], 0));
        assert_eq!(candidates(&unbounded).len(), 1);
    }

    #[test]
    fn unbounded_finds_deep_matches() {
        let root = tempfile::tempdir().unwrap();
        write(&root.path().join("a/b/c/d/e/GPUCache/data_0"), 3);

        let (_, events) = run(&ScanRequest::new([root.path()], 0));
        assert_eq!(candidates(&events)[0].size_bytes, 3);
    }

    #[test]
    fn roots_are_scanned_in_order() {
        let first = tempfile::tempdir().unwrap();
        let second = tempfile::tempdir().unwrap();
        write(&first.path().join("x/cache/f"), 1);
        write(&first.path().join("y/temp/f"), 2);
        write(&second.path().join("dump/f"), 3);

        let (summary, events) = run(&ScanRequest::new([first.path(), second.path()], 0));
        let found = candidates(&events);

        assert_eq!(summary.total, 3);
        assert_eq!(events.last(), Some(&ScanEvent::Complete { total: 3 }));
        assert!(found[..2].iter().all(|c| c.path.starts_with(first.path())));
        assert!(found[2].path.starts_with(second.path()));
        let seq: Vec<u64> = found.iter().map(|c| c.discovered_at).collect();
        assert_eq!(seq, vec![1, 2, 3]);
    }

    #[test]
    fn duplicate_roots_are_dropped() {
        let root = tempfile::tempdir().unwrap();
        write(&root.path().join("cache/f"), 1);

        let request = ScanRequest::new([root.path(), root.path()], 0);
        assert_eq!(request.roots().len(), 1);
        assert_eq!(run(&request).0.total, 1);
    }

    #[test]
    fn missing_root_is_treated_as_empty() {
        let root = tempfile::tempdir().unwrap();
        let (summary, events) = run(&ScanRequest::new([root.path().join("nope")], 0));
        assert_eq!(summary.total, 0);
        assert_eq!(events.last(), Some(&ScanEvent::Complete { total: 0 }));
    }

    #[test]
    fn progress_counts_never_decrease() {
        let root = tempfile::tempdir().unwrap();
        write(&root.path().join("a/cache/f"), 1);
        write(&root.path().join("b/c/temp/f"), 1);
        write(&root.path().join("d/e/f/report/f"), 1);

        let (_, events) = run(&ScanRequest::new([root.path()], 0));
        let counts: Vec<u64> = events
            .iter()
            .filter_map(|e| match e {
                ScanEvent::Progress { found, .. } => Some(*found),
                _ => None,
            })
            .collect();
        assert!(counts.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn cancelled_before_start_emits_nothing_else() {
        let root = tempfile::tempdir().unwrap();
        write(&root.path().join("cache/f"), 1);

        let token = CancellationToken::new();
        token.cancel();
        let sink = Mutex::new(Vec::<ScanEvent>::new());
        let summary =
            ScanEngine::default().scan(&ScanRequest::new([root.path()], 0), &sink, &token);

        assert_eq!(summary, ScanSummary { total: 0, cancelled: true });
        assert_eq!(sink.into_inner().unwrap(), vec![ScanEvent::Cancelled { found: 0 }]);
    }

    struct CancelOnFirstHit {
        events: Mutex<Vec<ScanEvent>>,
        token: CancellationToken,
    }

    impl EventSink<ScanEvent> for CancelOnFirstHit {
        fn emit(&self, event: ScanEvent) {
            if matches!(event, ScanEvent::CandidateFound(_)) {
                self.token.cancel();
            }
            self.events.lock().unwrap().push(event);
        }
    }

    #[test]
    fn cancellation_stops_at_next_boundary() {
        let root = tempfile::tempdir().unwrap();
        write(&root.path().join("cache/f"), 1);
        write(&root.path().join("temp/f"), 1);
        write(&root.path().join("dump/f"), 1);

        let token = CancellationToken::new();
        let sink = CancelOnFirstHit {
            events: Mutex::new(Vec::<ScanEvent>::new()),
            token: token.clone(),
        };
        let summary = ScanEngine::default().scan(&ScanRequest::new([root.path()], 0), &sink, &token);
        let events = sink.events.into_inner().unwrap();

        assert_eq!(summary, ScanSummary { total: 1, cancelled: true });
        assert_eq!(candidates(&events).len(), 1);
        assert_eq!(events.last(), Some(&ScanEvent::Cancelled { found: 1 }));
    }

    #[cfg(unix)]
    #[test]
    fn symlinked_dirs_are_not_followed() {
        let root = tempfile::tempdir().unwrap();
        let outside = tempfile::tempdir().unwrap();
        write(&outside.path().join("cache/f"), 4);
        std::os::unix::fs::symlink(outside.path(), root.path().join("link")).unwrap();
        std::os::unix::fs::symlink(outside.path().join("cache"), root.path().join("cache")).unwrap();

        let (summary, _) = run(&ScanRequest::new([root.path()], 0));
        assert_eq!(summary.total, 0);
    }
}
