use std::path::Path;

use tracing::debug;
use walkdir::WalkDir;

/// Sums regular-file sizes under a directory.
///
/// Unreadable entries count as 0 and never abort the walk. Symlinks are
/// never followed, so link cycles cannot make the walk revisit a directory.
#[derive(Debug, Clone, Copy, Default)]
pub struct SizeEstimator;

impl SizeEstimator {
    pub fn new() -> Self {
        Self
    }

    pub fn compute_size(&self, path: &Path) -> u64 {
        dir_size(path)
    }
}

/// Compute total size of a directory recursively.
pub fn dir_size(path: &Path) -> u64 {
    WalkDir::new(path)
        .follow_links(false)
        .into_iter()
        .filter_map(|e| match e {
            Ok(e) => Some(e),
            Err(err) => {
                debug!(error = %err, "skipping unreadable entry");
                None
            }
        })
        .filter(|e| e.file_type().is_file())
        .filter_map(|e| e.metadata().ok())
        .map(|m| m.len())
        .sum()
}

/// Get size of a file or directory without following symlinks.
pub fn entry_size(path: &Path) -> u64 {
    match std::fs::symlink_metadata(path) {
        Ok(meta) if meta.is_dir() => dir_size(path),
        Ok(meta) if meta.is_file() => meta.len(),
        _ => 0,
    }
}
