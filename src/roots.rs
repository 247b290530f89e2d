use std::path::PathBuf;

/// Windows profile roots derived through `lookup` (normally `std::env::var`).
///
/// Yields roaming AppData, local AppData and its LocalLow sibling. Unset or
/// missing directories are dropped.
pub fn windows_profile_roots<F>(lookup: F) -> Vec<PathBuf>
where
    F: Fn(&str) -> Option<String>,
{
    let roaming = lookup("APPDATA");
    let local = lookup("LOCALAPPDATA");
    let local_low = local.as_ref().map(|l| l.replace("Local", "LocalLow"));

    existing_unique([roaming, local, local_low].into_iter().flatten().map(PathBuf::from))
}

/// Default scan roots for the current platform.
pub fn default_roots() -> Vec<PathBuf> {
    if cfg!(windows) {
        windows_profile_roots(|key| std::env::var(key).ok())
    } else {
        existing_unique(
            [dirs::cache_dir(), dirs::config_dir(), dirs::data_local_dir()]
                .into_iter()
                .flatten(),
        )
    }
}

/// Keep directories that exist, first occurrence only.
fn existing_unique<I>(candidates: I) -> Vec<PathBuf>
where
    I: IntoIterator<Item = PathBuf>,
{
    let mut roots: Vec<PathBuf> = Vec::new();
    for path in candidates {
        if path.as_os_str().is_empty() || !path.is_dir() {
            continue;
        }
        if !roots.contains(&path) {
            roots.push(path);
        }
    }
    roots
}
