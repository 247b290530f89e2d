/// Whether the process runs with administrator (Windows) or root (Unix) rights.
#[cfg(windows)]
pub fn is_elevated() -> bool {
    ::is_elevated::is_elevated()
}

#[cfg(unix)]
pub fn is_elevated() -> bool {
    // SAFETY: geteuid has no preconditions and cannot fail.
    unsafe { libc::geteuid() == 0 }
}

#[cfg(not(any(windows, unix)))]
pub fn is_elevated() -> bool {
    false
}

/// Elevation is only enforced on Windows.
pub fn elevation_required() -> bool {
    cfg!(windows)
}

/// True when startup should refuse to continue.
pub fn missing_required_elevation() -> bool {
    elevation_required() && !is_elevated()
}
