use std::io;
use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;

/// Why a single path could not be removed.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
pub enum DeleteError {
    #[error("not found")]
    NotFound,

    #[error("permission denied")]
    PermissionDenied,

    #[error("{message}")]
    Io {
        #[serde(skip)]
        kind: io::ErrorKind,
        message: String,
    },
}

impl From<io::Error> for DeleteError {
    fn from(err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::NotFound => DeleteError::NotFound,
            io::ErrorKind::PermissionDenied => DeleteError::PermissionDenied,
            kind => DeleteError::Io {
                kind,
                message: err.to_string(),
            },
        }
    }
}

/// Failures starting or finishing a background operation.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("a {0} is already running")]
    AlreadyRunning(&'static str),

    #[error("failed to spawn worker thread: {0}")]
    Spawn(#[from] io::Error),

    #[error("the {0} worker panicked")]
    WorkerPanicked(&'static str),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("cannot read config {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid config {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_errors_map_to_reasons() {
        let e: DeleteError = io::Error::from(io::ErrorKind::NotFound).into();
        assert_eq!(e, DeleteError::NotFound);

        let e: DeleteError = io::Error::from(io::ErrorKind::PermissionDenied).into();
        assert_eq!(e, DeleteError::PermissionDenied);

        let e: DeleteError = io::Error::new(io::ErrorKind::Other, "busy").into();
        assert!(matches!(e, DeleteError::Io { kind: io::ErrorKind::Other, .. }));
        assert_eq!(e.to_string(), "busy");
    }
}
