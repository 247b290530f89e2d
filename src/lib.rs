//! Finds and removes disposable cache/temp/crash-dump folders beneath user
//! profile roots.
//!
//! The engine (`scanner`, `deleter`, `worker`) runs on background threads and
//! reports through ordered event streams. Everything the user sees, from
//! selection state to formatted sizes, is built on top of those events.

pub mod app;
pub mod cancel;
pub mod classifier;
pub mod cli;
pub mod config;
pub mod deleter;
pub mod error;
pub mod events;
pub mod output;
pub mod privilege;
pub mod roots;
pub mod scanner;
pub mod size;
pub mod store;
pub mod utils;
pub mod worker;

pub use cancel::CancellationToken;
pub use classifier::{DirectoryClassifier, DEFAULT_KEYWORDS};
pub use config::Config;
pub use deleter::{DeletionEngine, DeletionOutcome, DeletionRequest, DeletionResult, Remover};
pub use error::{ConfigError, DeleteError, EngineError};
pub use events::{Candidate, DeleteEvent, EventSink, ScanEvent};
pub use scanner::{ScanEngine, ScanRequest, ScanSummary};
pub use size::SizeEstimator;
pub use store::ResultStore;
pub use worker::{DeleteHandle, ScanHandle, Workers};
