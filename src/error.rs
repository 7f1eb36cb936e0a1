//! Error types for hosts-file operations.

use std::time::Duration;

use thiserror::Error;

use crate::entry::RESERVED_HOSTNAMES;

/// Convenience alias used throughout the library.
pub type Result<T> = std::result::Result<T, HostsError>;

/// Errors surfaced while loading, editing, or saving a hosts file.
#[derive(Debug, Error)]
pub enum HostsError {
    /// Reading, writing, or locking the backing store failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The entry names a hostname that tooling must never manage.
    #[error("the following hostnames cannot be configured: {}", RESERVED_HOSTNAMES.join(", "))]
    ReservedHostname,

    /// A line this instance wants to rewrite or delete changed on disk
    /// after it was loaded.
    #[error("hosts file write conflict: line {line} has been modified by another process")]
    WriteConflict { line: usize },

    /// The file stayed locked by another process for the whole retry window.
    #[error("unable to acquire file lock after {} seconds", .wait.as_secs_f64())]
    LockTimeout {
        wait: Duration,
        #[source]
        source: std::io::Error,
    },
}
