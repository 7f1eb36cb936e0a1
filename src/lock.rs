//! Bounded retry for lock-contention failures.

use std::io;
use std::thread;
use std::time::{Duration, Instant};

use crate::error::{HostsError, Result};

/// Delay between attempts while the file stays locked.
const RETRY_INTERVAL: Duration = Duration::from_millis(50);

/// Runs `op`, retrying lock-contention failures until `wait` has elapsed.
///
/// A zero `wait` tries exactly once and reports the raw failure. Otherwise
/// contention failures are retried every 50 ms; once the deadline passes,
/// the last one is wrapped in [`HostsError::LockTimeout`]. Errors that are
/// not lock contention propagate immediately.
pub fn retry_on_lock<T>(wait: Duration, mut op: impl FnMut() -> Result<T>) -> Result<T> {
    if wait.is_zero() {
        return op();
    }

    let start = Instant::now();
    loop {
        let err = match op() {
            Ok(value) => return Ok(value),
            Err(err) => err,
        };
        match err {
            HostsError::Io(source) if is_lock_contention(&source) => {
                if start.elapsed() >= wait {
                    return Err(HostsError::LockTimeout { wait, source });
                }
                tracing::debug!(error = %source, "hosts file locked, retrying");
                thread::sleep(RETRY_INTERVAL);
            }
            other => return Err(other),
        }
    }
}

/// Whether an I/O failure means another process holds the file lock.
pub fn is_lock_contention(err: &io::Error) -> bool {
    if err.kind() == io::ErrorKind::WouldBlock {
        return true;
    }
    err.raw_os_error().is_some_and(is_contention_code)
}

#[cfg(unix)]
fn is_contention_code(code: i32) -> bool {
    code == libc::EAGAIN || code == libc::EWOULDBLOCK
}

#[cfg(windows)]
fn is_contention_code(code: i32) -> bool {
    // ERROR_SHARING_VIOLATION and ERROR_LOCK_VIOLATION
    code == 32 || code == 33
}

#[cfg(not(any(unix, windows)))]
fn is_contention_code(_code: i32) -> bool {
    false
}
