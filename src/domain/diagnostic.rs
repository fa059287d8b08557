//! Diagnostic capture for failed native calls.
//!
//! The diagnostic is derived from the `io::Error` value the failing call
//! returned. There is no process-wide "last error" slot to consult.

use std::io;

/// Extract the human-readable diagnostic carried by a native error.
///
/// Returns `None` when the error carries no text.
pub fn capture(err: &io::Error) -> Option<String> {
    let text = match err.raw_os_error() {
        // Strip the " (os error N)" suffix; the errno is kept in the source error.
        Some(code) => io::Error::from_raw_os_error(code)
            .to_string()
            .split(" (os error")
            .next()
            .map(str::to_owned)
            .unwrap_or_default(),
        None => err.to_string(),
    };
    let text = text.trim();
    if text.is_empty() { None } else { Some(text.to_owned()) }
}

/// Whether the native call rejected the descriptor itself.
pub fn is_bad_descriptor(err: &io::Error) -> bool {
    #[cfg(unix)]
    {
        err.raw_os_error() == Some(libc::EBADF)
    }
    #[cfg(not(unix))]
    {
        let _ = err;
        false
    }
}
