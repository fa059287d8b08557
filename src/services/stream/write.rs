//! Full-buffer write loop.

use std::io::{self, Write};

/// Why a full write stopped short.
#[derive(Debug)]
pub(crate) enum WriteFailure {
    /// A write call committed zero bytes (for example, the disk is full).
    Stalled { written: usize },
    /// A write call failed outright.
    Io { written: usize, source: io::Error },
}

/// Write every byte of `data`, retrying short writes with the unwritten suffix.
///
/// Returns the number of bytes committed, which equals `data.len()` on success.
pub(crate) fn write_fully<W: Write + ?Sized>(
    sink: &mut W,
    data: &[u8],
) -> Result<usize, WriteFailure> {
    let mut written = 0;
    while written < data.len() {
        match sink.write(&data[written..]) {
            Ok(0) => return Err(WriteFailure::Stalled { written }),
            Ok(n) => written += n,
            Err(err) if err.kind() == io::ErrorKind::Interrupted => {}
            Err(source) => return Err(WriteFailure::Io { written, source }),
        }
    }
    Ok(written)
}
