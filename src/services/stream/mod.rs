//! Stream handles.
//!
//! A [`Stream`] is exclusively owned by its caller from open to close. Every
//! operation on a closed stream fails with [`FsErrorKind::InvalidHandle`];
//! closing an already-closed stream is a no-op. Locks are never taken
//! implicitly, and the stream is never closed on the caller's behalf after an
//! error (dropping it releases the descriptor without reporting).

mod record;
mod write;

use std::fs::File;
use std::io::{self, BufRead, BufReader, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use tracing::{debug, trace};

use crate::domain::{FsError, FsErrorKind, FsOperation, LockMode};
use crate::ports::StreamDevice;

use self::write::{WriteFailure, write_fully};

/// An open stream over a [`StreamDevice`].
#[derive(Debug)]
pub struct Stream<D: StreamDevice = File> {
    path: PathBuf,
    reader: Option<BufReader<D>>,
}

impl<D: StreamDevice> Stream<D> {
    /// Wrap an already-open device. `path` is used for error context only.
    pub fn new(path: impl AsRef<Path>, device: D) -> Self {
        Self { path: path.as_ref().to_path_buf(), reader: Some(BufReader::new(device)) }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_closed(&self) -> bool {
        self.reader.is_none()
    }

    /// The underlying device, unless the stream is closed.
    pub fn device(&self) -> Option<&D> {
        self.reader.as_ref().map(BufReader::get_ref)
    }

    fn split(&mut self, operation: FsOperation) -> Result<(&Path, &mut BufReader<D>), FsError> {
        let path = self.path.as_path();
        match self.reader.as_mut() {
            Some(reader) => Ok((path, reader)),
            None => Err(FsError::invalid_handle(operation, path)),
        }
    }

    /// Read up to `length` bytes. An empty result means end of stream.
    pub fn read(&mut self, length: usize) -> Result<Vec<u8>, FsError> {
        let (path, reader) = self.split(FsOperation::Read)?;
        let mut buf = Vec::with_capacity(length.min(64 * 1024));
        reader
            .by_ref()
            .take(length as u64)
            .read_to_end(&mut buf)
            .map_err(|err| FsError::io(FsOperation::Read, path, err))?;
        Ok(buf)
    }

    /// Read a single byte, or `None` at end of stream.
    pub fn read_byte(&mut self) -> Result<Option<u8>, FsError> {
        let (path, reader) = self.split(FsOperation::Read)?;
        let byte = fill(reader).map_err(|err| FsError::io(FsOperation::Read, path, err))?.first().copied();
        if byte.is_some() {
            reader.consume(1);
        }
        Ok(byte)
    }

    /// Read up to `terminator` (consumed, not returned) or `max_len` bytes.
    ///
    /// `max_len == 0` means no limit. Returns `None` when the stream is
    /// already at its end; an empty line is `Some(vec![])`.
    pub fn read_line(&mut self, max_len: usize, terminator: u8) -> Result<Option<Vec<u8>>, FsError> {
        let (path, reader) = self.split(FsOperation::Read)?;
        read_until_limit(reader, max_len, terminator)
            .map_err(|err| FsError::io(FsOperation::Read, path, err))
    }

    /// Write all of `data`, returning the number of bytes written.
    ///
    /// Short writes are retried with the unwritten remainder. A write call
    /// that commits nothing fails with [`FsErrorKind::WriteStalled`].
    pub fn write(&mut self, data: &[u8]) -> Result<usize, FsError> {
        self.write_bytes(FsOperation::Write, data)
    }

    fn write_bytes(&mut self, operation: FsOperation, data: &[u8]) -> Result<usize, FsError> {
        let (path, reader) = self.split(operation)?;
        discard_read_ahead(reader).map_err(|err| FsError::io(FsOperation::Seek, path, err))?;
        let written = write_fully(reader.get_mut(), data).map_err(|failure| match failure {
            WriteFailure::Stalled { written } => {
                FsError::new(FsErrorKind::WriteStalled, operation, path)
                    .with_diagnostic(format!("wrote {written} of {} bytes", data.len()))
            }
            WriteFailure::Io { written, source } => {
                debug!(path = %path.display(), written, total = data.len(), "write failed");
                FsError::io(operation, path, source)
            }
        })?;
        trace!(path = %path.display(), written, "wrote bytes");
        Ok(written)
    }

    /// Move the position, returning the new offset from the start.
    pub fn seek(&mut self, position: SeekFrom) -> Result<u64, FsError> {
        let (path, reader) = self.split(FsOperation::Seek)?;
        reader.seek(position).map_err(|err| FsError::io(FsOperation::Seek, path, err))
    }

    /// Current offset from the start, accounting for read-ahead.
    pub fn tell(&mut self) -> Result<u64, FsError> {
        let (path, reader) = self.split(FsOperation::Tell)?;
        reader.stream_position().map_err(|err| FsError::io(FsOperation::Tell, path, err))
    }

    pub fn rewind(&mut self) -> Result<(), FsError> {
        self.seek(SeekFrom::Start(0)).map(|_| ())
    }

    /// Whether no more bytes can be read from the current position.
    pub fn is_eof(&mut self) -> Result<bool, FsError> {
        let (path, reader) = self.split(FsOperation::Read)?;
        Ok(fill(reader).map_err(|err| FsError::io(FsOperation::Read, path, err))?.is_empty())
    }

    pub fn flush(&mut self) -> Result<(), FsError> {
        let (path, reader) = self.split(FsOperation::Flush)?;
        io::Write::flush(reader.get_mut()).map_err(|err| FsError::io(FsOperation::Flush, path, err))
    }

    /// Truncate or extend to `len` bytes. The position is unchanged.
    pub fn truncate(&mut self, len: u64) -> Result<(), FsError> {
        let (path, reader) = self.split(FsOperation::Truncate)?;
        discard_read_ahead(reader).map_err(|err| FsError::io(FsOperation::Seek, path, err))?;
        reader.get_mut().set_len(len).map_err(|err| FsError::io(FsOperation::Truncate, path, err))
    }

    /// Acquire an advisory lock. Failing to acquire it is always an error,
    /// including "would block" for non-blocking requests.
    pub fn lock(&mut self, mode: LockMode) -> Result<(), FsError> {
        let (path, reader) = self.split(FsOperation::Lock)?;
        debug!(path = %path.display(), ?mode, "locking");
        reader.get_ref().lock(mode).map_err(|err| FsError::io(FsOperation::Lock, path, err))
    }

    pub fn unlock(&mut self) -> Result<(), FsError> {
        let (path, reader) = self.split(FsOperation::Unlock)?;
        debug!(path = %path.display(), "unlocking");
        reader.get_ref().unlock().map_err(|err| FsError::io(FsOperation::Unlock, path, err))
    }

    /// Release the device. Closing a closed stream does nothing.
    pub fn close(&mut self) -> Result<(), FsError> {
        let Some(reader) = self.reader.take() else {
            trace!(path = %self.path.display(), "stream already closed");
            return Ok(());
        };
        debug!(path = %self.path.display(), "closing stream");
        reader.into_inner().close().map_err(|err| FsError::io(FsOperation::Close, &self.path, err))
    }
}

fn fill<R: BufRead + ?Sized>(reader: &mut R) -> io::Result<&[u8]> {
    loop {
        match reader.fill_buf() {
            Ok(_) => break,
            Err(err) if err.kind() == io::ErrorKind::Interrupted => {}
            Err(err) => return Err(err),
        }
    }
    reader.fill_buf()
}

/// Align the device position with the logical position before writing.
fn discard_read_ahead<D: StreamDevice>(reader: &mut BufReader<D>) -> io::Result<()> {
    if !reader.buffer().is_empty() {
        reader.seek(SeekFrom::Current(0))?;
    }
    Ok(())
}

fn read_until_limit<R: BufRead + ?Sized>(
    reader: &mut R,
    max_len: usize,
    terminator: u8,
) -> io::Result<Option<Vec<u8>>> {
    let limit = if max_len == 0 { usize::MAX } else { max_len };
    let mut line = Vec::new();
    let mut consumed_any = false;

    loop {
        let available = fill(reader)?;
        if available.is_empty() {
            return Ok(consumed_any.then_some(line));
        }
        consumed_any = true;

        let window = &available[..available.len().min(limit - line.len())];
        if let Some(index) = window.iter().position(|&b| b == terminator) {
            line.extend_from_slice(&window[..index]);
            reader.consume(index + 1);
            return Ok(Some(line));
        }
        let taken = window.len();
        line.extend_from_slice(window);
        reader.consume(taken);
        if line.len() >= limit {
            return Ok(Some(line));
        }
    }
}
