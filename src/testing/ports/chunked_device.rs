//! Test double for `StreamDevice` with a short-write sink.

use std::io::{self, Cursor, Read, Seek, SeekFrom, Write};

use crate::ports::StreamDevice;

/// In-memory device that accepts at most `max_per_call` bytes per write.
///
/// Optionally reports zero bytes written, or an error, once a given number
/// of bytes has been committed.
#[derive(Debug)]
pub struct ChunkedDevice {
    buffer: Cursor<Vec<u8>>,
    max_per_call: usize,
    stall_after: Option<usize>,
    fail_after: Option<usize>,
    committed: usize,
    write_calls: usize,
}

impl ChunkedDevice {
    pub fn new(max_per_call: usize) -> Self {
        Self {
            buffer: Cursor::new(Vec::new()),
            max_per_call,
            stall_after: None,
            fail_after: None,
            committed: 0,
            write_calls: 0,
        }
    }

    pub fn with_content(mut self, content: &[u8]) -> Self {
        self.buffer = Cursor::new(content.to_vec());
        self
    }

    /// Report `Ok(0)` once `bytes` have been committed.
    pub fn stall_after(mut self, bytes: usize) -> Self {
        self.stall_after = Some(bytes);
        self
    }

    /// Report an error once `bytes` have been committed.
    pub fn fail_after(mut self, bytes: usize) -> Self {
        self.fail_after = Some(bytes);
        self
    }

    pub fn write_calls(&self) -> usize {
        self.write_calls
    }

    pub fn contents(&self) -> &[u8] {
        self.buffer.get_ref()
    }
}

impl Read for ChunkedDevice {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.buffer.read(buf)
    }
}

impl Write for ChunkedDevice {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.write_calls += 1;
        if self.fail_after.is_some_and(|limit| self.committed >= limit) {
            return Err(io::Error::new(io::ErrorKind::Other, "device write failure"));
        }
        if self.stall_after.is_some_and(|limit| self.committed >= limit) {
            return Ok(0);
        }
        let accepted = buf.len().min(self.max_per_call);
        let written = self.buffer.write(&buf[..accepted])?;
        self.committed += written;
        Ok(written)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Seek for ChunkedDevice {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        self.buffer.seek(pos)
    }
}

impl StreamDevice for ChunkedDevice {}
