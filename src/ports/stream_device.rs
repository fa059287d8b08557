//! The device behind a stream handle.

use std::io::{self, Read, Seek, Write};

use crate::domain::LockMode;

/// Readable, writable, seekable resource a [`Stream`](crate::services::Stream) drives.
///
/// Lock, truncate and close hooks default to "unsupported" / plain drop so
/// in-memory devices only implement what they need.
pub trait StreamDevice: Read + Write + Seek {
    /// Acquire an advisory lock.
    fn lock(&self, mode: LockMode) -> io::Result<()> {
        let _ = mode;
        Err(io::Error::new(io::ErrorKind::Unsupported, "device does not support locking"))
    }

    /// Release an advisory lock.
    fn unlock(&self) -> io::Result<()> {
        Err(io::Error::new(io::ErrorKind::Unsupported, "device does not support locking"))
    }

    fn set_len(&mut self, len: u64) -> io::Result<()> {
        let _ = len;
        Err(io::Error::new(io::ErrorKind::Unsupported, "device does not support truncation"))
    }

    /// Release the device, reporting failure of the native close.
    fn close(self) -> io::Result<()>
    where
        Self: Sized,
    {
        drop(self);
        Ok(())
    }
}

impl StreamDevice for io::Cursor<Vec<u8>> {
    fn set_len(&mut self, len: u64) -> io::Result<()> {
        let len = usize::try_from(len)
            .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "length exceeds memory"))?;
        self.get_mut().resize(len, 0);
        Ok(())
    }
}
