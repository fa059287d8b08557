//! `StreamDevice` for local files.

use std::fs::File;
use std::io;

#[cfg(unix)]
use crate::domain::LockMode;
use crate::ports::StreamDevice;

impl StreamDevice for File {
    #[cfg(unix)]
    fn lock(&self, mode: LockMode) -> io::Result<()> {
        flock(self, mode.flock_operation())
    }

    #[cfg(unix)]
    fn unlock(&self) -> io::Result<()> {
        flock(self, libc::LOCK_UN)
    }

    fn set_len(&mut self, len: u64) -> io::Result<()> {
        File::set_len(self, len)
    }

    #[cfg(unix)]
    fn close(self) -> io::Result<()> {
        use std::os::fd::IntoRawFd;

        let fd = self.into_raw_fd();
        // SAFETY: `fd` was just released by `into_raw_fd`; ownership moves to this call.
        if unsafe { libc::close(fd) } == -1 {
            return Err(io::Error::last_os_error());
        }
        Ok(())
    }
}

#[cfg(unix)]
fn flock(file: &File, operation: libc::c_int) -> io::Result<()> {
    use std::os::fd::AsRawFd;

    loop {
        // SAFETY: the descriptor is owned by `file`, which outlives the call.
        if unsafe { libc::flock(file.as_raw_fd(), operation) } == 0 {
            return Ok(());
        }
        let err = io::Error::last_os_error();
        if err.kind() != io::ErrorKind::Interrupted {
            return Err(err);
        }
    }
}
