//! `Platform` implementation backed by `std::fs` and libc.

use std::ffi::OsString;
use std::fs::{self, File, FileTimes, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use crate::domain::OpenMode;
use crate::ports::{Access, Platform};

/// The local operating system.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsPlatform;

impl Platform for OsPlatform {
    fn metadata(&self, path: &Path) -> io::Result<fs::Metadata> {
        fs::metadata(path)
    }

    fn symlink_metadata(&self, path: &Path) -> io::Result<fs::Metadata> {
        fs::symlink_metadata(path)
    }

    fn access(&self, path: &Path, access: Access) -> io::Result<bool> {
        check_access(path, access)
    }

    fn canonicalize(&self, path: &Path) -> io::Result<PathBuf> {
        fs::canonicalize(path)
    }

    fn create_dir(&self, path: &Path, mode: u32) -> io::Result<()> {
        let mut builder = fs::DirBuilder::new();
        #[cfg(unix)]
        {
            use std::os::unix::fs::DirBuilderExt;
            builder.mode(mode);
        }
        #[cfg(not(unix))]
        let _ = mode;
        builder.create(path)
    }

    fn remove_file(&self, path: &Path) -> io::Result<()> {
        fs::remove_file(path)
    }

    fn remove_dir(&self, path: &Path) -> io::Result<()> {
        fs::remove_dir(path)
    }

    fn read_dir(&self, path: &Path) -> io::Result<Vec<OsString>> {
        let mut names = Vec::new();
        for entry in fs::read_dir(path)? {
            names.push(entry?.file_name());
        }
        Ok(names)
    }

    fn copy_file(&self, from: &Path, to: &Path) -> io::Result<u64> {
        fs::copy(from, to)
    }

    fn rename(&self, from: &Path, to: &Path) -> io::Result<()> {
        fs::rename(from, to)
    }

    fn symlink(&self, target: &Path, link: &Path) -> io::Result<()> {
        #[cfg(unix)]
        {
            std::os::unix::fs::symlink(target, link)
        }
        #[cfg(windows)]
        {
            if target.is_dir() {
                std::os::windows::fs::symlink_dir(target, link)
            } else {
                std::os::windows::fs::symlink_file(target, link)
            }
        }
    }

    fn read_link(&self, path: &Path) -> io::Result<PathBuf> {
        fs::read_link(path)
    }

    fn set_permissions(&self, path: &Path, mode: u32) -> io::Result<()> {
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(path, fs::Permissions::from_mode(mode))
        }
        #[cfg(not(unix))]
        {
            let mut perms = fs::metadata(path)?.permissions();
            perms.set_readonly(mode & 0o222 == 0);
            fs::set_permissions(path, perms)
        }
    }

    fn touch(
        &self,
        path: &Path,
        accessed: Option<SystemTime>,
        modified: Option<SystemTime>,
    ) -> io::Result<()> {
        // A read handle is enough to set times, and it also opens directories
        // and read-only files.
        let file = match File::open(path) {
            Ok(file) => file,
            Err(err)
                if matches!(err.kind(), io::ErrorKind::NotFound | io::ErrorKind::PermissionDenied) =>
            {
                OpenOptions::new().write(true).create(true).truncate(false).open(path)?
            }
            Err(err) => return Err(err),
        };
        let now = SystemTime::now();
        let times =
            FileTimes::new().set_accessed(accessed.unwrap_or(now)).set_modified(modified.unwrap_or(now));
        file.set_times(times)
    }

    fn read_file(&self, path: &Path) -> io::Result<Vec<u8>> {
        fs::read(path)
    }

    fn open(&self, path: &Path, mode: OpenMode) -> io::Result<File> {
        mode.options().open(path)
    }
}

#[cfg(unix)]
fn check_access(path: &Path, access: Access) -> io::Result<bool> {
    use std::ffi::CString;
    use std::os::unix::ffi::OsStrExt;

    let c_path = CString::new(path.as_os_str().as_bytes())
        .map_err(|err| io::Error::new(io::ErrorKind::InvalidInput, err))?;
    let flag = match access {
        Access::Read => libc::R_OK,
        Access::Write => libc::W_OK,
    };

    // SAFETY: `c_path` is a valid NUL-terminated string for the duration of the call.
    if unsafe { libc::access(c_path.as_ptr(), flag) } == 0 {
        return Ok(true);
    }

    let err = io::Error::last_os_error();
    match err.raw_os_error() {
        Some(libc::EACCES | libc::ENOENT | libc::ENOTDIR | libc::EROFS | libc::EPERM) => Ok(false),
        _ => Err(err),
    }
}

#[cfg(not(unix))]
fn check_access(path: &Path, access: Access) -> io::Result<bool> {
    let denied = |err: &io::Error| {
        matches!(err.kind(), io::ErrorKind::NotFound | io::ErrorKind::PermissionDenied)
    };
    match access {
        Access::Read => match File::open(path) {
            Ok(_) => Ok(true),
            Err(err) if denied(&err) => Ok(false),
            Err(err) => Err(err),
        },
        Access::Write => match fs::metadata(path) {
            Ok(meta) => Ok(!meta.permissions().readonly()),
            Err(err) if denied(&err) => Ok(false),
            Err(err) => Err(err),
        },
    }
}
