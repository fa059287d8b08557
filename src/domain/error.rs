use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use super::diagnostic;

/// Classification of a filesystem failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FsErrorKind {
    /// The native call failed or returned an ambiguous result.
    Io,
    /// The stream handle was closed, or its descriptor is no longer valid.
    InvalidHandle,
    /// A write call committed zero bytes before the buffer was exhausted.
    WriteStalled,
    /// A delimited record could not be parsed.
    MalformedRecord,
    /// The caller supplied an argument the operation cannot act on.
    InvalidInput,
}

/// The operation that was being attempted when a failure occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FsOperation {
    CheckExistence,
    Stat,
    CheckAccess,
    CreateDirectory,
    Rename,
    Copy,
    CopyDirectory,
    Symlink,
    ReadLink,
    DeleteFile,
    DeleteDirectory,
    ClearDirectory,
    ListDirectory,
    Touch,
    ChangePermissions,
    ReadFile,
    WriteFile,
    Open,
    Close,
    Read,
    Write,
    Seek,
    Tell,
    Flush,
    Truncate,
    Lock,
    Unlock,
    ReadRecord,
    WriteRecord,
}

impl FsOperation {
    /// Verb phrase used in error messages ("failed to <verb> ...").
    pub fn verb(self) -> &'static str {
        match self {
            FsOperation::CheckExistence => "check existence of",
            FsOperation::Stat => "stat",
            FsOperation::CheckAccess => "check access to",
            FsOperation::CreateDirectory => "create directory",
            FsOperation::Rename => "rename",
            FsOperation::Copy => "copy",
            FsOperation::CopyDirectory => "copy directory",
            FsOperation::Symlink => "create symlink",
            FsOperation::ReadLink => "read link",
            FsOperation::DeleteFile => "delete file",
            FsOperation::DeleteDirectory => "delete directory",
            FsOperation::ClearDirectory => "clear directory",
            FsOperation::ListDirectory => "list directory",
            FsOperation::Touch => "touch",
            FsOperation::ChangePermissions => "change permissions of",
            FsOperation::ReadFile => "read file",
            FsOperation::WriteFile => "write file",
            FsOperation::Open => "open",
            FsOperation::Close => "close",
            FsOperation::Read => "read from",
            FsOperation::Write => "write to",
            FsOperation::Seek => "seek in",
            FsOperation::Tell => "get position in",
            FsOperation::Flush => "flush",
            FsOperation::Truncate => "truncate",
            FsOperation::Lock => "lock",
            FsOperation::Unlock => "unlock",
            FsOperation::ReadRecord => "read record from",
            FsOperation::WriteRecord => "write record to",
        }
    }

    /// Operations that move bytes through an open stream. `EBADF` from these
    /// means the handle lacks the needed access, not that it is closed.
    pub fn transfers_data(self) -> bool {
        matches!(
            self,
            FsOperation::Read
                | FsOperation::Write
                | FsOperation::ReadRecord
                | FsOperation::WriteRecord
                | FsOperation::Truncate
        )
    }
}

impl fmt::Display for FsOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.verb())
    }
}

/// A failed filesystem operation.
///
/// Carries the operation, the subject path(s) in the order they were passed,
/// and the diagnostic text reported by the native call (absent if none was
/// available).
#[derive(Debug, Error)]
#[error("failed to {operation} {}{}", format_paths(.paths), format_diagnostic(.diagnostic))]
pub struct FsError {
    kind: FsErrorKind,
    operation: FsOperation,
    paths: Vec<PathBuf>,
    diagnostic: Option<String>,
    #[source]
    source: Option<io::Error>,
}

impl FsError {
    pub fn new(kind: FsErrorKind, operation: FsOperation, path: impl AsRef<Path>) -> Self {
        Self {
            kind,
            operation,
            paths: vec![path.as_ref().to_path_buf()],
            diagnostic: None,
            source: None,
        }
    }

    /// Wrap an `io::Error` returned by a native call on `path`.
    pub fn io(operation: FsOperation, path: impl AsRef<Path>, err: io::Error) -> Self {
        let kind = if diagnostic::is_bad_descriptor(&err) && !operation.transfers_data() {
            FsErrorKind::InvalidHandle
        } else {
            FsErrorKind::Io
        };
        Self::new(kind, operation, path).with_source(err)
    }

    /// Wrap an `io::Error` returned by a native call involving two paths.
    pub fn io_pair(
        operation: FsOperation,
        from: impl AsRef<Path>,
        to: impl AsRef<Path>,
        err: io::Error,
    ) -> Self {
        Self::io(operation, from, err).with_path(to)
    }

    /// Operation attempted on a stream that is closed.
    pub fn invalid_handle(operation: FsOperation, path: impl AsRef<Path>) -> Self {
        Self::new(FsErrorKind::InvalidHandle, operation, path)
            .with_diagnostic("stream handle is closed")
    }

    pub fn with_path(mut self, path: impl AsRef<Path>) -> Self {
        self.paths.push(path.as_ref().to_path_buf());
        self
    }

    pub fn with_diagnostic(mut self, diagnostic: impl Into<String>) -> Self {
        self.diagnostic = Some(diagnostic.into());
        self
    }

    fn with_source(mut self, err: io::Error) -> Self {
        self.diagnostic = diagnostic::capture(&err);
        self.source = Some(err);
        self
    }

    pub fn kind(&self) -> FsErrorKind {
        self.kind
    }

    pub fn operation(&self) -> FsOperation {
        self.operation
    }

    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }

    pub fn diagnostic(&self) -> Option<&str> {
        self.diagnostic.as_deref()
    }

    /// Ordered message arguments: subject paths first, then the diagnostic.
    pub fn args(&self) -> Vec<String> {
        let mut args: Vec<String> = self.paths.iter().map(|p| p.display().to_string()).collect();
        if let Some(diagnostic) = &self.diagnostic {
            args.push(diagnostic.clone());
        }
        args
    }

    /// Provide an `io::ErrorKind` view for callers matching on std kinds.
    pub fn io_kind(&self) -> io::ErrorKind {
        match (&self.source, self.kind) {
            (Some(err), FsErrorKind::Io) => err.kind(),
            (_, FsErrorKind::WriteStalled) => io::ErrorKind::WriteZero,
            (_, FsErrorKind::MalformedRecord) => io::ErrorKind::InvalidData,
            (_, FsErrorKind::InvalidInput) => io::ErrorKind::InvalidInput,
            _ => io::ErrorKind::Other,
        }
    }
}

fn format_paths(paths: &[PathBuf]) -> String {
    paths.iter().map(|p| format!("\"{}\"", p.display())).collect::<Vec<_>>().join(" to ")
}

fn format_diagnostic(diagnostic: &Option<String>) -> String {
    match diagnostic {
        Some(text) => format!(": {text}"),
        None => String::new(),
    }
}

/// Application-level error for configuration loading and the CLI.
#[derive(Debug, Error)]
pub enum AppError {
    /// A filesystem operation failed.
    #[error(transparent)]
    Filesystem(#[from] FsError),

    /// Underlying I/O failure outside the facade.
    #[error(transparent)]
    Io(#[from] io::Error),

    /// Nothing exists at a path the command needs.
    #[error("No such file or directory: {}", .0.display())]
    NotFound(PathBuf),

    /// Configuration or argument issue.
    #[error("{0}")]
    Configuration(String),

    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    TomlParseError(#[from] toml::de::Error),
}

impl AppError {
    pub fn config_error<S: Into<String>>(message: S) -> Self {
        AppError::Configuration(message.into())
    }

    /// Provide an `io::ErrorKind`-like view for callers expecting legacy behavior.
    pub fn kind(&self) -> io::ErrorKind {
        match self {
            AppError::Filesystem(err) => err.io_kind(),
            AppError::Io(err) => err.kind(),
            AppError::NotFound(_) => io::ErrorKind::NotFound,
            AppError::Configuration(_) | AppError::TomlParseError(_) => {
                io::ErrorKind::InvalidInput
            }
        }
    }
}
