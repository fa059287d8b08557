use std::fs::OpenOptions;
use std::str::FromStr;

use super::error::{FsError, FsErrorKind, FsOperation};

/// How a stream is opened, mirroring fopen-style mode strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenMode {
    /// `r`: read; the file must exist.
    Read,
    /// `r+`: read and write; the file must exist.
    ReadWrite,
    /// `w` / `w+`: truncate or create.
    Truncate { read: bool },
    /// `a` / `a+`: writes always go to the end; create if missing.
    Append { read: bool },
    /// `x` / `x+`: create; fail if the file exists.
    CreateNew { read: bool },
    /// `c` / `c+`: create if missing, never truncate.
    Create { read: bool },
}

impl OpenMode {
    /// Parse an fopen-style mode string (`"r"`, `"w+"`, `"ab"`, ...).
    ///
    /// `b` and `t` flags are accepted and ignored.
    pub fn parse(mode: &str) -> Option<Self> {
        let stripped: String = mode.chars().filter(|c| !matches!(c, 'b' | 't')).collect();
        let parsed = match stripped.as_str() {
            "r" => OpenMode::Read,
            "r+" => OpenMode::ReadWrite,
            "w" => OpenMode::Truncate { read: false },
            "w+" => OpenMode::Truncate { read: true },
            "a" => OpenMode::Append { read: false },
            "a+" => OpenMode::Append { read: true },
            "x" => OpenMode::CreateNew { read: false },
            "x+" => OpenMode::CreateNew { read: true },
            "c" => OpenMode::Create { read: false },
            "c+" => OpenMode::Create { read: true },
            _ => return None,
        };
        Some(parsed)
    }

    pub fn is_readable(self) -> bool {
        match self {
            OpenMode::Read | OpenMode::ReadWrite => true,
            OpenMode::Truncate { read }
            | OpenMode::Append { read }
            | OpenMode::CreateNew { read }
            | OpenMode::Create { read } => read,
        }
    }

    pub fn is_writable(self) -> bool {
        self != OpenMode::Read
    }

    /// Translate into `std::fs::OpenOptions`.
    pub fn options(self) -> OpenOptions {
        let mut options = OpenOptions::new();
        options.read(self.is_readable());
        match self {
            OpenMode::Read => {}
            OpenMode::ReadWrite => {
                options.write(true);
            }
            OpenMode::Truncate { .. } => {
                options.write(true).create(true).truncate(true);
            }
            OpenMode::Append { .. } => {
                options.append(true).create(true);
            }
            OpenMode::CreateNew { .. } => {
                options.write(true).create_new(true);
            }
            OpenMode::Create { .. } => {
                options.write(true).create(true);
            }
        }
        options
    }
}

impl FromStr for OpenMode {
    type Err = FsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OpenMode::parse(s).ok_or_else(|| {
            FsError::new(FsErrorKind::InvalidInput, FsOperation::Open, s)
                .with_diagnostic(format!("unsupported open mode '{s}'"))
        })
    }
}
