pub mod config;
pub mod diagnostic;
pub mod error;
pub mod lock;
pub mod metadata;
pub mod open_mode;
pub mod paths;
pub mod record;

pub use config::FilesystemConfig;
pub use error::{AppError, FsError, FsErrorKind, FsOperation};
pub use lock::{LockKind, LockMode};
pub use metadata::{EntryType, Metadata};
pub use open_mode::OpenMode;
pub use record::{RecordFormat, sanitize_field, sanitize_record};
