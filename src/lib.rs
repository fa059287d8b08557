//! fsgate: a local filesystem facade with uniform, contextual errors.
//!
//! Every operation either returns a well-typed value or an [`FsError`] that
//! names the operation, the subject path(s), and the native diagnostic.
//! Native calls go through the [`ports::Platform`] seam; [`Filesystem::local`]
//! binds the facade to the operating system.

pub mod adapters;
pub mod app;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
pub(crate) mod testing;

pub use adapters::OsPlatform;
pub use app::config::load_config;
pub use domain::paths::{absolute_path, fix_separator, real_path_safety, relative_path};
pub use domain::{
    AppError, EntryType, FilesystemConfig, FsError, FsErrorKind, FsOperation, LockKind, LockMode,
    Metadata, OpenMode, RecordFormat,
};
pub use ports::{Platform, StreamDevice};
pub use services::{Filesystem, PostOrder, PreOrder, Stream, WalkEntry};
