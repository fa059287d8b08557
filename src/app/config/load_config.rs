//! Facade configuration loading.

use std::path::Path;

use tracing::debug;

use crate::domain::config::parse::parse_config_content;
use crate::domain::{AppError, FilesystemConfig};
use crate::ports::Platform;
use crate::services::Filesystem;

/// Load the configuration at `path` through the facade.
///
/// A missing file yields the defaults. Anything else that prevents reading
/// or parsing the file is an error.
pub fn load_config<P: Platform>(
    fs: &Filesystem<P>,
    path: impl AsRef<Path>,
) -> Result<FilesystemConfig, AppError> {
    let path = path.as_ref();
    if !fs.exists(path)? {
        debug!(path = %path.display(), "no config file, using defaults");
        return Ok(FilesystemConfig::default());
    }
    if !fs.is_file(path)? {
        return Err(AppError::config_error(format!(
            "Config path is not a regular file: {}",
            path.display()
        )));
    }

    let content = fs.read_to_string(path)?;
    parse_config_content(&content)
}
