//! Facade configuration: default modes and record format.

pub mod parse;

use serde::{Deserialize, Deserializer};

use crate::domain::{AppError, RecordFormat};

pub const DEFAULT_DIRECTORY_MODE: u32 = 0o755;
pub const DEFAULT_FILE_MODE: u32 = 0o644;

/// Settings consumers apply when they do not pass explicit values.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FilesystemConfig {
    #[serde(deserialize_with = "deserialize_mode")]
    pub directory_mode: u32,
    #[serde(deserialize_with = "deserialize_mode")]
    pub file_mode: u32,
    pub record: RecordConfig,
}

impl Default for FilesystemConfig {
    fn default() -> Self {
        Self {
            directory_mode: DEFAULT_DIRECTORY_MODE,
            file_mode: DEFAULT_FILE_MODE,
            record: RecordConfig::default(),
        }
    }
}

/// `[record]` section.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RecordConfig {
    pub delimiter: char,
    pub quote: char,
}

impl Default for RecordConfig {
    fn default() -> Self {
        Self { delimiter: ',', quote: '"' }
    }
}

impl FilesystemConfig {
    pub fn validate(&self) -> Result<(), AppError> {
        for (name, mode) in [("directory_mode", self.directory_mode), ("file_mode", self.file_mode)] {
            if mode > 0o7777 {
                return Err(AppError::config_error(format!(
                    "{name} {mode:o} exceeds permission bits 7777"
                )));
            }
        }
        for (name, c) in [("record.delimiter", self.record.delimiter), ("record.quote", self.record.quote)] {
            if !c.is_ascii() || c == '\n' || c == '\r' {
                return Err(AppError::config_error(format!(
                    "{name} must be a single ASCII character other than a line break, got {c:?}"
                )));
            }
        }
        if self.record.delimiter == self.record.quote {
            return Err(AppError::config_error("record.delimiter and record.quote must differ"));
        }
        Ok(())
    }

    /// Record format for stream record operations. Call after `validate`.
    pub fn record_format(&self) -> RecordFormat {
        RecordFormat { delimiter: self.record.delimiter as u8, quote: self.record.quote as u8 }
    }
}

/// Accept a TOML integer (`493`) or an octal string (`"0755"`, `"755"`).
fn deserialize_mode<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum ModeValue {
        Number(u32),
        Text(String),
    }

    match ModeValue::deserialize(deserializer)? {
        ModeValue::Number(mode) => Ok(mode),
        ModeValue::Text(text) => parse_octal_mode(&text).ok_or_else(|| {
            serde::de::Error::custom(format!("invalid octal mode '{text}'"))
        }),
    }
}

/// Parse an octal permission string such as `"0755"` or `"0o644"`.
pub fn parse_octal_mode(text: &str) -> Option<u32> {
    let digits = text.trim();
    let digits = digits.strip_prefix("0o").unwrap_or(digits);
    if digits.is_empty() {
        return None;
    }
    u32::from_str_radix(digits, 8).ok()
}
