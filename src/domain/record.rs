//! Delimited record format and formula-injection sanitizing.

use std::borrow::Cow;

/// Leading characters that spreadsheet software evaluates as a formula.
const FORMULA_TRIGGERS: [char; 3] = ['=', '+', '-'];

/// Delimiter and quote characters of a record stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordFormat {
    pub delimiter: u8,
    pub quote: u8,
}

impl Default for RecordFormat {
    fn default() -> Self {
        Self { delimiter: b',', quote: b'"' }
    }
}

/// Neutralize a field that would be evaluated as a spreadsheet formula.
///
/// A field starting with `=`, `+` or `-` gets a single leading space.
pub fn sanitize_field(field: &str) -> Cow<'_, str> {
    if field.starts_with(FORMULA_TRIGGERS) {
        Cow::Owned(format!(" {field}"))
    } else {
        Cow::Borrowed(field)
    }
}

/// Stringify and sanitize every field of a record.
pub fn sanitize_record<F: ToString>(fields: &[F]) -> Vec<String> {
    fields
        .iter()
        .map(|field| sanitize_field(&field.to_string()).into_owned())
        .collect()
}
