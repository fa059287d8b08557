//! Delimited records over a stream.

use std::io::BufRead;

use csv::{ReaderBuilder, StringRecord, Terminator, WriterBuilder};

use crate::domain::{FsError, FsErrorKind, FsOperation, RecordFormat, sanitize_record};
use crate::ports::StreamDevice;

use super::Stream;

impl<D: StreamDevice> Stream<D> {
    /// Read the next record, or `None` at end of stream.
    ///
    /// A quoted field may span lines. A blank line is an empty record.
    pub fn read_record(&mut self, format: RecordFormat) -> Result<Option<Vec<String>>, FsError> {
        let (path, reader) = self.split(FsOperation::ReadRecord)?;
        let io_error = |err| FsError::io(FsOperation::ReadRecord, path, err);
        let malformed = |detail: String| {
            FsError::new(FsErrorKind::MalformedRecord, FsOperation::ReadRecord, path)
                .with_diagnostic(detail)
        };

        let mut raw = Vec::new();
        if reader.read_until(b'\n', &mut raw).map_err(io_error)? == 0 {
            return Ok(None);
        }
        while ends_inside_quotes(&raw, format) {
            if reader.read_until(b'\n', &mut raw).map_err(io_error)? == 0 {
                return Err(malformed("unterminated quoted field at end of stream".to_string()));
            }
        }

        parse_record(&raw, format).map(Some).map_err(malformed)
    }

    /// Sanitize, encode and write one record with a `\n` terminator.
    ///
    /// Returns the number of bytes written.
    pub fn write_record<F: ToString>(
        &mut self,
        fields: &[F],
        format: RecordFormat,
    ) -> Result<usize, FsError> {
        let encoded = encode_record(&sanitize_record(fields), format).map_err(|detail| {
            FsError::new(FsErrorKind::InvalidInput, FsOperation::WriteRecord, &self.path)
                .with_diagnostic(detail)
        })?;
        self.write_bytes(FsOperation::WriteRecord, &encoded)
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum QuoteState {
    FieldStart,
    Unquoted,
    Quoted,
    /// A quote inside a quoted field: either the closing quote or the first
    /// half of a doubled one.
    QuoteInQuoted,
}

/// Whether `raw` stops inside an open quoted field.
///
/// A quote only opens a field when it is the field's first byte; anywhere
/// else in an unquoted field it is literal text.
fn ends_inside_quotes(raw: &[u8], format: RecordFormat) -> bool {
    let mut state = QuoteState::FieldStart;
    for &byte in raw {
        state = match state {
            QuoteState::Quoted if byte == format.quote => QuoteState::QuoteInQuoted,
            QuoteState::Quoted => QuoteState::Quoted,
            QuoteState::QuoteInQuoted if byte == format.quote => QuoteState::Quoted,
            QuoteState::FieldStart if byte == format.quote => QuoteState::Quoted,
            _ if byte == format.delimiter || byte == b'\n' => QuoteState::FieldStart,
            _ => QuoteState::Unquoted,
        };
    }
    state == QuoteState::Quoted
}

fn parse_record(raw: &[u8], format: RecordFormat) -> Result<Vec<String>, String> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(format.delimiter)
        .quote(format.quote)
        .from_reader(raw);
    let mut record = StringRecord::new();
    match reader.read_record(&mut record) {
        Ok(true) => Ok(record.iter().map(str::to_owned).collect()),
        Ok(false) => Ok(Vec::new()),
        Err(err) => Err(err.to_string()),
    }
}

fn encode_record(fields: &[String], format: RecordFormat) -> Result<Vec<u8>, String> {
    let mut writer = WriterBuilder::new()
        .delimiter(format.delimiter)
        .quote(format.quote)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());
    writer.write_record(fields).map_err(|err| err.to_string())?;
    writer.into_inner().map_err(|err| err.to_string())
}
