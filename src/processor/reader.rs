//! Input file reading
//!
//! Exports are small, so each file is read in full, decoded from its declared
//! encoding and split into positional CSV records. Rows may have different
//! widths and no row is treated as a header by the CSV layer.

use crate::error::{ConverterError, Result};
use crate::models::InputFile;
use csv::{ReaderBuilder, StringRecord};
use encoding_rs::Encoding;
use tracing::debug;

/// Read every record of an input file
pub fn read_records(input: &InputFile) -> Result<Vec<StringRecord>> {
    let encoding = Encoding::for_label(input.encoding.as_bytes()).ok_or_else(|| {
        ConverterError::configuration(format!(
            "Unknown encoding '{}' for {}",
            input.encoding,
            input.path.display()
        ))
    })?;

    let bytes = std::fs::read(&input.path)?;
    // A byte order mark overrides the declared encoding and is stripped
    let (text, used_encoding, had_errors) = encoding.decode(&bytes);
    if had_errors {
        return Err(ConverterError::Encoding {
            path: input.path.clone(),
            encoding: used_encoding.name().to_string(),
        });
    }

    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes());

    let records = reader
        .records()
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|source| ConverterError::Csv {
            path: input.path.clone(),
            source,
        })?;

    debug!(
        "Read {} records from {} ({})",
        records.len(),
        input.path.display(),
        used_encoding.name()
    );
    Ok(records)
}

/// 1-based line of a record in its source file
pub fn record_line(record: &StringRecord) -> u64 {
    record.position().map(|position| position.line()).unwrap_or(0)
}
