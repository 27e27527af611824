//! CSV export of the full record list
//!
//! The export ignores the detail table's sort, filters, and page: it always
//! contains every loaded record in source order.

use anyhow::{Context, Result};
use csv::{QuoteStyle, Terminator, WriterBuilder};
use std::path::Path;

use crate::record::{Field, Record};

/// Header row: field names in declaration order
pub fn header() -> Vec<&'static str> {
    Field::ALL.iter().map(|f| f.name()).collect()
}

/// Render records as CSV text: a bare header, then one fully quoted row per
/// record, rows separated by `\n` with no trailing newline.
///
/// An empty list produces the header alone.
pub fn to_delimited_text(records: &[Record]) -> Result<String> {
    let mut out: Vec<u8> = Vec::new();

    {
        let mut wtr = WriterBuilder::new()
            .terminator(Terminator::Any(b'\n'))
            .from_writer(&mut out);
        wtr.write_record(header())?;
        wtr.flush()?;
    }

    {
        let mut wtr = WriterBuilder::new()
            .quote_style(QuoteStyle::Always)
            .terminator(Terminator::Any(b'\n'))
            .from_writer(&mut out);
        for record in records {
            wtr.write_record(Field::ALL.iter().map(|f| record.get(*f).to_string()))?;
        }
        wtr.flush()?;
    }

    let mut text = String::from_utf8(out).context("CSV output is not valid UTF-8")?;
    if text.ends_with('\n') {
        text.pop();
    }
    Ok(text)
}

/// Write the CSV export to `path`
pub fn write_csv(records: &[Record], path: &Path) -> Result<()> {
    let text = to_delimited_text(records)?;
    std::fs::write(path, text).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}
