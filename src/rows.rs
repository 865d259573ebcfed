// src/rows.rs

use csv::{Reader, ReaderBuilder, StringRecord};
use std::collections::{BTreeMap, HashSet};
use tracing::{debug, trace};

use crate::error::LoadError;

/// One data line of the document, keyed by column header.
pub type Row = BTreeMap<String, String>;

/// Key prefix for cells beyond the last header column.
pub const EXTRA_FIELD_PREFIX: &str = "__parsed_extra_";

/// Parse CSV `text` into header-keyed rows, in document order.
///
/// The first line supplies the keys. Comma delimiter, double-quote quoting,
/// `\n` or `\r\n` line endings. Blank lines are skipped.
///
/// Ragged lines never fail: a short line leaves its missing columns out of
/// the row, a long line keeps the surplus cells under `__parsed_extra_N`.
pub fn parse_rows(text: &str) -> Result<Vec<Row>, LoadError> {
    let mut rdr = reader(text);

    let headers = unique_headers(rdr.headers()?);
    trace!(?headers, "header line");

    let mut rows = Vec::new();
    for result in rdr.records() {
        let record = result?;
        if record.len() != headers.len() {
            debug!(
                line = ?source_line(&record),
                expected = headers.len(),
                found = record.len(),
                "ragged row"
            );
        }
        rows.push(to_row(&headers, &record));
    }

    Ok(rows)
}

fn reader(text: &str) -> Reader<&[u8]> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(text.as_bytes())
}

/// 1-based line in the document where `record` starts.
fn source_line(record: &StringRecord) -> Option<u64> {
    record.position().map(|p| p.line())
}

fn to_row(headers: &[String], record: &StringRecord) -> Row {
    let mut row = Row::new();
    for (header, cell) in headers.iter().zip(record.iter()) {
        row.insert(header.clone(), cell.to_string());
    }

    // surplus cells; skip extra keys a real header already uses
    let mut n = 0;
    for cell in record.iter().skip(headers.len()) {
        let mut key = format!("{}{}", EXTRA_FIELD_PREFIX, n);
        while row.contains_key(&key) || headers.contains(&key) {
            n += 1;
            key = format!("{}{}", EXTRA_FIELD_PREFIX, n);
        }
        row.insert(key, cell.to_string());
        n += 1;
    }
    row
}

/// Repeated header names get `_1`, `_2`, ... so no column is shadowed.
fn unique_headers(record: &StringRecord) -> Vec<String> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut out = Vec::with_capacity(record.len());

    for name in record.iter() {
        let mut candidate = name.to_string();
        let mut n = 1;
        while seen.contains(&candidate) {
            candidate = format!("{}_{}", name, n);
            n += 1;
        }
        seen.insert(candidate.clone());
        out.push(candidate);
    }
    out
}
