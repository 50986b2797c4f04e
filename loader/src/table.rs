use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord};
use tracing::debug;

use crate::error::LoadError;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Cell values read as missing, in addition to the empty string.
pub const NA_VALUES: &[&str] = &[
    "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN", "<NA>",
    "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// A parsed CSV file: named columns and rows of optional cells.
///
/// Every row has exactly `n_cols()` cells; `None` marks a missing value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<Option<String>>>,
}

impl Table {
    /// Parses CSV text whose first record is the header.
    pub fn from_csv_bytes(bytes: &[u8]) -> Result<Self, LoadError> {
        let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Err(LoadError::NoColumns);
        }
        check_quotes(bytes)?;

        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(bytes);
        let mut records = reader.records();

        let header = match records.next() {
            Some(record) => record?,
            None => return Err(LoadError::NoColumns),
        };
        let columns = normalize_headers(&header);
        let width = columns.len();

        let mut rows = Vec::new();
        for record in records {
            let record = record?;
            if record.len() > width {
                return Err(LoadError::Malformed {
                    line: line_of(&record),
                    reason: format!("Expected {width} fields, saw {}", record.len()),
                });
            }
            let mut row: Vec<Option<String>> = record.iter().map(cell_value).collect();
            row.resize(width, None);
            rows.push(row);
        }

        debug!(rows = rows.len(), columns = width, "parsed csv");
        Ok(Self { columns, rows })
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn n_cols(&self) -> usize {
        self.columns.len()
    }

    /// `(rows, columns)`
    pub fn shape(&self) -> (usize, usize) {
        (self.n_rows(), self.n_cols())
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<&str> {
        self.rows.get(row)?.get(col)?.as_deref()
    }

    /// At most the first `n` rows.
    pub fn head(&self, n: usize) -> &[Vec<Option<String>>] {
        &self.rows[..n.min(self.rows.len())]
    }

    /// Missing-value count per column, in column order.
    pub fn null_counts(&self) -> Vec<(&str, usize)> {
        self.columns
            .iter()
            .enumerate()
            .map(|(col, name)| {
                let nulls = self.rows.iter().filter(|row| row[col].is_none()).count();
                (name.as_str(), nulls)
            })
            .collect()
    }
}

/// Reads and parses the CSV file at `path`.
///
/// Directories and other non-regular files are refused before any read.
pub fn load_table(path: &Path) -> Result<Table, LoadError> {
    let metadata = fs::metadata(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => LoadError::NotFound(path.to_path_buf()),
        _ => LoadError::Io(e),
    })?;
    if !metadata.is_file() {
        return Err(LoadError::NotAFile(path.to_path_buf()));
    }

    let bytes = fs::read(path)?;
    debug!(path = %path.display(), bytes = bytes.len(), "read csv file");
    Table::from_csv_bytes(&bytes)
}

fn cell_value(raw: &str) -> Option<String> {
    if raw.is_empty() || NA_VALUES.contains(&raw) {
        None
    } else {
        Some(raw.to_string())
    }
}

fn line_of(record: &StringRecord) -> u64 {
    record.position().map(|p| p.line()).unwrap_or_default()
}

/// Blank names become `Unnamed: <index>`; repeats get `.1`, `.2`, ... suffixes.
fn normalize_headers(header: &StringRecord) -> Vec<String> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    let mut names = Vec::with_capacity(header.len());

    for (idx, raw) in header.iter().enumerate() {
        let base = if raw.trim().is_empty() {
            format!("Unnamed: {idx}")
        } else {
            raw.to_string()
        };

        let mut name = base.clone();
        let mut seen = counts.get(&name).copied().unwrap_or(0);
        while seen > 0 {
            counts.insert(name.clone(), seen + 1);
            name = format!("{name}.{seen}");
            seen = counts.get(&name).copied().unwrap_or(0);
        }
        counts.insert(name.clone(), seen + 1);
        names.push(name);
    }
    names
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum QuoteState {
    FieldStart,
    Unquoted,
    Quoted,
    QuoteInQuoted,
}

/// Rejects input that ends inside a quoted field. The CSV reader would
/// otherwise swallow everything after the stray quote into one cell.
///
/// Records end on `\n`, `\r` or `\r\n`, the same terminators the reader uses.
fn check_quotes(bytes: &[u8]) -> Result<(), LoadError> {
    let mut state = QuoteState::FieldStart;
    let mut line: u64 = 1;
    let mut opened_on: u64 = 1;
    let mut prev: u8 = 0;

    for &byte in bytes {
        if byte == b'\r' || (byte == b'\n' && prev != b'\r') {
            line += 1;
        }
        prev = byte;
        state = match (state, byte) {
            (QuoteState::FieldStart, b'"') => {
                opened_on = line;
                QuoteState::Quoted
            }
            (
                QuoteState::FieldStart | QuoteState::Unquoted | QuoteState::QuoteInQuoted,
                b',' | b'\n' | b'\r',
            ) => QuoteState::FieldStart,
            (QuoteState::FieldStart | QuoteState::Unquoted, _) => QuoteState::Unquoted,
            (QuoteState::Quoted, b'"') => QuoteState::QuoteInQuoted,
            (QuoteState::Quoted, _) => QuoteState::Quoted,
            // `""` inside a quoted field is an escaped quote
            (QuoteState::QuoteInQuoted, b'"') => QuoteState::Quoted,
            (QuoteState::QuoteInQuoted, _) => QuoteState::Unquoted,
        };
    }

    if state == QuoteState::Quoted {
        return Err(LoadError::Malformed {
            line: opened_on,
            reason: "EOF inside string".to_string(),
        });
    }
    Ok(())
}
