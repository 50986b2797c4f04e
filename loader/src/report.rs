//! Plain-text diagnostics printed after a successful load: the first rows,
//! the shape and the per-column missing-value counts.

use std::fmt;
use std::io::{self, Write};

use crate::table::Table;

pub const DEFAULT_HEAD_ROWS: usize = 5;

/// Text printed in place of a missing cell.
const MISSING: &str = "NaN";

/// Renders the diagnostics for one table. Pure, so the same table always
/// prints the same text.
#[derive(Debug, Clone, Copy)]
pub struct Report<'a> {
    table: &'a Table,
    head_rows: usize,
}

impl<'a> Report<'a> {
    pub fn new(table: &'a Table, head_rows: usize) -> Self {
        Self { table, head_rows }
    }

    pub fn write_to<W: Write>(&self, out: &mut W) -> io::Result<()> {
        write!(out, "{}", self)?;
        out.flush()
    }

    fn fmt_head(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let table = self.table;
        let rows = table.head(self.head_rows);

        if rows.is_empty() {
            writeln!(f, "Empty table")?;
            writeln!(f, "Columns: [{}]", table.columns().join(", "))?;
            return writeln!(f, "Index: []");
        }

        let cells: Vec<Vec<String>> = rows
            .iter()
            .map(|row| {
                row.iter()
                    .map(|cell| cell.as_deref().map_or_else(|| MISSING.to_string(), escape))
                    .collect()
            })
            .collect();

        let index_width = (rows.len() - 1).to_string().len();
        let widths: Vec<usize> = table
            .columns()
            .iter()
            .enumerate()
            .map(|(col, name)| {
                cells
                    .iter()
                    .map(|row| display_width(&row[col]))
                    .chain(std::iter::once(display_width(name)))
                    .max()
                    .unwrap_or_default()
            })
            .collect();

        write!(f, "{:index_width$}", "")?;
        for (name, &width) in table.columns().iter().zip(&widths) {
            write!(f, "  {name:>width$}")?;
        }
        writeln!(f)?;

        for (idx, row) in cells.iter().enumerate() {
            write!(f, "{idx:<index_width$}")?;
            for (cell, &width) in row.iter().zip(&widths) {
                write!(f, "  {cell:>width$}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }

    fn fmt_null_counts(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let counts = self.table.null_counts();
        let name_width = counts
            .iter()
            .map(|(name, _)| display_width(name))
            .max()
            .unwrap_or_default();

        for (name, nulls) in counts {
            writeln!(f, "{name:<name_width$}    {nulls}")?;
        }
        writeln!(f, "dtype: int64")
    }
}

impl fmt::Display for Report<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_head(f)?;
        let (rows, cols) = self.table.shape();
        writeln!(f, "({rows}, {cols})")?;
        self.fmt_null_counts(f)
    }
}

fn display_width(text: &str) -> usize {
    text.chars().count()
}

// Keeps multi-line cells on a single grid row.
/// Escapes line breaks so a value stays on one output line.
pub(crate) fn escape(cell: &str) -> String {
    cell.replace('\r', "\\r").replace('\n', "\\n")
}
