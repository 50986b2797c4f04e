use std::io::Write;
use std::path::Path;

use medbiz::LogContext;

use crate::error::LoadError;
use crate::report::{escape, Report};
use crate::table::{load_table, Table};

/// Single load-and-report pass over the CSV file at `path`.
///
/// Outcomes are reported through the context's named loggers, never raised:
/// - missing path: one `error_logger` record, no load attempted;
/// - success: one `info_logger` record, then the report is written to `out`;
/// - any load or print failure: one `error_logger` record naming the path
///   and the cause.
///
/// Line breaks in paths and error messages are escaped so every record stays
/// on one log line. The returned `Result` only lets callers branch on the
/// cause; it has already been logged.
pub fn load_and_report<W: Write>(
    path: &Path,
    logs: &LogContext,
    out: &mut W,
    head_rows: usize,
) -> Result<Table, LoadError> {
    if !path.exists() {
        let err = LoadError::NotFound(path.to_path_buf());
        logs.error_logger().error(escape(&err.to_string()));
        return Err(err);
    }

    logs.in_scope(|| load_and_print(path, logs, out, head_rows))
        .map_err(|err| {
            logs.error_logger().error(escape(&format!(
                "Error loading data from {}: {err}",
                path.display()
            )));
            err
        })
}

fn load_and_print<W: Write>(
    path: &Path,
    logs: &LogContext,
    out: &mut W,
    head_rows: usize,
) -> Result<Table, LoadError> {
    let table = load_table(path)?;
    logs.info_logger().info(escape(&format!(
        "Loaded data successfully from {}",
        path.display()
    )));
    Report::new(&table, head_rows).write_to(out)?;
    Ok(table)
}
