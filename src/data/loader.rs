use std::path::Path;

use log::debug;

use super::model::{Row, Table};
use crate::error::{ReportError, Result};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a labelled CSV table.
///
/// Layout: a header row, then one line per row.  The first column is the
/// integer row key, every other column is a numeric series:
///
/// ```text
/// ,cost
/// 0,312
/// 1,298
/// ```
///
/// Empty fields and `NaN` are read as missing values.
pub fn load(path: &Path) -> Result<Table> {
    if !path.exists() {
        return Err(ReportError::NotFound {
            path: path.to_path_buf(),
        });
    }

    let parse_err = |line: u64, message: String| ReportError::Parse {
        path: path.to_path_buf(),
        line,
        message,
    };

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .map_err(|e| csv_error(path, e))?;

    let headers = reader.headers().map_err(|e| csv_error(path, e))?.clone();
    let mut names = headers.iter().map(|h| h.trim().to_string());
    let index_name = names
        .next()
        .ok_or_else(|| parse_err(1, "missing header row".to_string()))?;
    let columns: Vec<String> = names.collect();

    let mut table = Table::new(index_name, columns);

    for result in reader.records() {
        let record = result.map_err(|e| csv_error(path, e))?;
        let line = record.position().map(|p| p.line()).unwrap_or(0);

        if record.len() != headers.len() {
            return Err(parse_err(
                line,
                format!(
                    "expected {} fields, found {}",
                    headers.len(),
                    record.len()
                ),
            ));
        }

        let key_field = record.get(0).unwrap_or("").trim();
        let key = key_field
            .parse::<i64>()
            .map_err(|_| parse_err(line, format!("row key '{key_field}' is not an integer")))?;

        let values = record
            .iter()
            .skip(1)
            .zip(&table.columns)
            .map(|(field, column)| {
                parse_cell(field).ok_or_else(|| {
                    parse_err(line, format!("column '{column}': '{field}' is not a number"))
                })
            })
            .collect::<Result<Vec<_>>>()?;

        table
            .push(Row { key, values })
            .map_err(|e| parse_err(line, e.to_string()))?;
    }

    debug!(
        "loaded {} rows × {} columns from {}",
        table.len(),
        table.columns.len(),
        path.display()
    );
    Ok(table)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// `Some(None)` for a missing cell, `None` when the text is not numeric.
fn parse_cell(field: &str) -> Option<Option<f64>> {
    let field = field.trim();
    if field.is_empty() || field.eq_ignore_ascii_case("nan") {
        return Some(None);
    }
    field.parse::<f64>().ok().map(Some)
}

fn csv_error(path: &Path, err: csv::Error) -> ReportError {
    let line = err.position().map(|p| p.line()).unwrap_or(0);
    match err.into_kind() {
        csv::ErrorKind::Io(source) => ReportError::io(path, source),
        csv::ErrorKind::Utf8 { err, .. } => ReportError::Parse {
            path: path.to_path_buf(),
            line,
            message: format!("invalid UTF-8: {err}"),
        },
        other => ReportError::Parse {
            path: path.to_path_buf(),
            line,
            message: format!("{other:?}"),
        },
    }
}
