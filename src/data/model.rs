use std::collections::BTreeSet;

// ---------------------------------------------------------------------------
// Row – one labelled line of the source CSV
// ---------------------------------------------------------------------------

/// A single table row: its integer key and one optional value per column.
/// `None` marks a missing cell (empty field or `NaN` in the source).
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    pub key: i64,
    pub values: Vec<Option<f64>>,
}

// ---------------------------------------------------------------------------
// Table – the complete loaded dataset
// ---------------------------------------------------------------------------

/// Rows keyed by a unique integer, columns are named numeric series.
///
/// Every row holds exactly `columns.len()` values, in column order.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    /// Header of the leading index column (usually empty).
    pub index_name: String,
    /// Ordered column names, excluding the index column.
    pub columns: Vec<String>,
    rows: Vec<Row>,
    seen: BTreeSet<i64>,
}

/// Why a row could not be appended to a [`Table`].
#[derive(Debug, Clone, PartialEq)]
pub enum RowError {
    Width { expected: usize, found: usize },
    DuplicateKey(i64),
}

impl std::fmt::Display for RowError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RowError::Width { expected, found } => {
                write!(f, "expected {expected} values, found {found}")
            }
            RowError::DuplicateKey(key) => write!(f, "duplicate row key {key}"),
        }
    }
}

impl Table {
    pub fn new(index_name: impl Into<String>, columns: Vec<String>) -> Self {
        Table {
            index_name: index_name.into(),
            columns,
            rows: Vec::new(),
            seen: BTreeSet::new(),
        }
    }

    /// Build a table from already validated rows.
    pub fn from_rows(
        index_name: impl Into<String>,
        columns: Vec<String>,
        rows: Vec<Row>,
    ) -> Result<Self, RowError> {
        let mut table = Table::new(index_name, columns);
        for row in rows {
            table.push(row)?;
        }
        Ok(table)
    }

    /// Append a row, enforcing the column width and key uniqueness.
    pub fn push(&mut self, row: Row) -> Result<(), RowError> {
        if row.values.len() != self.columns.len() {
            return Err(RowError::Width {
                expected: self.columns.len(),
                found: row.values.len(),
            });
        }
        if !self.seen.insert(row.key) {
            return Err(RowError::DuplicateKey(row.key));
        }
        self.rows.push(row);
        Ok(())
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    /// Row keys in row order.
    pub fn keys(&self) -> Vec<i64> {
        self.rows.iter().map(|r| r.key).collect()
    }

    /// The raw cells of a column in row order, missing cells included.
    pub fn column(&self, name: &str) -> Option<Vec<Option<f64>>> {
        let idx = self.column_index(name)?;
        Some(self.rows.iter().map(|r| r.values[idx]).collect())
    }

    /// `(key, value)` pairs of a column, skipping missing cells.
    pub fn series(&self, name: &str) -> Option<Vec<(i64, f64)>> {
        let idx = self.column_index(name)?;
        Some(
            self.rows
                .iter()
                .filter_map(|r| r.values[idx].map(|v| (r.key, v)))
                .collect(),
        )
    }

    /// Consume the table, keeping the schema and replacing the rows.
    ///
    /// Callers are responsible for keeping keys unique.
    pub(crate) fn with_rows(self, rows: Vec<Row>) -> Self {
        let seen: BTreeSet<i64> = rows.iter().map(|r| r.key).collect();
        debug_assert_eq!(seen.len(), rows.len());
        Table { rows, seen, ..self }
    }
}
