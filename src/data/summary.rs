use std::cmp::Ordering;
use std::fmt;

use super::model::{Row, Table};
use crate::error::{ReportError, Result};

/// Column that per-test-case tables are ranked by.
pub const COST_COLUMN: &str = "cost";

/// Row labels of a summary, in report order.
pub const STAT_LABELS: [&str; 8] = ["count", "mean", "std", "min", "25%", "50%", "75%", "max"];

// ---------------------------------------------------------------------------
// SummaryStat – descriptive statistics of one column
// ---------------------------------------------------------------------------

/// Descriptive statistics of a single numeric column.
///
/// Statistics that are undefined for the sample size are `NaN`
/// (`std` needs two values, everything else one).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SummaryStat {
    pub count: usize,
    pub mean: f64,
    pub std: f64,
    pub min: f64,
    pub p25: f64,
    pub p50: f64,
    pub p75: f64,
    pub max: f64,
}

impl SummaryStat {
    /// Compute the statistics of `values`; missing cells must already be removed.
    pub fn from_values(values: &[f64]) -> Self {
        let count = values.len();
        if count == 0 {
            return SummaryStat {
                count,
                mean: f64::NAN,
                std: f64::NAN,
                min: f64::NAN,
                p25: f64::NAN,
                p50: f64::NAN,
                p75: f64::NAN,
                max: f64::NAN,
            };
        }

        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);

        let mean = sorted.iter().sum::<f64>() / count as f64;
        let std = if count < 2 {
            f64::NAN
        } else {
            let variance =
                sorted.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (count - 1) as f64;
            variance.sqrt()
        };

        SummaryStat {
            count,
            mean,
            std,
            min: sorted[0],
            p25: percentile_sorted(&sorted, 25.0),
            p50: percentile_sorted(&sorted, 50.0),
            p75: percentile_sorted(&sorted, 75.0),
            max: sorted[count - 1],
        }
    }

    /// Values in [`STAT_LABELS`] order.
    pub fn as_row(&self) -> [f64; 8] {
        [
            self.count as f64,
            self.mean,
            self.std,
            self.min,
            self.p25,
            self.p50,
            self.p75,
            self.max,
        ]
    }
}

// ---------------------------------------------------------------------------
// Summary – per-column statistics of a whole table
// ---------------------------------------------------------------------------

/// Statistics for every column of a table, in the table's column order.
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    columns: Vec<(String, SummaryStat)>,
}

impl Summary {
    pub fn get(&self, column: &str) -> Option<&SummaryStat> {
        self.columns
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, stat)| stat)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &SummaryStat)> {
        self.columns.iter().map(|(name, stat)| (name.as_str(), stat))
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

/// Renders like a `describe()` table: one statistic per line, one
/// right-aligned column per series, six decimals.
impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label_width = STAT_LABELS.iter().map(|l| l.len()).max().unwrap_or(0);

        let cells: Vec<Vec<String>> = self
            .columns
            .iter()
            .map(|(_, stat)| stat.as_row().iter().map(|v| format_stat(*v)).collect())
            .collect();
        let widths: Vec<usize> = self
            .columns
            .iter()
            .zip(&cells)
            .map(|((name, _), col)| {
                col.iter()
                    .map(String::len)
                    .chain(std::iter::once(name.len()))
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        write!(f, "{:label_width$}", "")?;
        for ((name, _), width) in self.columns.iter().zip(widths.iter().copied()) {
            write!(f, "  {name:>width$}")?;
        }
        for (row, label) in STAT_LABELS.iter().enumerate() {
            write!(f, "\n{label:<label_width$}")?;
            for (col, width) in cells.iter().zip(widths.iter().copied()) {
                write!(f, "  {:>width$}", col[row])?;
            }
        }
        Ok(())
    }
}

fn format_stat(v: f64) -> String {
    if v.is_nan() {
        "NaN".to_string()
    } else {
        format!("{v:.6}")
    }
}

// ---------------------------------------------------------------------------
// Operations
// ---------------------------------------------------------------------------

/// Descriptive statistics for every column of `table`.
pub fn describe(table: &Table) -> Summary {
    let columns = table
        .columns
        .iter()
        .enumerate()
        .map(|(idx, name)| {
            let values: Vec<f64> = table.rows().iter().filter_map(|r| r.values[idx]).collect();
            (name.clone(), SummaryStat::from_values(&values))
        })
        .collect();
    Summary { columns }
}

/// Stable-sort rows ascending by `cost` and renumber keys `0..n`.
///
/// Missing costs sort last.  Fails with [`ReportError::Schema`] when the
/// table has no `cost` column.
pub fn rank_by_cost(table: Table) -> Result<Table> {
    rank_by(table, COST_COLUMN)
}

/// [`rank_by_cost`] for an arbitrary column.
pub fn rank_by(table: Table, column: &str) -> Result<Table> {
    let idx = table
        .column_index(column)
        .ok_or_else(|| ReportError::Schema {
            column: column.to_string(),
        })?;

    let mut rows: Vec<Row> = table.rows().to_vec();
    rows.sort_by(|a, b| match (a.values[idx], b.values[idx]) {
        (Some(x), Some(y)) => x.total_cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
    for (rank, row) in rows.iter_mut().enumerate() {
        row.key = rank as i64;
    }
    Ok(table.with_rows(rows))
}

/// Percentile of already sorted values, linear interpolation between ranks.
///
/// `NaN` for an empty slice.
pub fn percentile_sorted(sorted: &[f64], percentile: f64) -> f64 {
    if sorted.is_empty() {
        return f64::NAN;
    }
    if sorted.len() == 1 {
        return sorted[0];
    }

    let n = sorted.len();
    let rank = (percentile / 100.0) * (n - 1) as f64;
    let lower_idx = rank.floor() as usize;
    let upper_idx = (lower_idx + 1).min(n - 1);
    let fraction = rank - lower_idx as f64;

    sorted[lower_idx] + fraction * (sorted[upper_idx] - sorted[lower_idx])
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn cost_table(costs: &[f64]) -> Table {
        let rows = costs
            .iter()
            .enumerate()
            .map(|(i, &c)| Row {
                key: i as i64,
                values: vec![Some(c)],
            })
            .collect();
        Table::from_rows("", vec![COST_COLUMN.to_string()], rows).unwrap()
    }

    fn costs(table: &Table) -> Vec<f64> {
        table.column(COST_COLUMN).unwrap().into_iter().flatten().collect()
    }

    #[test]
    fn test_mean_and_sample_std() {
        let stat = SummaryStat::from_values(&[10.0, 20.0, 30.0]);
        assert_eq!(stat.count, 3);
        assert!((stat.mean - 20.0).abs() < EPS);
        assert!((stat.std - 10.0).abs() < EPS);
    }

    #[test]
    fn test_std_matches_reference_formula() {
        let values = [3.0, 7.0, 7.0, 19.0, 24.0];
        let mean = values.iter().sum::<f64>() / 5.0;
        let reference =
            (values.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / 4.0).sqrt();
        let stat = SummaryStat::from_values(&values);
        assert!((stat.std - reference).abs() < EPS);
    }

    #[test]
    fn test_quartiles_interpolate() {
        let stat = SummaryStat::from_values(&[40.0, 10.0, 30.0, 20.0]);
        assert!((stat.min - 10.0).abs() < EPS);
        assert!((stat.p25 - 17.5).abs() < EPS);
        assert!((stat.p50 - 25.0).abs() < EPS);
        assert!((stat.p75 - 32.5).abs() < EPS);
        assert!((stat.max - 40.0).abs() < EPS);
    }

    #[test]
    fn test_single_value_has_nan_std() {
        let stat = SummaryStat::from_values(&[42.0]);
        assert_eq!(stat.count, 1);
        assert!(stat.std.is_nan());
        assert!((stat.p75 - 42.0).abs() < EPS);
    }

    #[test]
    fn test_empty_column_is_all_nan() {
        let stat = SummaryStat::from_values(&[]);
        assert_eq!(stat.count, 0);
        assert!(stat.mean.is_nan() && stat.min.is_nan() && stat.p50.is_nan());
    }

    #[test]
    fn test_describe_counts_non_missing() {
        let table = Table::from_rows(
            "",
            vec!["a".into(), "b".into()],
            vec![
                Row {
                    key: 0,
                    values: vec![Some(1.0), None],
                },
                Row {
                    key: 1,
                    values: vec![Some(2.0), Some(5.0)],
                },
                Row {
                    key: 2,
                    values: vec![None, None],
                },
            ],
        )
        .unwrap();
        let summary = describe(&table);

        assert_eq!(summary.len(), 2);
        assert_eq!(summary.get("a").unwrap().count, 2);
        assert_eq!(summary.get("b").unwrap().count, 1);
        assert!(summary.get("c").is_none());
    }

    #[test]
    fn test_rank_by_cost_orders_and_renumbers() {
        let ranked = rank_by_cost(cost_table(&[30.0, 10.0, 50.0, 20.0, 40.0])).unwrap();
        assert_eq!(costs(&ranked), vec![10.0, 20.0, 30.0, 40.0, 50.0]);
        assert_eq!(ranked.keys(), vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_rank_by_cost_is_idempotent() {
        let once = rank_by_cost(cost_table(&[3.0, 1.0, 2.0, 1.0, 9.0, 0.5])).unwrap();
        let twice = rank_by_cost(once.clone()).unwrap();
        assert_eq!(once, twice);
        for pair in costs(&once).windows(2) {
            assert!(pair[0] <= pair[1]);
        }
    }

    #[test]
    fn test_rank_by_cost_is_stable_and_puts_missing_last() {
        let table = Table::from_rows(
            "",
            vec!["cost".into(), "tag".into()],
            vec![
                Row {
                    key: 10,
                    values: vec![None, Some(0.0)],
                },
                Row {
                    key: 11,
                    values: vec![Some(2.0), Some(1.0)],
                },
                Row {
                    key: 12,
                    values: vec![Some(1.0), Some(2.0)],
                },
                Row {
                    key: 13,
                    values: vec![Some(2.0), Some(3.0)],
                },
            ],
        )
        .unwrap();
        let ranked = rank_by_cost(table).unwrap();
        let tags: Vec<f64> = ranked.column("tag").unwrap().into_iter().flatten().collect();
        assert_eq!(tags, vec![2.0, 1.0, 3.0, 0.0]);
    }

    #[test]
    fn test_rank_without_cost_is_schema_error() {
        let table = Table::new("", vec!["fitness".into()]);
        match rank_by_cost(table).unwrap_err() {
            ReportError::Schema { column } => assert_eq!(column, "cost"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_summary_display_layout() {
        let text = describe(&cost_table(&[10.0, 20.0, 30.0])).to_string();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 9);
        assert!(lines[0].trim_end().ends_with("cost"));
        assert!(lines[1].starts_with("count"));
        assert!(lines[1].ends_with("3.000000"));
        assert!(lines[3].starts_with("std"));
        assert!(lines[3].ends_with("10.000000"));
        assert!(lines[8].starts_with("max"));
    }

    #[test]
    fn test_percentile_sorted_edges() {
        assert!(percentile_sorted(&[], 50.0).is_nan());
        assert!((percentile_sorted(&[1.0, 2.0], 0.0) - 1.0).abs() < EPS);
        assert!((percentile_sorted(&[1.0, 2.0], 100.0) - 2.0).abs() < EPS);
    }
}
