use std::path::PathBuf;

use log::{debug, info, warn};

use crate::chart::line::has_band_columns;
use crate::chart::{render, ChartKind, ChartSpec};
use crate::config::{BatchConfig, DatasetConfig, DatasetKind};
use crate::data::loader::load;
use crate::data::model::Table;
use crate::data::summary::{describe, rank_by, Summary};
use crate::error::Result;
use crate::report::{with_report, ReportWriter};

const GENERATION_LABEL: &str = "generation";

/// What one dataset produced.
#[derive(Debug, Clone, PartialEq)]
pub struct DatasetOutput {
    pub name: String,
    pub rows: usize,
    pub images: Vec<PathBuf>,
    pub summary: Summary,
}

// ---------------------------------------------------------------------------
// Batch
// ---------------------------------------------------------------------------

/// Process every dataset in manifest order; the first error stops the batch.
pub fn run_batch(config: &BatchConfig) -> Result<Vec<DatasetOutput>> {
    match &config.report {
        Some(path) => with_report(path, |report| run_all(&config.datasets, Some(report))),
        None => run_all(&config.datasets, None),
    }
}

fn run_all(
    datasets: &[DatasetConfig],
    mut report: Option<&mut ReportWriter>,
) -> Result<Vec<DatasetOutput>> {
    let mut outputs = Vec::with_capacity(datasets.len());
    for ds in datasets {
        outputs.push(run_dataset(ds, report.as_deref_mut())?);
    }
    Ok(outputs)
}

// ---------------------------------------------------------------------------
// Single dataset
// ---------------------------------------------------------------------------

/// Load, summarize, report and chart one dataset.
pub fn run_dataset(
    ds: &DatasetConfig,
    report: Option<&mut ReportWriter>,
) -> Result<DatasetOutput> {
    info!("processing '{}' from {}", ds.title(), ds.input.display());
    let table = load(&ds.input)?;
    if table.is_empty() {
        warn!("{} has no rows", ds.input.display());
    }

    match ds.kind {
        DatasetKind::Cost => run_cost(ds, table, report),
        DatasetKind::Generations => run_generations(ds, table, report),
    }
}

fn run_cost(
    ds: &DatasetConfig,
    table: Table,
    report: Option<&mut ReportWriter>,
) -> Result<DatasetOutput> {
    let ranked = rank_by(table, &ds.column)?;
    let summary = describe(&ranked);
    write_summary(ds, &summary, report)?;

    let spec = ChartSpec {
        kind: ChartKind::Bar {
            column: ds.column.clone(),
        },
        title: ds.title().to_string(),
        x_label: String::new(),
        y_label: String::new(),
        output_path: ds.image_path("-graph"),
        y_clamp: ds.y_clamp,
    };
    render(&ranked, &spec)?;

    Ok(DatasetOutput {
        name: ds.name.clone(),
        rows: ranked.len(),
        images: vec![spec.output_path],
        summary,
    })
}

fn run_generations(
    ds: &DatasetConfig,
    table: Table,
    report: Option<&mut ReportWriter>,
) -> Result<DatasetOutput> {
    let summary = describe(&table);
    write_summary(ds, &summary, report)?;

    let mut images = Vec::with_capacity(table.columns.len() + 1);
    for column in &table.columns {
        if summary.get(column).is_some_and(|s| s.count == 0) {
            warn!("column '{column}' of {} has no values", ds.input.display());
        }
        let spec = line_spec(ds, column);
        render(&table, &spec)?;
        images.push(spec.output_path);
    }

    if has_band_columns(&table) {
        let spec = band_spec(ds);
        render(&table, &spec)?;
        images.push(spec.output_path);
    } else {
        debug!("'{}' lacks quantile columns, no band chart", ds.name);
    }

    Ok(DatasetOutput {
        name: ds.name.clone(),
        rows: table.len(),
        images,
        summary,
    })
}

/// Trend chart of one generational column, written to `<name><column>.jpg`.
pub fn line_spec(ds: &DatasetConfig, column: &str) -> ChartSpec {
    ChartSpec {
        kind: ChartKind::Line {
            column: column.to_string(),
        },
        title: format!("{} {column}", ds.title()),
        x_label: GENERATION_LABEL.to_string(),
        y_label: column.to_string(),
        output_path: ds.image_path(column),
        y_clamp: ds.y_clamp,
    }
}

/// All quantiles and the mean of a generational dataset on one chart.
pub fn band_spec(ds: &DatasetConfig) -> ChartSpec {
    ChartSpec {
        kind: ChartKind::QuantileBand,
        title: format!("{} quantiles", ds.title()),
        x_label: GENERATION_LABEL.to_string(),
        y_label: "cost".to_string(),
        output_path: ds.image_path("-band"),
        y_clamp: ds.y_clamp,
    }
}

fn write_summary(
    ds: &DatasetConfig,
    summary: &Summary,
    report: Option<&mut ReportWriter>,
) -> Result<()> {
    match report {
        Some(report) if ds.report => report.write_block(ds.title(), summary),
        _ => Ok(()),
    }
}
