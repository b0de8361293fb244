use plotters::coord::Shift;
use plotters::prelude::*;

use super::{
    draw_upright_y_label, extent, integer_tick, key_range, padded_range, ChartSpec, FONT,
    GRID_ALPHA,
};
use crate::color::generate_palette;
use crate::data::model::Table;
use crate::error::{ReportError, Result};

/// Quantile columns of a generational summary, bottom to top.
pub const QUANTILE_COLUMNS: [&str; 5] = ["min", "25%", "50%", "75%", "max"];

/// Column drawn faded over the quantile band.
pub const MEAN_COLUMN: &str = "mean";

/// Series that get a legend entry on the band chart, in legend order.
const BAND_LEGEND: [&str; 5] = ["min", "25%", "50%", "max", MEAN_COLUMN];

const SERIES_ALPHA: f64 = 0.8;
const MEAN_ALPHA: f64 = 0.4;
const MARKER_SIZE: u32 = 3;

/// Whether `table` carries everything the band chart needs.
pub fn has_band_columns(table: &Table) -> bool {
    band_layers().all(|(name, _)| table.has_column(name))
}

/// Band chart series in draw order, each flagged with whether it is labelled.
fn band_layers() -> impl Iterator<Item = (&'static str, bool)> {
    QUANTILE_COLUMNS
        .into_iter()
        .chain(std::iter::once(MEAN_COLUMN))
        .map(|name| (name, BAND_LEGEND.contains(&name)))
}

// ---------------------------------------------------------------------------
// Single-column trend
// ---------------------------------------------------------------------------

/// One column against the row key, a line with point markers.
pub fn draw_line<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    table: &Table,
    column: &str,
    spec: &ChartSpec,
) -> Result<()> {
    let points = table.series(column).ok_or_else(|| ReportError::Schema {
        column: column.to_string(),
    })?;

    let (y_lo, y_hi) = spec.y_clamp.unwrap_or_else(|| {
        extent(points.iter().map(|&(_, v)| v))
            .map(|(lo, hi)| padded_range(lo, hi))
            .unwrap_or((0.0, 1.0))
    });
    let (x_lo, x_hi) = key_range(&table.keys());

    let mut chart = ChartBuilder::on(root)
        .caption(&spec.title, (FONT, 26))
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(110)
        .build_cartesian_2d(x_lo..x_hi, y_lo..y_hi)?;

    chart
        .configure_mesh()
        .x_desc(spec.x_label.as_str())
        .x_label_formatter(&integer_tick)
        .bold_line_style(BLACK.mix(GRID_ALPHA))
        .light_line_style(TRANSPARENT)
        .label_style((FONT, 16))
        .axis_desc_style((FONT, 20))
        .draw()?;

    let color = generate_palette(1)[0].mix(SERIES_ALPHA);
    let xy: Vec<(f64, f64)> = points.iter().map(|&(k, v)| (k as f64, v)).collect();

    chart.draw_series(LineSeries::new(xy.iter().copied(), color.stroke_width(2)))?;
    chart.draw_series(
        xy.iter()
            .map(|&p| Circle::new(p, MARKER_SIZE, color.filled())),
    )?;

    draw_upright_y_label(root, &spec.y_label)?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Quantile band
// ---------------------------------------------------------------------------

/// Quantile columns as plain lines with the mean on top, faded and marked.
pub fn draw_band<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    table: &Table,
    spec: &ChartSpec,
) -> Result<()> {
    let mut series = Vec::with_capacity(QUANTILE_COLUMNS.len() + 1);
    for (name, labelled) in band_layers() {
        let points = table.series(name).ok_or_else(|| ReportError::Schema {
            column: name.to_string(),
        })?;
        let xy: Vec<(f64, f64)> = points.into_iter().map(|(k, v)| (k as f64, v)).collect();
        series.push((name, labelled, xy));
    }

    let (y_lo, y_hi) = spec.y_clamp.unwrap_or_else(|| {
        extent(series.iter().flat_map(|(_, _, xy)| xy.iter().map(|&(_, y)| y)))
            .map(|(lo, hi)| padded_range(lo, hi))
            .unwrap_or((0.0, 1.0))
    });
    let (x_lo, x_hi) = key_range(&table.keys());

    let mut chart = ChartBuilder::on(root)
        .caption(&spec.title, (FONT, 26))
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(110)
        .build_cartesian_2d(x_lo..x_hi, y_lo..y_hi)?;

    chart
        .configure_mesh()
        .x_desc(spec.x_label.as_str())
        .x_label_formatter(&integer_tick)
        .bold_line_style(BLACK.mix(GRID_ALPHA))
        .light_line_style(TRANSPARENT)
        .label_style((FONT, 16))
        .axis_desc_style((FONT, 20))
        .draw()?;

    let palette = generate_palette(series.len());
    for ((name, labelled, xy), base) in series.iter().zip(palette) {
        let is_mean = *name == MEAN_COLUMN;
        let color = base.mix(if is_mean { MEAN_ALPHA } else { SERIES_ALPHA });

        let drawn = chart.draw_series(LineSeries::new(xy.iter().copied(), color.stroke_width(2)))?;
        if *labelled {
            drawn.label(*name).legend(move |(x, y)| {
                PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2))
            });
        }
        if is_mean {
            chart.draw_series(
                xy.iter()
                    .map(|&p| Circle::new(p, MARKER_SIZE, color.filled())),
            )?;
        }
    }

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .position(SeriesLabelPosition::UpperRight)
        .label_font((FONT, 16))
        .draw()?;

    draw_upright_y_label(root, &spec.y_label)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::Row;

    fn generation_table(columns: &[&str]) -> Table {
        let rows = (0..3)
            .map(|g| Row {
                key: g,
                values: columns.iter().map(|_| Some(g as f64)).collect(),
            })
            .collect();
        Table::from_rows("", columns.iter().map(|c| c.to_string()).collect(), rows).unwrap()
    }

    #[test]
    fn test_band_requires_all_quantiles_and_mean() {
        let full = generation_table(&["count", "mean", "std", "min", "25%", "50%", "75%", "max"]);
        assert!(has_band_columns(&full));

        let partial = generation_table(&["mean", "min", "max"]);
        assert!(!has_band_columns(&partial));
    }

    #[test]
    fn test_band_draws_upper_quartile_without_legend() {
        let drawn: Vec<&str> = band_layers().map(|(name, _)| name).collect();
        assert_eq!(drawn, ["min", "25%", "50%", "75%", "max", "mean"]);

        let unlabelled: Vec<&str> = band_layers()
            .filter(|&(_, labelled)| !labelled)
            .map(|(name, _)| name)
            .collect();
        assert_eq!(unlabelled, ["75%"]);
    }

    #[test]
    fn test_band_legend_lists_mean_last() {
        // plotters lists legend entries in the order their series were drawn
        let legend: Vec<&str> = band_layers()
            .filter(|&(_, labelled)| labelled)
            .map(|(name, _)| name)
            .collect();
        assert_eq!(legend, ["min", "25%", "50%", "max", "mean"]);
    }
}
