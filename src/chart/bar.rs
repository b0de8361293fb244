use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};

use super::{
    bar_y_range, draw_upright_y_label, extent, integer_tick, key_range, ChartSpec, FONT,
    GRID_ALPHA,
};
use crate::color::generate_palette;
use crate::data::model::Table;
use crate::data::summary::SummaryStat;
use crate::error::{ReportError, Result};

const BAR_ALPHA: f64 = 0.8;
const BAR_HALF_WIDTH: f64 = 0.4;
const MEAN_LINE_ALPHA: f64 = 0.5;

/// Caption text for a bar: the value exactly as stored, no trailing `.0`.
pub fn caption(value: f64) -> String {
    format!("{value}")
}

/// Title of a bar chart: the caller's title followed by the std.
pub fn bar_title(title: &str, std: f64) -> String {
    format!("{title}(std: {std:.2})")
}

/// Ranked bars of `column` with value captions and a dashed mean line.
///
/// Bars follow row-key order, so a table fresh out of `rank_by_cost`
/// comes out sorted by cost.
pub fn draw_bar<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    table: &Table,
    column: &str,
    spec: &ChartSpec,
) -> Result<()> {
    let bars = table.series(column).ok_or_else(|| ReportError::Schema {
        column: column.to_string(),
    })?;
    let values: Vec<f64> = bars.iter().map(|&(_, v)| v).collect();
    let stat = SummaryStat::from_values(&values);

    let (y_lo, y_hi) = spec.y_clamp.unwrap_or_else(|| {
        extent(values.iter().copied())
            .map(|(lo, hi)| bar_y_range(lo, hi))
            .unwrap_or((0.0, 1.0))
    });
    let (x_lo, x_hi) = key_range(&table.keys());

    let mut chart = ChartBuilder::on(root)
        .caption(bar_title(&spec.title, stat.std), (FONT, 26))
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(110)
        .build_cartesian_2d(x_lo..x_hi, y_lo..y_hi)?;

    chart
        .configure_mesh()
        .x_desc(spec.x_label.as_str())
        .x_labels(bars.len().clamp(2, 25))
        .x_label_formatter(&integer_tick)
        .bold_line_style(BLACK.mix(GRID_ALPHA))
        .light_line_style(TRANSPARENT)
        .label_style((FONT, 16))
        .axis_desc_style((FONT, 20))
        .draw()?;

    let bar_color = generate_palette(1)[0].mix(BAR_ALPHA);
    let base = y_lo.max(0.0);

    chart.draw_series(bars.iter().map(|&(key, v)| {
        let x = key as f64;
        Rectangle::new(
            [(x - BAR_HALF_WIDTH, base), (x + BAR_HALF_WIDTH, v)],
            bar_color.filled(),
        )
    }))?;

    let caption_style = TextStyle::from((FONT, 14).into_font())
        .color(&BLACK)
        .pos(Pos::new(HPos::Center, VPos::Bottom));
    chart.draw_series(
        bars.iter()
            .map(|&(key, v)| Text::new(caption(v), (key as f64, v), caption_style.clone())),
    )?;

    if stat.count > 0 {
        let mean_style = MAGENTA.mix(MEAN_LINE_ALPHA).stroke_width(2);
        chart
            .draw_series(DashedLineSeries::new(
                vec![(x_lo, stat.mean), (x_hi, stat.mean)],
                10,
                6,
                mean_style,
            ))?
            .label(format!("mean: {:.2}", stat.mean))
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], mean_style));

        chart
            .configure_series_labels()
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .position(SeriesLabelPosition::UpperLeft)
            .label_font((FONT, 16))
            .draw()?;
    }

    draw_upright_y_label(root, &spec.y_label)?;
    Ok(())
}
