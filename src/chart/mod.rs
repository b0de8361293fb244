/// Chart layer: one drawing context per image.
///
/// ```text
///   Table ──► ChartSpec ──► Canvas::draw ──► Canvas::save ──► .jpg
///                             (line / bar)     (encode, drop)
/// ```
///
/// A [`Canvas`] owns its pixel buffer and is consumed by `save`, so no
/// drawing state survives from one chart to the next.

pub mod bar;
pub mod line;

use std::path::{Path, PathBuf};

use image::{ImageFormat, RgbImage};
use log::info;
use plotters::coord::Shift;
use plotters::drawing::DrawingAreaErrorKind;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};

use crate::data::model::Table;
use crate::error::{ReportError, Result};

/// Canvas size in pixels: 12×8 at 100 dpi.
pub const CANVAS_SIZE: (u32, u32) = (1200, 800);

/// Opacity of the axis grid lines.
pub const GRID_ALPHA: f64 = 0.3;

pub(crate) const FONT: &str = "sans-serif";

// ---------------------------------------------------------------------------
// ChartSpec – what to draw and where
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum ChartKind {
    /// One column against the row key.
    Line { column: String },
    /// `min`, `25%`, `50%`, `75%`, `max` and a faded `mean` on one chart.
    QuantileBand,
    /// One bar per row with captions and a dashed mean line.
    Bar { column: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartSpec {
    pub kind: ChartKind,
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub output_path: PathBuf,
    /// Fixed y-axis range; computed from the data when `None`.
    pub y_clamp: Option<(f64, f64)>,
}

/// Draw `table` as described by `spec` and write the image.
pub fn render(table: &Table, spec: &ChartSpec) -> Result<()> {
    let mut canvas = Canvas::new(CANVAS_SIZE);
    match &spec.kind {
        ChartKind::Line { column } => {
            canvas.draw(|root| line::draw_line(root, table, column, spec))?
        }
        ChartKind::QuantileBand => canvas.draw(|root| line::draw_band(root, table, spec))?,
        ChartKind::Bar { column } => {
            canvas.draw(|root| bar::draw_bar(root, table, column, spec))?
        }
    }
    canvas.save(&spec.output_path)?;
    info!("wrote {}", spec.output_path.display());
    Ok(())
}

// ---------------------------------------------------------------------------
// Canvas – per-chart drawing context
// ---------------------------------------------------------------------------

/// An RGB pixel buffer that one chart is drawn into.
pub struct Canvas {
    width: u32,
    height: u32,
    buffer: Vec<u8>,
}

impl Canvas {
    pub fn new((width, height): (u32, u32)) -> Self {
        Canvas {
            width,
            height,
            buffer: vec![0; width as usize * height as usize * 3],
        }
    }

    /// Clear to white, run `paint`, and flush the backend into the buffer.
    pub fn draw<F>(&mut self, paint: F) -> Result<()>
    where
        F: for<'b> FnOnce(&DrawingArea<BitMapBackend<'b>, Shift>) -> Result<()>,
    {
        let root = BitMapBackend::with_buffer(&mut self.buffer, (self.width, self.height))
            .into_drawing_area();
        root.fill(&WHITE)?;
        paint(&root)?;
        root.present()?;
        Ok(())
    }

    /// Encode the buffer to `path` and release it.
    ///
    /// The format follows the extension; anything but `.png` is written as JPEG.
    pub fn save(self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            if !dir.is_dir() {
                return Err(ReportError::io(
                    path,
                    std::io::Error::new(
                        std::io::ErrorKind::NotFound,
                        format!("output directory {} does not exist", dir.display()),
                    ),
                ));
            }
        }

        let format = match ImageFormat::from_path(path) {
            Ok(ImageFormat::Png) => ImageFormat::Png,
            _ => ImageFormat::Jpeg,
        };
        let image = RgbImage::from_raw(self.width, self.height, self.buffer)
            .ok_or_else(|| ReportError::Render("pixel buffer has the wrong size".to_string()))?;
        image.save_with_format(path, format).map_err(|e| match e {
            image::ImageError::IoError(source) => ReportError::io(path, source),
            other => ReportError::io(path, std::io::Error::other(other)),
        })
    }
}

// ---------------------------------------------------------------------------
// Axis ranges
// ---------------------------------------------------------------------------

/// Round down to a multiple of ten (floor division, so `-5 → -10`).
pub fn floor10(v: f64) -> f64 {
    (v / 10.0).floor() * 10.0
}

/// Y range for bar charts: ten below and ten above the decade of each extreme.
///
/// `[12, 47]` → `(0, 50)`; an extreme on a multiple of ten still gets a
/// full decade of headroom (`[20, 50]` → `(10, 60)`).
pub fn bar_y_range(min: f64, max: f64) -> (f64, f64) {
    (floor10(min) - 10.0, floor10(max) + 10.0)
}

/// Data range padded by 5% on both sides, or ±1 when the series is flat.
pub fn padded_range(min: f64, max: f64) -> (f64, f64) {
    if !min.is_finite() || !max.is_finite() {
        return (0.0, 1.0);
    }
    let span = max - min;
    if span.abs() < f64::EPSILON {
        (min - 1.0, max + 1.0)
    } else {
        (min - span * 0.05, max + span * 0.05)
    }
}

/// Min and max of the finite values, if any.
pub(crate) fn extent(values: impl IntoIterator<Item = f64>) -> Option<(f64, f64)> {
    values
        .into_iter()
        .filter(|v| v.is_finite())
        .fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
}

/// X range covering the row keys with half a step on either side.
pub(crate) fn key_range(keys: &[i64]) -> (f64, f64) {
    match extent(keys.iter().map(|&k| k as f64)) {
        Some((lo, hi)) => (lo - 0.5, hi + 0.5),
        None => (-0.5, 0.5),
    }
}

/// Tick label for an integer-keyed axis; fractional positions stay blank.
pub(crate) fn integer_tick(x: &f64) -> String {
    if (x - x.round()).abs() < 1e-6 {
        format!("{}", x.round() as i64)
    } else {
        String::new()
    }
}

/// Paint a horizontal axis label into the left margin of `root`.
///
/// Plotters always rotates `y_desc`, which these charts do not want.
pub(crate) fn draw_upright_y_label<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    label: &str,
) -> std::result::Result<(), DrawingAreaErrorKind<DB::ErrorType>> {
    if label.is_empty() {
        return Ok(());
    }
    let (_, height) = root.dim_in_pixel();
    let style = TextStyle::from((FONT, 20).into_font()).pos(Pos::new(HPos::Left, VPos::Center));
    root.draw(&Text::new(label.to_string(), (12, height as i32 / 2), style))
}
