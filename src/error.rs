use std::path::PathBuf;

use plotters::drawing::DrawingAreaErrorKind;
use thiserror::Error;

// ---------------------------------------------------------------------------
// ReportError – every way a reporting run can fail
// ---------------------------------------------------------------------------

/// Errors raised by the load → summarize → render pipeline.
///
/// None of these are retried; the first one aborts the batch.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("input file not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("{}:{line}: {message}", path.display())]
    Parse {
        path: PathBuf,
        /// 1-based line in the source file (the header is line 1).
        line: u64,
        message: String,
    },

    #[error("table has no '{column}' column")]
    Schema { column: String },

    #[error("cannot write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("chart rendering failed: {0}")]
    Render(String),

    #[error("invalid batch manifest: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, ReportError>;

impl ReportError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ReportError::Io {
            path: path.into(),
            source,
        }
    }
}

impl<E> From<DrawingAreaErrorKind<E>> for ReportError
where
    E: std::error::Error + Send + Sync,
{
    fn from(err: DrawingAreaErrorKind<E>) -> Self {
        ReportError::Render(err.to_string())
    }
}
