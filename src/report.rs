use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use log::debug;

use crate::data::summary::Summary;
use crate::error::{ReportError, Result};

// ---------------------------------------------------------------------------
// ReportWriter – append-only text report
// ---------------------------------------------------------------------------

/// Sequential writer for the plain-text statistics report.
///
/// The file is truncated on creation.  Each block is a title line, the
/// summary table, and a blank separator line.  Dropping the writer
/// flushes what was buffered, so an aborted batch still leaves the blocks
/// written so far on disk.
pub struct ReportWriter {
    path: PathBuf,
    out: BufWriter<File>,
    blocks: usize,
}

impl ReportWriter {
    pub fn create(path: &Path) -> Result<Self> {
        let file = File::create(path).map_err(|e| ReportError::io(path, e))?;
        Ok(ReportWriter {
            path: path.to_path_buf(),
            out: BufWriter::new(file),
            blocks: 0,
        })
    }

    /// Number of blocks written so far.
    pub fn blocks(&self) -> usize {
        self.blocks
    }

    pub fn write_block(&mut self, title: &str, summary: &Summary) -> Result<()> {
        writeln!(self.out, "{title}\n{summary}\n").map_err(|e| ReportError::io(&self.path, e))?;
        self.blocks += 1;
        Ok(())
    }

    /// Flush and close the report.
    pub fn finish(mut self) -> Result<()> {
        self.out.flush().map_err(|e| ReportError::io(&self.path, e))?;
        debug!("report {} closed after {} blocks", self.path.display(), self.blocks);
        Ok(())
    }
}

/// Open the report at `path`, hand it to `body`, and close it.
///
/// The writer is released on every exit path; on success it is flushed
/// explicitly so write errors at close time are reported.
pub fn with_report<T, F>(path: &Path, body: F) -> Result<T>
where
    F: FnOnce(&mut ReportWriter) -> Result<T>,
{
    let mut writer = ReportWriter::create(path)?;
    let value = body(&mut writer)?;
    writer.finish()?;
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{Row, Table};
    use crate::data::summary::describe;

    fn summary_of(costs: &[f64]) -> Summary {
        let rows = costs
            .iter()
            .enumerate()
            .map(|(i, &c)| Row {
                key: i as i64,
                values: vec![Some(c)],
            })
            .collect();
        describe(&Table::from_rows("", vec!["cost".into()], rows).unwrap())
    }

    #[test]
    fn test_blocks_are_titled_and_separated() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("report.txt");

        let blocks = with_report(&path, |report| {
            report.write_block("unweighted 50", &summary_of(&[10.0, 20.0, 30.0]))?;
            report.write_block("weighted 500", &summary_of(&[1.0, 2.0]))?;
            Ok(report.blocks())
        })
        .unwrap();
        assert_eq!(blocks, 2);

        let text = std::fs::read_to_string(&path).unwrap();
        let chunks: Vec<&str> = text.split("\n\n").filter(|c| !c.is_empty()).collect();
        assert_eq!(chunks.len(), 2);
        assert!(chunks[0].starts_with("unweighted 50\n"));
        assert!(chunks[1].starts_with("weighted 500\n"));
        assert!(text.ends_with("\n\n"));
    }

    #[test]
    fn test_report_is_truncated_on_open() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("report.txt");
        std::fs::write(&path, "stale contents\n").unwrap();

        with_report(&path, |_| Ok(())).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "");
    }

    #[test]
    fn test_error_in_body_still_flushes_written_blocks() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("report.txt");

        let err = with_report(&path, |report| -> Result<()> {
            report.write_block("first", &summary_of(&[1.0]))?;
            Err(ReportError::Schema {
                column: "cost".into(),
            })
        })
        .unwrap_err();
        assert!(matches!(err, ReportError::Schema { .. }));

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("first\n"));
    }

    #[test]
    fn test_unwritable_location_is_io_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("missing").join("report.txt");
        assert!(matches!(
            ReportWriter::create(&path),
            Err(ReportError::Io { .. })
        ));
    }
}
