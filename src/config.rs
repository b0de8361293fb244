use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::data::summary::COST_COLUMN;
use crate::error::{ReportError, Result};

// ---------------------------------------------------------------------------
// Batch manifest
// ---------------------------------------------------------------------------

/// What a batch run processes and where the results go.
///
/// ```json
/// {
///   "report": "out/test-result.txt",
///   "datasets": [
///     { "name": "un50test", "title": "unweighted 50",
///       "input": "res/un50test.csv", "output_dir": "out", "kind": "cost" }
///   ]
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchConfig {
    /// Text report shared by all datasets; no report when absent.
    #[serde(default)]
    pub report: Option<PathBuf>,
    pub datasets: Vec<DatasetConfig>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatasetKind {
    /// Per-test-case costs: ranked bar chart.
    Cost,
    /// Per-generation summary rows: one trend chart per column.
    Generations,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetConfig {
    /// File stem for every image written for this dataset.
    pub name: String,
    #[serde(default)]
    pub title: Option<String>,
    pub input: PathBuf,
    pub output_dir: PathBuf,
    pub kind: DatasetKind,
    #[serde(default)]
    pub y_clamp: Option<(f64, f64)>,
    /// Append a summary block to the report.
    #[serde(default = "default_true")]
    pub report: bool,
    /// Ranked column for `cost` datasets.
    #[serde(default = "default_cost_column")]
    pub column: String,
}

fn default_true() -> bool {
    true
}

fn default_cost_column() -> String {
    COST_COLUMN.to_string()
}

impl DatasetConfig {
    pub fn title(&self) -> &str {
        self.title.as_deref().unwrap_or(&self.name)
    }

    /// `<output_dir>/<name><suffix>.jpg`
    pub fn image_path(&self, suffix: &str) -> PathBuf {
        self.output_dir.join(format!("{}{suffix}.jpg", self.name))
    }
}

impl BatchConfig {
    pub fn from_json(text: &str) -> Result<Self> {
        let config: BatchConfig =
            serde_json::from_str(text).map_err(|e| ReportError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(ReportError::NotFound {
                path: path.to_path_buf(),
            });
        }
        let text = std::fs::read_to_string(path).map_err(|e| ReportError::io(path, e))?;
        Self::from_json(&text)
    }

    pub fn validate(&self) -> Result<()> {
        if self.datasets.is_empty() {
            return Err(ReportError::Config("no datasets listed".to_string()));
        }
        for ds in &self.datasets {
            if ds.name.trim().is_empty() {
                return Err(ReportError::Config(format!(
                    "dataset reading {} has an empty name",
                    ds.input.display()
                )));
            }
            if let Some((lo, hi)) = ds.y_clamp {
                if !(lo < hi) {
                    return Err(ReportError::Config(format!(
                        "dataset '{}': y_clamp [{lo}, {hi}] is empty",
                        ds.name
                    )));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_fill_in() {
        let config = BatchConfig::from_json(
            r#"{ "datasets": [
                { "name": "un50test", "input": "a.csv", "output_dir": "out", "kind": "cost" }
            ] }"#,
        )
        .unwrap();

        assert_eq!(config.report, None);
        let ds = &config.datasets[0];
        assert_eq!(ds.kind, DatasetKind::Cost);
        assert_eq!(ds.title(), "un50test");
        assert!(ds.report);
        assert_eq!(ds.column, "cost");
        assert_eq!(ds.image_path("-graph"), PathBuf::from("out/un50test-graph.jpg"));
    }

    #[test]
    fn test_generations_with_clamp() {
        let config = BatchConfig::from_json(
            r#"{ "report": "r.txt", "datasets": [
                { "name": "un100", "title": "un100", "input": "d.csv", "output_dir": "img",
                  "kind": "generations", "y_clamp": [0.0, 400.0], "report": false }
            ] }"#,
        )
        .unwrap();

        let ds = &config.datasets[0];
        assert_eq!(ds.kind, DatasetKind::Generations);
        assert_eq!(ds.y_clamp, Some((0.0, 400.0)));
        assert!(!ds.report);
        assert_eq!(ds.image_path("25%"), PathBuf::from("img/un10025%.jpg"));
    }

    #[test]
    fn test_rejects_empty_clamp() {
        let err = BatchConfig::from_json(
            r#"{ "datasets": [
                { "name": "x", "input": "d.csv", "output_dir": ".", "kind": "cost", "y_clamp": [5, 5] }
            ] }"#,
        )
        .unwrap_err();
        assert!(matches!(err, ReportError::Config(_)));
    }

    #[test]
    fn test_rejects_empty_batch_and_unknown_kind() {
        assert!(matches!(
            BatchConfig::from_json(r#"{ "datasets": [] }"#),
            Err(ReportError::Config(_))
        ));
        assert!(matches!(
            BatchConfig::from_json(
                r#"{ "datasets": [ { "name": "x", "input": "d.csv", "output_dir": ".", "kind": "pie" } ] }"#
            ),
            Err(ReportError::Config(_))
        ));
    }
}
