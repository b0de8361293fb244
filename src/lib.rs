//! Descriptive statistics and charts for genetic-algorithm test runs.
//!
//! Each dataset goes through the same three stages:
//!
//! ```text
//!   loader::load ──► summary::{rank_by_cost, describe} ──► chart::render
//!                                   │
//!                                   └──► report::ReportWriter
//! ```

pub mod chart;
pub mod color;
pub mod config;
pub mod data;
pub mod error;
pub mod pipeline;
pub mod report;

pub use chart::{render, ChartKind, ChartSpec};
pub use config::{BatchConfig, DatasetConfig, DatasetKind};
pub use data::loader::load;
pub use data::model::{Row, Table};
pub use data::summary::{describe, rank_by_cost, Summary, SummaryStat};
pub use error::{ReportError, Result};
pub use pipeline::{run_batch, run_dataset, DatasetOutput};
pub use report::{with_report, ReportWriter};
