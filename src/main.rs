use std::path::PathBuf;

use anyhow::{Context, Result};
use ga_report::{run_batch, BatchConfig};

const DEFAULT_MANIFEST: &str = "ga-report.json";

fn main() -> Result<()> {
    env_logger::init();

    let manifest = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_MANIFEST));

    let config = BatchConfig::load(&manifest)
        .with_context(|| format!("reading manifest {}", manifest.display()))?;
    let outputs = run_batch(&config).context("report batch failed")?;

    let images: usize = outputs.iter().map(|o| o.images.len()).sum();
    log::info!("{} datasets processed, {images} charts written", outputs.len());
    Ok(())
}
