use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use ga_report::config::{BatchConfig, DatasetConfig, DatasetKind};
use ga_report::data::summary::{SummaryStat, STAT_LABELS};

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

/// Integer costs of `cases` independent test runs on a graph of `nodes` nodes.
fn test_case_costs(rng: &mut SimpleRng, nodes: usize, cases: usize, weighted: bool) -> Vec<f64> {
    let scale = if weighted { 6.0 } else { 1.0 };
    let mean = nodes as f64 * 2.4 * scale;
    (0..cases)
        .map(|_| rng.gauss(mean, mean * 0.04).round().max(0.0))
        .collect()
}

/// Population costs of a converging run, one `describe` row per generation.
fn generation_rows(
    rng: &mut SimpleRng,
    generations: usize,
    population: usize,
) -> Vec<SummaryStat> {
    let mut costs: Vec<f64> = (0..population).map(|_| rng.gauss(400.0, 60.0)).collect();
    let mut rows = Vec::with_capacity(generations);
    for _ in 0..generations {
        rows.push(SummaryStat::from_values(&costs));

        costs.sort_by(f64::total_cmp);
        let elite = population / 4;
        for i in elite..population {
            let parent = costs[i % elite.max(1)];
            costs[i] = (parent + rng.gauss(6.0, 12.0)).max(1.0);
        }
    }
    rows
}

fn write_cost_csv(path: &Path, costs: &[f64]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).context("creating cost CSV")?;
    writer.write_record(["", "cost"])?;
    for (i, cost) in costs.iter().enumerate() {
        writer.write_record([i.to_string(), cost.to_string()])?;
    }
    writer.flush()?;
    Ok(())
}

fn write_generation_csv(path: &Path, rows: &[SummaryStat]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).context("creating generation CSV")?;
    writer.write_record(std::iter::once("").chain(STAT_LABELS))?;
    for (generation, stat) in rows.iter().enumerate() {
        writer.write_record(
            std::iter::once(generation.to_string())
                .chain(stat.as_row().iter().map(|v| format!("{v:.6}"))),
        )?;
    }
    writer.flush()?;
    Ok(())
}

fn dataset(
    name: &str,
    title: &str,
    input: PathBuf,
    out_dir: &Path,
    kind: DatasetKind,
) -> DatasetConfig {
    DatasetConfig {
        name: name.to_string(),
        title: Some(title.to_string()),
        input,
        output_dir: out_dir.join("images"),
        kind,
        y_clamp: None,
        report: true,
        column: "cost".to_string(),
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let out_dir = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("sample_data"));
    std::fs::create_dir_all(out_dir.join("images")).context("creating output directory")?;

    let mut rng = SimpleRng::new(42);
    let mut datasets = Vec::new();

    for (name, title, nodes, weighted) in [
        ("un50test", "unweighted 50", 50, false),
        ("un100test", "unweighted 100", 100, false),
        ("w500test", "weighted 500", 500, true),
    ] {
        let path = out_dir.join(format!("{name}.csv"));
        write_cost_csv(&path, &test_case_costs(&mut rng, nodes, 30, weighted))?;
        datasets.push(dataset(name, title, path, &out_dir, DatasetKind::Cost));
    }

    let describe_path = out_dir.join("un100describe.csv");
    write_generation_csv(&describe_path, &generation_rows(&mut rng, 70, 40))?;
    let mut generations = dataset(
        "un100",
        "un100",
        describe_path,
        &out_dir,
        DatasetKind::Generations,
    );
    generations.report = false;
    datasets.push(generations);

    let config = BatchConfig {
        report: Some(out_dir.join("test-result.txt")),
        datasets,
    };
    config.validate()?;
    let manifest = out_dir.join("ga-report.json");
    std::fs::write(&manifest, serde_json::to_string_pretty(&config)?)
        .context("writing manifest")?;

    println!(
        "Wrote {} datasets and {}",
        config.datasets.len(),
        manifest.display()
    );
    Ok(())
}
