//! `circlette-fit` — Fits mass-matrix couplings to the measured CKM
//! magnitudes.
//!
//! Settings come from the model's defaults, then an optional TOML file,
//! then command-line flags.
//!
//! **Usage:**
//! ```text
//! circlette-fit [--config <fit.toml>] [--model shared|separate|ring-distance]
//!               [--restarts <n>] [--seed <n>] [--json]
//! ```
//!
//! **Config file:**
//! ```toml
//! model = "separate"
//! restarts = 200
//! seed = 7
//!
//! [nelder_mead]
//! max_iter = 8000
//! ```

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use circlette::fit::{fit, FitConfig, ModelKind};
use circlette_clients::{heading, init_logging, matrix_rows, print_json};
use clap::{Parser, ValueEnum};
use tracing::info;

/// Fit a CKM model.
#[derive(Parser)]
#[command(name = "circlette-fit", about = "Multi-start fit of mass-matrix couplings to CKM data")]
struct Args {
    /// TOML file with fit settings.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Model to fit (overrides the file).
    #[arg(long, value_enum)]
    model: Option<Model>,

    /// Number of random starting points.
    #[arg(long)]
    restarts: Option<usize>,

    /// RNG seed.
    #[arg(long)]
    seed: Option<u64>,

    /// Emit the fit as JSON.
    #[arg(long)]
    json: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum Model {
    Shared,
    Separate,
    RingDistance,
}

impl From<Model> for ModelKind {
    fn from(m: Model) -> Self {
        match m {
            Model::Shared => Self::Shared,
            Model::Separate => Self::Separate,
            Model::RingDistance => Self::RingDistance,
        }
    }
}

/// Model defaults, overlaid by the file.
fn load_config(path: &Path, model: Option<ModelKind>) -> Result<FitConfig> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let table: toml::Table = toml::from_str(&text)
        .with_context(|| format!("Failed to parse {} as TOML", path.display()))?;
    let from_file: Option<ModelKind> = table
        .get("model")
        .cloned()
        .map(|v| v.try_into())
        .transpose()
        .with_context(|| format!("Unknown model in {}", path.display()))?;
    let base = FitConfig::for_model(model.or(from_file).unwrap_or_default());
    let mut merged = match toml::Value::try_from(&base).context("Failed to encode defaults")? {
        toml::Value::Table(t) => t,
        _ => anyhow::bail!("Fit defaults are not a table"),
    };
    for (key, value) in table {
        match (merged.get_mut(&key), value) {
            (Some(toml::Value::Table(dst)), toml::Value::Table(src)) => dst.extend(src),
            (_, value) => {
                merged.insert(key, value);
            }
        }
    }
    let mut config: FitConfig = toml::Value::Table(merged)
        .try_into()
        .with_context(|| format!("Invalid fit settings in {}", path.display()))?;
    if let Some(model) = model {
        config.model = model;
    }
    Ok(config)
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging();

    let model = args.model.map(ModelKind::from);
    let mut config = match &args.config {
        Some(path) => load_config(path, model)?,
        None => FitConfig::for_model(model.unwrap_or_default()),
    };
    if let Some(restarts) = args.restarts {
        config.restarts = restarts;
    }
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    info!(model = ?config.model, restarts = config.restarts, seed = config.seed, "starting fit");

    let result = fit(&config).context("Fit failed")?;

    if args.json {
        return print_json(&result);
    }

    heading(&format!("CKM fit: {:?} model", result.model));
    println!(
        "{} restarts, seed {}, {} finite trials, best at trial {}",
        result.result.restarts,
        config.seed,
        result.result.finite_trials,
        result.result.best_trial
    );
    println!(
        "Squared error {:.3e}, rms {:.3e}, converged: {}",
        result.error, result.rms, result.result.best.converged
    );
    println!(
        "Parameters: [{}]",
        result
            .params
            .iter()
            .map(|p| format!("{p:.6}"))
            .collect::<Vec<_>>()
            .join(", ")
    );
    println!();

    println!("|V| fitted:");
    for row in matrix_rows(&result.mixing.magnitudes, 5) {
        println!("  {row}");
    }
    println!("|V| target:");
    for row in matrix_rows(&config.data.target, 5) {
        println!("  {row}");
    }
    println!();
    let m = &result.mixing;
    println!("Unitarity error  {:.2e}", m.unitarity_error);
    println!("Jarlskog J       {:.3e}", m.jarlskog);
    println!("Wolfenstein λ    {:.5}", m.wolfenstein_lambda);
    println!("Wolfenstein A    {:.5}", m.wolfenstein_a);
    println!("Up masses (MeV)  {:?}", m.masses_up);
    println!("Down masses (MeV) {:?}", m.masses_down);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_overlays_model_defaults() -> Result<()> {
        let dir = std::env::temp_dir().join(format!("circlette-fit-{}", std::process::id()));
        fs::create_dir_all(&dir)?;
        let path = dir.join("fit.toml");
        fs::write(
            &path,
            "model = \"separate\"\nrestarts = 3\n[nelder_mead]\nmax_iter = 50\n",
        )?;
        let config = load_config(&path, None)?;
        assert_eq!(config.model, ModelKind::Separate);
        assert_eq!(config.restarts, 3);
        assert_eq!(config.seed, FitConfig::separate().seed);
        assert_eq!(config.nelder_mead.max_iter, 50);
        assert_eq!(config.nelder_mead.xatol, FitConfig::separate().nelder_mead.xatol);

        let forced = load_config(&path, Some(ModelKind::Shared))?;
        assert_eq!(forced.model, ModelKind::Shared);
        assert_eq!(forced.seed, FitConfig::shared().seed);
        fs::remove_dir_all(&dir)?;
        Ok(())
    }
}
