//! Shared plumbing for the Circlette client binaries.

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

use serde::Serialize;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Installs a stderr subscriber filtered by `RUST_LOG`, `warn` otherwise.
///
/// Stdout stays a clean report.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

/// Pretty JSON on stdout.
///
/// # Errors
///
/// Returns an error if `value` fails to serialise.
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// A heading underlined to its width.
pub fn heading(title: &str) {
    println!("{title}");
    println!("{}", "=".repeat(title.chars().count()));
}

/// Rows of a 3×3 real matrix, fixed precision.
pub fn matrix_rows(m: &[[f64; 3]; 3], precision: usize) -> Vec<String> {
    m.iter()
        .map(|row| {
            row.iter()
                .map(|x| format!("{x:>width$.precision$}", width = precision + 4))
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect()
}
