//! `circlette-verify` — Runs the Circlette conformance suite.
//!
//! Covers the spectrum inventory, the rule search, the charge sector, the
//! Clifford identities, CKM mixing and lattice doubling.
//!
//! **Usage:**
//! ```text
//! circlette-verify [--json] [--quiet]
//! ```
//!
//! Exits non-zero if any conformance check fails.

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

use std::process;

use anyhow::Result;
use circlette_clients::{heading, init_logging, print_json};
use circlette_conformance::{run_all, Severity};
use clap::Parser;

/// Run the Circlette conformance suite.
#[derive(Parser)]
#[command(
    name = "circlette-verify",
    about = "Check every claimed invariant of the ring, the rule search and the mixing pipeline"
)]
struct Args {
    /// Emit the report as JSON.
    #[arg(long)]
    json: bool,

    /// Only print warnings, failures and the summary.
    #[arg(long, short)]
    quiet: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging();

    let report = run_all();
    let failed = report.failure_count();

    if args.json {
        print_json(&report)?;
    } else {
        heading("Circlette Conformance Report");
        println!();

        for result in &report.results {
            if args.quiet && result.severity == Severity::Pass {
                continue;
            }
            println!(
                "[{}] {} — {}",
                result.severity.tag(),
                result.validator,
                result.message
            );
            for detail in &result.details {
                println!("       {}", detail);
            }
        }

        println!();
        println!(
            "Summary: {} passed, {} warnings, {} failed",
            report.count(Severity::Pass),
            report.count(Severity::Warning),
            failed
        );
    }

    if failed > 0 {
        eprintln!("Conformance FAILED: {} check(s) did not pass.", failed);
        process::exit(1);
    }

    if !args.json {
        println!("Conformance PASSED.");
    }
    Ok(())
}
