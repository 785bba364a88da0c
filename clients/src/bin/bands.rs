//! `circlette-bands` — Clifford checks and lattice band structure.
//!
//! Verifies the Dirac triple, scans the Brillouin zone for zero-energy
//! points and optionally samples the Γ → X → M → Γ path as tab-separated
//! columns for an external plotter.
//!
//! **Usage:**
//! ```text
//! circlette-bands [--lattice naive|wilson|octagon|symmetric-diagonal]
//!                 [--mass <m>] [--grid <n>] [--threshold <e>]
//!                 [--path <samples per leg>] [--json]
//! ```

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

use std::f64::consts::PI;

use anyhow::{ensure, Result};
use circlette::algebra::{verify, DiracTriple, CLIFFORD_TOLERANCE};
use circlette::lattice::{band_path, scan, Lattice, ScanConfig};
use circlette_clients::{heading, init_logging, print_json};
use clap::{Parser, ValueEnum};

/// Scan lattice Hamiltonians for fermion doublers.
#[derive(Parser)]
#[command(name = "circlette-bands", about = "Clifford checks, Dirac-point scans and band paths")]
struct Args {
    /// Lattices to scan; all when omitted.
    #[arg(long, value_enum)]
    lattice: Vec<Family>,

    /// Bare mass added to every lattice.
    #[arg(long, default_value_t = 0.0)]
    mass: f64,

    /// Samples per Brillouin-zone axis.
    #[arg(long, default_value_t = ScanConfig::default().grid)]
    grid: usize,

    /// Gap below which a sample counts as zero energy.
    #[arg(long, default_value_t = ScanConfig::default().threshold)]
    threshold: f64,

    /// Print the band path with this many samples per leg.
    #[arg(long)]
    path: Option<usize>,

    /// Emit scans as JSON.
    #[arg(long)]
    json: bool,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Family {
    Naive,
    Wilson,
    Octagon,
    SymmetricDiagonal,
}

impl Family {
    const ALL: [Self; 4] = [
        Self::Naive,
        Self::Wilson,
        Self::Octagon,
        Self::SymmetricDiagonal,
    ];

    fn lattice(self, mass: f64) -> Lattice {
        match self {
            Self::Naive => Lattice::Naive { mass },
            Self::Wilson => Lattice::Wilson { mass, r: 1.0 },
            Self::Octagon => Lattice::Octagon {
                t1: 1.0,
                t2: 0.5,
                mass,
            },
            Self::SymmetricDiagonal => Lattice::SymmetricDiagonal { mass, r: 1.0 },
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging();
    ensure!(args.grid >= 2, "--grid must be at least 2");
    ensure!(args.threshold > 0.0, "--threshold must be positive");

    let families = if args.lattice.is_empty() {
        Family::ALL.to_vec()
    } else {
        args.lattice.clone()
    };
    let triple = DiracTriple::standard();
    let config = ScanConfig {
        grid: args.grid,
        threshold: args.threshold,
    };
    let scans: Vec<_> = families
        .iter()
        .map(|f| scan(&f.lattice(args.mass), &triple, &config))
        .collect();

    if args.json {
        return print_json(&scans);
    }

    heading("Clifford identities");
    let clifford = verify(&triple, CLIFFORD_TOLERANCE);
    for check in &clifford.checks {
        println!(
            "[{}] {} (error {:.1e})",
            if check.passed { "PASS" } else { "FAIL" },
            check.identity,
            check.error
        );
    }
    println!();

    heading(&format!("Dirac points ({}×{} grid)", config.grid, config.grid));
    for s in &scans {
        println!(
            "{:<20} {} points, {} doublers",
            s.lattice.name(),
            s.count(),
            s.doublers()
        );
        for p in &s.points {
            println!(
                "    ({:+.3}π, {:+.3}π)  gap {:.2e}  {} cells  {:?}",
                p.kx / PI,
                p.ky / PI,
                p.gap,
                p.cells,
                p.location
            );
        }
    }

    if let Some(per_leg) = args.path {
        ensure!(per_leg > 0, "--path needs at least one sample per leg");
        for f in &families {
            let lattice = f.lattice(args.mass);
            let path = band_path(&lattice, &triple, per_leg);
            println!();
            let [g, x, m, end] = path.ticks;
            println!("# {} Γ={g:.4} X={x:.4} M={m:.4} Γ={end:.4}", lattice.name());
            println!("# k\tE0\tE1\tE2\tE3");
            for (k, e) in path.k.iter().zip(&path.energies) {
                println!("{k:.6}\t{:.6}\t{:.6}\t{:.6}\t{:.6}", e[0], e[1], e[2], e[3]);
            }
        }
    }
    Ok(())
}
