//! `circlette-spectrum` — Prints the valid spectrum and its charge sector.
//!
//! **Output:** the 45 valid states with labels and charges, the sterile
//! candidates, trace sums, anomaly cancellation per generation, Weinberg
//! angle ratios and the Koide ratio of each flavour triple.
//!
//! **Usage:**
//! ```text
//! circlette-spectrum [--all] [--json]
//! ```

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

use anyhow::Result;
use circlette::catalogue::{koide_ratio, Catalogue, Kind};
use circlette::charge::{anomalies_by_generation, QuantumNumbers, WeinbergAnalysis};
use circlette::constraint::{all_states, evaluate, sterile_candidates, valid_states};
use circlette::ring::State;
use circlette_clients::{heading, init_logging, print_json};
use clap::Parser;
use serde::Serialize;

/// Print the valid spectrum.
#[derive(Parser)]
#[command(name = "circlette-spectrum", about = "Enumerate and label the valid ring states")]
struct Args {
    /// List all 256 states with their four rule verdicts.
    #[arg(long)]
    all: bool,

    /// Emit JSON instead of text.
    #[arg(long)]
    json: bool,
}

#[derive(Serialize)]
struct Entry {
    state: State,
    name: String,
    quantum_numbers: QuantumNumbers,
}

#[derive(Serialize)]
struct Spectrum {
    valid: Vec<Entry>,
    sterile: Vec<State>,
    weinberg: WeinbergAnalysis,
    anomalies_cancel: [bool; 3],
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging();

    let cat = Catalogue::global();
    let spectrum = Spectrum {
        valid: valid_states()
            .map(|s| Entry {
                state: s,
                name: cat.name(s),
                quantum_numbers: QuantumNumbers::of(s),
            })
            .collect(),
        sterile: sterile_candidates().collect(),
        weinberg: WeinbergAnalysis::experimental(),
        anomalies_cancel: anomalies_by_generation().map(|a| a.cancels()),
    };

    if args.json {
        return print_json(&spectrum);
    }

    if args.all {
        heading("All states");
        println!("{:<10} R1 R2 R3 R4  valid", "state");
        for s in all_states() {
            let v = evaluate(s);
            let mark = |ok: bool| if ok { " ✓ " } else { " · " };
            println!(
                "{:<10}{}{}{}{}  {}",
                s.to_string(),
                mark(v.r1),
                mark(v.r2),
                mark(v.r3),
                mark(v.r4),
                if v.is_valid() { cat.name(s) } else { String::new() }
            );
        }
        println!();
    }

    heading(&format!("Valid states ({})", spectrum.valid.len()));
    println!("{:<10} {:<8} {:>5} {:>5} {:>5}", "state", "name", "Q", "T3", "Y");
    for e in &spectrum.valid {
        let qn = &e.quantum_numbers;
        println!(
            "{:<10} {:<8} {:>5} {:>5} {:>5}",
            e.state.to_string(),
            e.name,
            qn.q.to_string(),
            qn.t3.to_string(),
            qn.y.to_string()
        );
    }
    println!();

    heading("Sterile candidates (fail only R4)");
    for s in &spectrum.sterile {
        println!("{s}");
    }
    println!();

    let w = &spectrum.weinberg;
    heading("Charge sector");
    println!(
        "ΣQ = {}  ΣQ² = {}  ΣT3² = {}  Σ(Y/2)² = {}",
        w.traces.sum_q, w.traces.sum_q2, w.traces.sum_t3_sq, w.traces.sum_half_y_sq
    );
    for (g, ok) in spectrum.anomalies_cancel.iter().enumerate() {
        println!(
            "Generation {}: anomalies {}",
            g + 1,
            if *ok { "cancel" } else { "DO NOT cancel" }
        );
    }
    println!("GUT ratio ΣT3²/ΣQ² = {}", w.gut_ratio);
    println!("Hypercharge ratio = {}  (SU(5): {})", w.hypercharge_ratio, w.su5_ratio);
    println!("k needed for sin²θ_W = {}: {:.5}", w.target, w.k_needed);
    for f in w.nearby.iter().take(5) {
        println!(
            "  k = {:<6} sin²θ_W = {:.5}  ({:.3}% off)",
            f.k.to_string(),
            f.sin2,
            100.0 * f.deviation
        );
    }
    println!();

    heading("Koide ratios (2/3 = 0.66667)");
    let triples = [
        ("charged leptons", Kind::Lepton, true),
        ("up quarks", Kind::Quark, false),
        ("down quarks", Kind::Quark, true),
    ];
    for (label, kind, isospin) in triples {
        let m = Catalogue::generation_masses(kind, isospin);
        println!("{:<16} {:.5}", label, koide_ratio(m));
    }
    Ok(())
}
