//! `circlette-rules` — Scores candidate XOR rules and applies the
//! uniqueness policy.
//!
//! By default the candidates are the eight ring-adjacent directed pairs;
//! `--exhaustive` scores all 56 ordered pairs instead.
//!
//! **Usage:**
//! ```text
//! circlette-rules [--exhaustive] [--json]
//! ```

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

use anyhow::Result;
use circlette::catalogue::Catalogue;
use circlette::constraint::valid_set;
use circlette::rule::{find_unique_rule, weak_doublets, RuleCandidateSet, SearchOutcome};
use circlette_clients::{heading, init_logging, print_json};
use clap::Parser;

/// Search for the unique update rule.
#[derive(Parser)]
#[command(name = "circlette-rules", about = "Rank single-XOR update rules over the valid spectrum")]
struct Args {
    /// Score every ordered pair of ring positions, not just ring-adjacent ones.
    #[arg(long)]
    exhaustive: bool,

    /// Emit the search report as JSON.
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging();

    let candidates = if args.exhaustive {
        RuleCandidateSet::all_couplings()
    } else {
        RuleCandidateSet::canonical()
    };
    let valid = valid_set();
    let report = find_unique_rule(&candidates, &valid);

    if args.json {
        return print_json(&report);
    }

    heading(&format!(
        "Rule search over {} candidates ({} singular)",
        candidates.len(),
        candidates.singular().count()
    ));
    println!(
        "{:<8} {:>4} {:>5} {:>6} {:>6} {:>6} {:>5}",
        "rule", "inv", "pure", "fixed", "cost", "avg", "order"
    );
    for a in &report.ranking {
        println!(
            "{:<8} {:>4} {:>5} {:>6} {:>6} {:>6.3} {:>5}",
            a.rule.to_string(),
            if a.invertible { "yes" } else { "no" },
            a.valid_in_pure,
            a.fixed_point_count,
            a.cost().to_string(),
            a.avg_cost(),
            a.order.map_or_else(|| "-".to_string(), |o| o.to_string())
        );
    }
    println!();
    println!("{} candidates qualify.", report.qualifying);

    match &report.outcome {
        SearchOutcome::Unique(w) => {
            println!(
                "Unique winner: {} (cost {}, order {:?}, {} fixed points, {} cycles over all states)",
                w.rule,
                w.cost(),
                w.order,
                w.fixed_point_count,
                w.total_cycles
            );
            println!();
            let cat = Catalogue::global();
            let doublets = weak_doublets(&w.rule, &valid);
            heading(&format!("Doublets ({})", doublets.len()));
            for (a, b) in doublets {
                println!("{:<8} ↔ {:<8}  {a} ↔ {b}", cat.name(a), cat.name(b));
            }
        }
        SearchOutcome::Ambiguous(tied) => {
            let names: Vec<String> = tied.iter().map(|a| a.rule.to_string()).collect();
            println!(
                "Ambiguous: {} rules tie at cost {}: {}",
                tied.len(),
                tied.first().map(|a| a.cost().to_string()).unwrap_or_default(),
                names.join(", ")
            );
        }
        SearchOutcome::NoneFound => println!("No candidate qualifies."),
    }
    Ok(())
}
