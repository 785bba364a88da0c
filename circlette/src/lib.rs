//! Circlette - an 8-bit ring encoding of Standard Model fermions
//!
//! Every fermion is one 8-bit state on a closed ring of named positions.
//! Four local rules select the physical states; a search over single-XOR
//! update rules picks out the weak interaction; the same structure feeds
//! mass matrices, mixing angles and lattice band structure.
//!
//! # Ring Layout
//!
//! ```text
//! Index:   0   1   2   3   4   5   6   7
//! Bit:    G0  G1  C0  C1  LQ  I3  χ   W
//! ```
//!
//! # Spectrum
//!
//! | Set | Count |
//! |-----|-------|
//! | All states | 256 |
//! | Valid (R1–R4) | 45 |
//! | Leptons | 9 |
//! | Quarks | 36 |
//! | Failing only R4 | 3 |
//!
//! # Two Pipelines
//!
//! ```text
//! combinatorial:  ring → constraint → catalogue → rule::{gf2, evaluator, search}
//! linear algebra: algebra → lattice,  mixing → fit,  charge,  walk
//! ```
//!
//! Both are pure and deterministic. The only shared state is the lazily
//! built [`Catalogue::global`].
//!
//! # Example: Spectrum
//!
//! ```
//! use circlette::constraint::{valid_states, sterile_candidates};
//!
//! assert_eq!(valid_states().count(), 45);
//! assert_eq!(sterile_candidates().count(), 3);
//! ```
//!
//! # Example: Rule Search
//!
//! ```
//! use circlette::prelude::*;
//!
//! let report = find_unique_rule(&RuleCandidateSet::canonical(), &valid_set());
//! let winner = report.outcome.unique().unwrap();
//! assert_eq!(winner.rule.to_string(), "I3⊕=LQ");
//! assert_eq!(winner.order, Some(2));
//! assert_eq!(winner.fixed_point_count, 9);
//! ```

#![deny(missing_docs)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(clippy::all)]

// Ring positions, states and state sets
pub mod ring;

// The four validity rules
pub mod constraint;

// Particle labels for the valid states
pub mod catalogue;

// Candidate update rules, scoring and the uniqueness search
pub mod rule;

// Exact charges, anomalies and the Weinberg angle
pub mod charge;

// Clifford algebra identities
pub mod algebra;

// Lattice Hamiltonians and Brillouin-zone scans
pub mod lattice;

// Mass matrices and CKM mixing
pub mod mixing;

// CKM parameter fits
pub mod fit;

// Flip-coin quantum walk
pub mod walk;

pub use catalogue::{Catalogue, Particle};
pub use constraint::{evaluate, is_valid, Verdict};
pub use ring::{Bit, Sector, State, StateSet, StateSpace};
pub use rule::{
    find_unique_rule, CandidateError, Rule, RuleAnalysis, RuleCandidateSet, SearchOutcome,
};

/// Common imports.
pub mod prelude {
    pub use crate::catalogue::{Catalogue, Chirality, Colour, Generation, Kind, Particle};
    pub use crate::constraint::{evaluate, is_valid, valid_set, valid_states, Verdict};
    pub use crate::mixing::{build_mass_matrix, ckm_from_mass_matrices, MixingError, MixingSolution};
    pub use crate::ring::{Bit, Sector, State, StateSet};
    pub use crate::rule::{
        analyze, find_unique_rule, weak_doublets, Rule, RuleAnalysis, RuleCandidateSet,
        SearchOutcome,
    };
}
