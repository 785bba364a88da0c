//! Particle catalogue: the read-only labelling of the 45 valid states.
//!
//! The catalogue is built once from [`crate::constraint::valid_states`] and
//! never mutated. Consumers borrow it; [`Catalogue::global`] hands out a
//! lazily built process-wide instance.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::OnceLock;

use num_rational::Rational64;
use serde::{Deserialize, Serialize};

use crate::constraint::valid_states;
use crate::ring::{Bit, State};

/// Fermion generation, decoded from `(G0, G1)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Generation {
    /// `(0, 0)`.
    First,
    /// `(0, 1)`.
    Second,
    /// `(1, 0)`.
    Third,
}

impl Generation {
    /// All generations, lightest first.
    pub const ALL: [Self; 3] = [Self::First, Self::Second, Self::Third];

    /// Decodes the generation bits. `(1, 1)` is excluded by R1.
    #[must_use]
    pub const fn from_bits(g0: u8, g1: u8) -> Option<Self> {
        match (g0, g1) {
            (0, 0) => Some(Self::First),
            (0, 1) => Some(Self::Second),
            (1, 0) => Some(Self::Third),
            _ => None,
        }
    }

    /// 1, 2 or 3.
    #[must_use]
    pub const fn number(self) -> u8 {
        match self {
            Self::First => 1,
            Self::Second => 2,
            Self::Third => 3,
        }
    }

    /// Zero-based index into per-generation tables.
    #[must_use]
    pub const fn index(self) -> usize {
        self.number() as usize - 1
    }
}

/// Colour charge, decoded from `(C0, C1)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Colour {
    /// `(0, 0)`, leptons only.
    Colourless,
    /// `(1, 0)`.
    Red,
    /// `(0, 1)`.
    Green,
    /// `(1, 1)`.
    Blue,
}

impl Colour {
    /// Decodes the colour bits.
    #[must_use]
    pub const fn from_bits(c0: u8, c1: u8) -> Self {
        match (c0, c1) {
            (1, 0) => Self::Red,
            (0, 1) => Self::Green,
            (1, 1) => Self::Blue,
            _ => Self::Colourless,
        }
    }

    /// One-letter label used in particle names.
    #[must_use]
    pub const fn short(self) -> &'static str {
        match self {
            Self::Colourless => "",
            Self::Red => "r",
            Self::Green => "g",
            Self::Blue => "b",
        }
    }

    /// Full label.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Colourless => "colourless",
            Self::Red => "red",
            Self::Green => "green",
            Self::Blue => "blue",
        }
    }
}

/// Handedness, decoded from χ.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Chirality {
    /// χ = 0.
    Left,
    /// χ = 1.
    Right,
}

impl Chirality {
    /// `L` or `R`.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Left => "L",
            Self::Right => "R",
        }
    }
}

impl fmt::Display for Chirality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Lepton or quark, decoded from the bridge bit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Kind {
    /// LQ = 0.
    Lepton,
    /// LQ = 1.
    Quark,
}

/// The twelve fermion flavours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[allow(missing_docs)]
pub enum Flavour {
    ElectronNeutrino,
    Electron,
    MuonNeutrino,
    Muon,
    TauNeutrino,
    Tau,
    Up,
    Down,
    Charm,
    Strange,
    Top,
    Bottom,
}

impl Flavour {
    /// Flavour of a (kind, generation, isospin) triple.
    #[must_use]
    pub const fn of(kind: Kind, generation: Generation, isospin: bool) -> Self {
        match (kind, generation, isospin) {
            (Kind::Lepton, Generation::First, false) => Self::ElectronNeutrino,
            (Kind::Lepton, Generation::First, true) => Self::Electron,
            (Kind::Lepton, Generation::Second, false) => Self::MuonNeutrino,
            (Kind::Lepton, Generation::Second, true) => Self::Muon,
            (Kind::Lepton, Generation::Third, false) => Self::TauNeutrino,
            (Kind::Lepton, Generation::Third, true) => Self::Tau,
            (Kind::Quark, Generation::First, false) => Self::Up,
            (Kind::Quark, Generation::First, true) => Self::Down,
            (Kind::Quark, Generation::Second, false) => Self::Charm,
            (Kind::Quark, Generation::Second, true) => Self::Strange,
            (Kind::Quark, Generation::Third, false) => Self::Top,
            (Kind::Quark, Generation::Third, true) => Self::Bottom,
        }
    }

    /// Display symbol.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::ElectronNeutrino => "νe",
            Self::Electron => "e⁻",
            Self::MuonNeutrino => "νμ",
            Self::Muon => "μ⁻",
            Self::TauNeutrino => "ντ",
            Self::Tau => "τ⁻",
            Self::Up => "u",
            Self::Down => "d",
            Self::Charm => "c",
            Self::Strange => "s",
            Self::Top => "t",
            Self::Bottom => "b",
        }
    }

    /// Reference mass in MeV.
    #[must_use]
    pub const fn mass_mev(self) -> f64 {
        match self {
            Self::ElectronNeutrino | Self::MuonNeutrino | Self::TauNeutrino => 0.0,
            Self::Electron => 0.511,
            Self::Muon => 105.66,
            Self::Tau => 1776.9,
            Self::Up => 2.2,
            Self::Down => 4.7,
            Self::Charm => 1270.0,
            Self::Strange => 95.0,
            Self::Top => 173_100.0,
            Self::Bottom => 4180.0,
        }
    }
}

/// Electric charge `Q = (2/3)·LQ − I3`.
#[must_use]
pub fn electric_charge(state: State) -> Rational64 {
    Rational64::new(2 * i64::from(state.bit_u8(Bit::Lq)), 3)
        - Rational64::from_integer(i64::from(state.bit_u8(Bit::I3)))
}

/// A labelled valid state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Particle {
    /// The underlying ring state.
    pub state: State,
    /// Display name, e.g. `e⁻_R` or `u_r_L`.
    pub name: String,
    /// Lepton or quark.
    pub kind: Kind,
    /// Flavour.
    pub flavour: Flavour,
    /// Generation.
    pub generation: Generation,
    /// Colour charge.
    pub colour: Colour,
    /// Handedness.
    pub chirality: Chirality,
    /// Electric charge.
    pub charge: Rational64,
}

impl Particle {
    /// Labels a state. Returns `None` for invalid generation bits.
    #[must_use]
    pub fn label(state: State) -> Option<Self> {
        let (g0, g1) = state.generation_bits();
        let generation = Generation::from_bits(g0, g1)?;
        let (c0, c1) = state.colour_bits();
        let colour = Colour::from_bits(c0, c1);
        let kind = if state.bit(Bit::Lq) {
            Kind::Quark
        } else {
            Kind::Lepton
        };
        let chirality = if state.bit(Bit::Chi) {
            Chirality::Right
        } else {
            Chirality::Left
        };
        let flavour = Flavour::of(kind, generation, state.bit(Bit::I3));
        let name = match kind {
            Kind::Lepton => format!("{}_{}", flavour.symbol(), chirality),
            Kind::Quark => format!("{}_{}_{}", flavour.symbol(), colour.short(), chirality),
        };
        Some(Self {
            state,
            name,
            kind,
            flavour,
            generation,
            colour,
            chirality,
            charge: electric_charge(state),
        })
    }

    /// Reference mass in MeV.
    #[must_use]
    pub fn mass_mev(&self) -> f64 {
        self.flavour.mass_mev()
    }
}

/// Immutable map from valid states to particles.
#[derive(Debug, Clone)]
pub struct Catalogue {
    entries: BTreeMap<State, Particle>,
}

impl Catalogue {
    /// Labels every valid state.
    #[must_use]
    pub fn build() -> Self {
        let entries = valid_states()
            .filter_map(|s| Particle::label(s).map(|p| (s, p)))
            .collect();
        Self { entries }
    }

    /// The shared catalogue, built on first use.
    pub fn global() -> &'static Self {
        static CATALOGUE: OnceLock<Catalogue> = OnceLock::new();
        CATALOGUE.get_or_init(Self::build)
    }

    /// Number of labelled states.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if nothing is labelled.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The particle at a state, if the state is valid.
    #[must_use]
    pub fn get(&self, state: State) -> Option<&Particle> {
        self.entries.get(&state)
    }

    /// Particle name, or the bracketed bit string for unlabelled states.
    #[must_use]
    pub fn name(&self, state: State) -> String {
        match self.entries.get(&state) {
            Some(p) => p.name.clone(),
            None => format!("[{state}]"),
        }
    }

    /// Particles in state order.
    pub fn iter(&self) -> impl Iterator<Item = &Particle> {
        self.entries.values()
    }

    /// Particles of one kind in state order.
    pub fn of_kind(&self, kind: Kind) -> impl Iterator<Item = &Particle> {
        self.iter().filter(move |p| p.kind == kind)
    }

    /// Reference masses of one kind/isospin row across generations.
    ///
    /// `isospin = false` gives neutrinos or up-type quarks.
    #[must_use]
    pub fn generation_masses(kind: Kind, isospin: bool) -> [f64; 3] {
        Generation::ALL.map(|g| Flavour::of(kind, g, isospin).mass_mev())
    }
}

/// Koide ratio `Σm / (Σ√m)²` of a mass triple.
///
/// Equals 2/3 to within a few parts in 10⁵ for the charged leptons.
#[must_use]
pub fn koide_ratio(masses: [f64; 3]) -> f64 {
    let sum: f64 = masses.iter().sum();
    let root_sum: f64 = masses.iter().map(|m| m.sqrt()).sum();
    sum / (root_sum * root_sum)
}
