//! Reaction kinds and their fixed properties

use crate::types::Element;
use serde::{Deserialize, Serialize};
use std::fmt;

/// How a reaction contributes damage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReactionClass {
    /// Standalone EM-scaled hit
    Transformative,
    /// Multiplies the triggering hit
    Amplifying,
    /// Flat bonus added to the triggering hit
    Additive,
    /// State change only
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReactionKind {
    ForwardVaporize,
    ReverseVaporize,
    ForwardMelt,
    ReverseMelt,
    Overload,
    Freeze,
    Superconduct,
    ElectroCharged,
    Burning,
    Bloom,
    Hyperbloom,
    Burgeon,
    Rimegrass,
    Quicken,
    Aggravate,
    Spread,
    PyroSwirl,
    HydroSwirl,
    ElectroSwirl,
    CryoSwirl,
    Stasis,
    Ignition,
    Impulse,
    Anchor,
    Superposition,
}

impl ReactionKind {
    pub fn all() -> &'static [ReactionKind] {
        use ReactionKind::*;
        &[
            ForwardVaporize, ReverseVaporize, ForwardMelt, ReverseMelt, Overload, Freeze,
            Superconduct, ElectroCharged, Burning, Bloom, Hyperbloom, Burgeon, Rimegrass,
            Quicken, Aggravate, Spread, PyroSwirl, HydroSwirl, ElectroSwirl, CryoSwirl, Stasis,
            Ignition, Impulse, Anchor, Superposition,
        ]
    }

    pub fn name(self) -> &'static str {
        match self {
            ReactionKind::ForwardVaporize => "Forward Vaporize",
            ReactionKind::ReverseVaporize => "Reverse Vaporize",
            ReactionKind::ForwardMelt => "Forward Melt",
            ReactionKind::ReverseMelt => "Reverse Melt",
            ReactionKind::Overload => "Overload",
            ReactionKind::Freeze => "Freeze",
            ReactionKind::Superconduct => "Superconduct",
            ReactionKind::ElectroCharged => "Electro-Charged",
            ReactionKind::Burning => "Burning",
            ReactionKind::Bloom => "Bloom",
            ReactionKind::Hyperbloom => "Hyperbloom",
            ReactionKind::Burgeon => "Burgeon",
            ReactionKind::Rimegrass => "Rimegrass",
            ReactionKind::Quicken => "Quicken",
            ReactionKind::Aggravate => "Aggravate",
            ReactionKind::Spread => "Spread",
            ReactionKind::PyroSwirl => "Pyro Swirl",
            ReactionKind::HydroSwirl => "Hydro Swirl",
            ReactionKind::ElectroSwirl => "Electro Swirl",
            ReactionKind::CryoSwirl => "Cryo Swirl",
            ReactionKind::Stasis => "Stasis",
            ReactionKind::Ignition => "Ignition",
            ReactionKind::Impulse => "Impulse",
            ReactionKind::Anchor => "Anchor",
            ReactionKind::Superposition => "Superposition",
        }
    }

    /// Primary class. Superposition is transformative and also amplifies
    /// (see [`ReactionKind::amplifier`]).
    pub fn class(self) -> ReactionClass {
        use ReactionKind::*;
        match self {
            ForwardVaporize | ReverseVaporize | ForwardMelt | ReverseMelt => {
                ReactionClass::Amplifying
            }
            Aggravate | Spread => ReactionClass::Additive,
            Freeze | Rimegrass | Quicken => ReactionClass::None,
            _ => ReactionClass::Transformative,
        }
    }

    pub fn is_transformative(self) -> bool {
        self.class() == ReactionClass::Transformative
    }

    /// (multiplier, em_factor) for reactions that scale the triggering hit
    pub fn amplifier(self) -> Option<(f64, f64)> {
        match self {
            ReactionKind::ForwardVaporize | ReactionKind::ForwardMelt => Some((2.0, 2.78)),
            ReactionKind::ReverseVaporize | ReactionKind::ReverseMelt => Some((1.5, 2.78)),
            ReactionKind::Superposition => Some((2.25, 1.28)),
            _ => None,
        }
    }

    /// Coefficient applied to the additive base
    pub fn additive_coefficient(self) -> Option<f64> {
        match self {
            ReactionKind::Aggravate => Some(1.15),
            ReactionKind::Spread => Some(1.25),
            _ => None,
        }
    }

    pub fn transformative_multiplier(self) -> f64 {
        use ReactionKind::*;
        match self {
            Hyperbloom | Burgeon | Superposition => 3.0,
            Overload => 2.75,
            ElectroCharged => 2.0,
            Superconduct => 1.5,
            PyroSwirl | CryoSwirl | ElectroSwirl | Burning => 0.6,
            HydroSwirl => 0.2,
            Stasis | Ignition | Impulse | Anchor => 2.25,
            _ => 1.0,
        }
    }

    /// Units removed from the reacted aura; `None` for non-consuming reactions
    pub fn consumption(self) -> Option<f64> {
        use ReactionKind::*;
        match self {
            Quicken | Aggravate | Spread | Freeze | ElectroCharged | Burning => None,
            ForwardVaporize | ForwardMelt | Superposition => Some(2.0),
            ReverseVaporize | ReverseMelt => Some(0.5),
            PyroSwirl | HydroSwirl | ElectroSwirl | CryoSwirl | Bloom => Some(0.5),
            _ => Some(1.0),
        }
    }

    /// Element and AoE radius of the standalone hit
    ///
    /// `reacted` is the face-up element of the aura the reaction consumed,
    /// which only matters for Superposition.
    pub fn hit_profile(self, reacted: Element) -> (Element, f64) {
        use ReactionKind::*;
        match self {
            Bloom | Hyperbloom | Burgeon => (Element::Dendro, 2.0),
            Overload | Burning => (Element::Pyro, 2.0),
            ElectroCharged => (Element::Electro, 0.0),
            Superconduct => (Element::Cryo, 1.5),
            PyroSwirl => (Element::Pyro, 3.0),
            HydroSwirl => (Element::Hydro, 3.0),
            ElectroSwirl => (Element::Electro, 3.0),
            CryoSwirl => (Element::Cryo, 3.0),
            Stasis | Ignition | Impulse | Anchor => (Element::Imaginary, 0.0),
            Superposition => (reacted, 2.0),
            _ => (Element::Physical, 0.0),
        }
    }

    /// Fraction of the target's AV cycle its next turn moves by
    /// (positive delays)
    pub fn timeline_shift(self) -> Option<f64> {
        match self {
            ReactionKind::Stasis => Some(0.25),
            ReactionKind::Ignition => Some(-0.6),
            ReactionKind::Impulse => Some(-0.25),
            ReactionKind::Anchor => Some(0.6),
            _ => None,
        }
    }
}

impl fmt::Display for ReactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
