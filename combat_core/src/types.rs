//! Core types shared by every engine component

use serde::{Deserialize, Serialize};
use std::fmt;

/// Elemental affinity of a hit, aura or combatant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Element {
    Physical,
    Pyro,
    Hydro,
    Electro,
    Cryo,
    Geo,
    Anemo,
    Dendro,
    Quantum,
    Imaginary,
}

impl Element {
    /// Get all elements
    pub fn all() -> &'static [Element] {
        &[
            Element::Physical,
            Element::Pyro,
            Element::Hydro,
            Element::Electro,
            Element::Cryo,
            Element::Geo,
            Element::Anemo,
            Element::Dendro,
            Element::Quantum,
            Element::Imaginary,
        ]
    }

    /// Whether the element can stay on a target as an aura. Anemo, Geo,
    /// Quantum and Physical only ever trigger.
    pub fn is_persistent(self) -> bool {
        !matches!(
            self,
            Element::Anemo | Element::Geo | Element::Quantum | Element::Physical
        )
    }

    pub fn name(self) -> &'static str {
        match self {
            Element::Physical => "Physical",
            Element::Pyro => "Pyro",
            Element::Hydro => "Hydro",
            Element::Electro => "Electro",
            Element::Cryo => "Cryo",
            Element::Geo => "Geo",
            Element::Anemo => "Anemo",
            Element::Dendro => "Dendro",
            Element::Quantum => "Quantum",
            Element::Imaginary => "Imaginary",
        }
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Stats a damage instance can scale from or a buff can modify
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatType {
    Atk,
    Def,
    Hp,
    Em,
    Spd,
    CritRate,
    CritDmg,
    EnergyRecharge,
}

impl StatType {
    pub fn all() -> &'static [StatType] {
        &[
            StatType::Atk,
            StatType::Def,
            StatType::Hp,
            StatType::Em,
            StatType::Spd,
            StatType::CritRate,
            StatType::CritDmg,
            StatType::EnergyRecharge,
        ]
    }
}

/// Category of a damage instance, used for type bonuses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DamageCategory {
    NormalAttack,
    ChargedAttack,
    Skill,
    Burst,
    Reaction,
}

/// Tags carried by composite auras for generalized matching
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuraTag {
    Quicken,
    Frozen,
    Burning,
    ElectroCharged,
    Rimegrass,
}

/// Side of the battle a combatant fights for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Team {
    Players,
    Enemies,
}

impl Team {
    pub fn opponent(self) -> Team {
        match self {
            Team::Players => Team::Enemies,
            Team::Enemies => Team::Players,
        }
    }
}

/// Index of a combatant inside a battle roster
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CombatantId(pub usize);

impl fmt::Display for CombatantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Identifier of an energy pool (e.g. "elemental", "fanfare")
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EnergyKind(pub String);

impl EnergyKind {
    pub fn elemental() -> Self {
        EnergyKind("elemental".to_string())
    }
}

impl Default for EnergyKind {
    fn default() -> Self {
        EnergyKind::elemental()
    }
}

impl From<&str> for EnergyKind {
    fn from(s: &str) -> Self {
        EnergyKind(s.to_string())
    }
}

impl From<String> for EnergyKind {
    fn from(s: String) -> Self {
        EnergyKind(s)
    }
}

/// Integer grid position on the battlefield
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Position { x, y }
    }

    /// Euclidean distance between two grid cells
    pub fn distance(&self, other: &Position) -> f64 {
        let dx = (self.x - other.x) as f64;
        let dy = (self.y - other.y) as f64;
        (dx * dx + dy * dy).sqrt()
    }
}

/// Lay units out row by row, `columns` per row
pub fn grid_positions(count: usize, columns: usize, spacing: i32, start: Position) -> Vec<Position> {
    let columns = columns.max(1);
    (0..count)
        .map(|i| {
            Position::new(
                start.x + (i % columns) as i32 * spacing,
                start.y + (i / columns) as i32 * spacing,
            )
        })
        .collect()
}
