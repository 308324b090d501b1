//! Combat stats - base values, derived values, damage bonuses and resistances

mod stat_value;

pub use stat_value::StatValue;

use crate::types::{DamageCategory, Element, StatType};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Unbuffed stats as written in a roster definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BaseStats {
    #[serde(default)]
    pub atk: f64,
    #[serde(default)]
    pub def: f64,
    #[serde(default = "default_hp")]
    pub hp: f64,
    #[serde(default)]
    pub em: f64,
    #[serde(default = "default_spd")]
    pub spd: f64,
    #[serde(default)]
    pub crit_rate: f64,
    #[serde(default)]
    pub crit_dmg: f64,
    #[serde(default)]
    pub energy_recharge: f64,
}

fn default_hp() -> f64 {
    15_000.0
}

fn default_spd() -> f64 {
    100.0
}

impl Default for BaseStats {
    fn default() -> Self {
        BaseStats {
            atk: 0.0,
            def: 0.0,
            hp: default_hp(),
            em: 0.0,
            spd: default_spd(),
            crit_rate: 0.0,
            crit_dmg: 0.0,
            energy_recharge: 0.0,
        }
    }
}

impl BaseStats {
    pub fn get(&self, stat: StatType) -> f64 {
        match stat {
            StatType::Atk => self.atk,
            StatType::Def => self.def,
            StatType::Hp => self.hp,
            StatType::Em => self.em,
            StatType::Spd => self.spd,
            StatType::CritRate => self.crit_rate,
            StatType::CritDmg => self.crit_dmg,
            StatType::EnergyRecharge => self.energy_recharge,
        }
    }
}

/// Live stats of a combatant; buffs mutate these, never the base
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CombatStats {
    pub atk: StatValue,
    pub def: StatValue,
    pub hp: StatValue,
    pub em: StatValue,
    pub spd: StatValue,
    pub crit_rate: StatValue,
    pub crit_dmg: StatValue,
    pub energy_recharge: StatValue,
}

impl CombatStats {
    pub fn from_base(base: &BaseStats) -> Self {
        CombatStats {
            atk: StatValue::with_base(base.atk),
            def: StatValue::with_base(base.def),
            hp: StatValue::with_base(base.hp),
            em: StatValue::with_base(base.em),
            spd: StatValue::with_base(base.spd),
            crit_rate: StatValue::with_base(base.crit_rate),
            crit_dmg: StatValue::with_base(base.crit_dmg),
            energy_recharge: StatValue::with_base(base.energy_recharge),
        }
    }

    pub fn value(&self, stat: StatType) -> &StatValue {
        match stat {
            StatType::Atk => &self.atk,
            StatType::Def => &self.def,
            StatType::Hp => &self.hp,
            StatType::Em => &self.em,
            StatType::Spd => &self.spd,
            StatType::CritRate => &self.crit_rate,
            StatType::CritDmg => &self.crit_dmg,
            StatType::EnergyRecharge => &self.energy_recharge,
        }
    }

    pub fn value_mut(&mut self, stat: StatType) -> &mut StatValue {
        match stat {
            StatType::Atk => &mut self.atk,
            StatType::Def => &mut self.def,
            StatType::Hp => &mut self.hp,
            StatType::Em => &mut self.em,
            StatType::Spd => &mut self.spd,
            StatType::CritRate => &mut self.crit_rate,
            StatType::CritDmg => &mut self.crit_dmg,
            StatType::EnergyRecharge => &mut self.energy_recharge,
        }
    }

    /// Current value of a stat
    pub fn get(&self, stat: StatType) -> f64 {
        self.value(stat).compute()
    }

    /// Speed used for AV cadence, floored at 1
    pub fn speed(&self) -> f64 {
        self.get(StatType::Spd).max(1.0)
    }

    /// Elemental mastery, never negative
    pub fn em(&self) -> f64 {
        self.get(StatType::Em).max(0.0)
    }
}

/// Outgoing damage bonuses and incoming reduction
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DamageBonuses {
    #[serde(default)]
    pub general: f64,
    #[serde(default)]
    pub elemental: HashMap<Element, f64>,
    #[serde(default)]
    pub category: HashMap<DamageCategory, f64>,
    /// Fraction of incoming damage removed before crit
    #[serde(default)]
    pub reduction_taken: f64,
}

impl DamageBonuses {
    /// Sum of bonuses applying to a hit: general + element + category
    pub fn total_for(&self, element: Option<Element>, category: DamageCategory) -> f64 {
        let elemental = element
            .and_then(|e| self.elemental.get(&e))
            .copied()
            .unwrap_or(0.0);
        let typed = self.category.get(&category).copied().unwrap_or(0.0);
        self.general + elemental + typed
    }
}

/// Per-element resistances with a fallback for unlisted elements
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Resistances {
    values: HashMap<Element, f64>,
    default: f64,
}

impl Resistances {
    pub fn new(default: f64) -> Self {
        Resistances {
            values: HashMap::new(),
            default,
        }
    }

    pub fn with_values(default: f64, values: HashMap<Element, f64>) -> Self {
        Resistances { values, default }
    }

    pub fn get(&self, element: Element) -> f64 {
        self.values.get(&element).copied().unwrap_or(self.default)
    }

    pub fn set(&mut self, element: Element, value: f64) {
        self.values.insert(element, value);
    }

    /// Shift a resistance by `delta` (negative shreds)
    pub fn adjust(&mut self, element: Element, delta: f64) {
        let current = self.get(element);
        self.values.insert(element, current + delta);
    }
}

impl Default for Resistances {
    fn default() -> Self {
        Resistances::new(0.1)
    }
}
