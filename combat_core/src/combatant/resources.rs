//! Energy pools and talent cooldowns

use crate::types::EnergyKind;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Energy per kind ("elemental", or any custom resource)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EnergyPools {
    pools: HashMap<EnergyKind, f64>,
}

impl EnergyPools {
    pub fn new() -> Self {
        EnergyPools {
            pools: HashMap::new(),
        }
    }

    pub fn get(&self, kind: &EnergyKind) -> f64 {
        self.pools.get(kind).copied().unwrap_or(0.0)
    }

    pub fn gain(&mut self, kind: &EnergyKind, amount: f64) {
        let pool = self.pools.entry(kind.clone()).or_insert(0.0);
        *pool = (*pool + amount).max(0.0);
    }

    pub fn can_afford(&self, kind: &EnergyKind, cost: f64) -> bool {
        cost <= 0.0 || self.get(kind) >= cost
    }

    /// Spend `cost`; returns false and leaves the pool untouched when short
    pub fn spend(&mut self, kind: &EnergyKind, cost: f64) -> bool {
        if cost <= 0.0 {
            return true;
        }
        if !self.can_afford(kind, cost) {
            return false;
        }
        self.gain(kind, -cost);
        true
    }
}

/// Remaining owner turns per talent id
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Cooldowns {
    remaining: HashMap<String, u32>,
}

impl Cooldowns {
    pub fn new() -> Self {
        Cooldowns {
            remaining: HashMap::new(),
        }
    }

    pub fn start(&mut self, talent: &str, turns: u32) {
        if turns > 0 {
            self.remaining.insert(talent.to_string(), turns);
        }
    }

    pub fn remaining(&self, talent: &str) -> u32 {
        self.remaining.get(talent).copied().unwrap_or(0)
    }

    pub fn is_ready(&self, talent: &str) -> bool {
        self.remaining(talent) == 0
    }

    /// One owner turn passed
    pub fn tick(&mut self) {
        for turns in self.remaining.values_mut() {
            *turns = turns.saturating_sub(1);
        }
        self.remaining.retain(|_, turns| *turns > 0);
    }
}
