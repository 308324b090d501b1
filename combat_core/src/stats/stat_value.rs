//! StatValue - base value plus buff-driven modifiers (Base → Flat → Percent-of-base)

use serde::{Deserialize, Serialize};

/// A combat stat with its unbuffed base and the deltas layered on top
///
/// Final value is calculated as:
/// `base × (1 + percent) + flat`
///
/// - `base`: value from the roster definition, never touched by buffs
/// - `percent`: sum of buff deltas expressed as a fraction of base (0.20 = +20%)
/// - `flat`: sum of flat deltas
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatValue {
    pub base: f64,
    pub percent: f64,
    pub flat: f64,
}

impl StatValue {
    pub fn with_base(base: f64) -> Self {
        StatValue {
            base,
            percent: 0.0,
            flat: 0.0,
        }
    }

    /// Current value after every delta
    pub fn compute(&self) -> f64 {
        self.base * (1.0 + self.percent) + self.flat
    }

    /// Add a delta expressed as a fraction of base (negative to remove)
    pub fn add_percent(&mut self, value: f64) {
        self.percent += value;
    }

    pub fn add_flat(&mut self, value: f64) {
        self.flat += value;
    }

    /// Drop every delta
    pub fn reset_to_base(&mut self) {
        self.percent = 0.0;
        self.flat = 0.0;
    }

    /// Amount the deltas currently contribute on top of base
    pub fn bonus(&self) -> f64 {
        self.compute() - self.base
    }
}
