//! Resistance - elemental damage mitigation
//!
//! Piecewise curve:
//! - `res < 0`: `1 - res / 2` (negative resistance is half as effective)
//! - `0 <= res < 0.75`: `1 - res`
//! - `res >= 0.75`: `1 / (4 × res + 1)`

use super::constants::HIGH_RESISTANCE_THRESHOLD;

/// Damage multiplier for a resistance value expressed as a fraction
pub fn resistance_multiplier(resistance: f64) -> f64 {
    if resistance < 0.0 {
        1.0 - resistance / 2.0
    } else if resistance < HIGH_RESISTANCE_THRESHOLD {
        1.0 - resistance
    } else {
        1.0 / (4.0 * resistance + 1.0)
    }
}

/// Percentage of damage removed by a resistance value (negative = amplified)
pub fn resistance_reduction_percent(resistance: f64) -> f64 {
    (1.0 - resistance_multiplier(resistance)) * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_resistance() {
        assert!((resistance_multiplier(0.1) - 0.9).abs() < 1e-12);
    }

    #[test]
    fn test_negative_resistance() {
        // -40% resistance = +20% damage
        assert!((resistance_multiplier(-0.4) - 1.2).abs() < 1e-12);
    }

    #[test]
    fn test_high_resistance_diminishes() {
        // 1 / (4 * 0.75 + 1)
        assert!((resistance_multiplier(0.75) - 0.25).abs() < 1e-12);
        assert!((resistance_multiplier(1.0) - 0.2).abs() < 1e-12);
        assert!(resistance_multiplier(2.0) > 0.0);
    }

    #[test]
    fn test_reduction_percent() {
        assert!((resistance_reduction_percent(0.5) - 50.0).abs() < 1e-9);
        assert!((resistance_reduction_percent(-0.2) + 10.0).abs() < 1e-9);
    }
}
