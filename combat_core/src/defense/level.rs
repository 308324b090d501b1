//! Level defense - mitigation from the attacker/defender level gap
//!
//! Formula:
//! `(atk_lvl + 100) / ((atk_lvl + 100) + (def_lvl + 100) × (1 - shred))`
//!
//! Equal levels without shred mitigate exactly half of the damage.

use super::constants::LEVEL_OFFSET;

/// Multiplier applied to damage for the defender's level defense
///
/// # Arguments
/// * `attacker_level` - Level of the combatant dealing damage
/// * `defender_level` - Level of the combatant receiving damage
/// * `shred` - Fraction of defense ignored (clamped to 0..=1)
pub fn defense_multiplier(attacker_level: u32, defender_level: u32, shred: f64) -> f64 {
    let attacker = attacker_level as f64 + LEVEL_OFFSET;
    let defender = (defender_level as f64 + LEVEL_OFFSET) * (1.0 - shred.clamp(0.0, 1.0));
    attacker / (attacker + defender)
}
