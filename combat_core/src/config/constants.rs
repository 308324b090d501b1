//! Engine constants configuration

use serde::{Deserialize, Serialize};

/// Tunable engine constants
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EngineConstants {
    #[serde(default)]
    pub scheduler: SchedulerConstants,
    #[serde(default)]
    pub aura: AuraConstants,
    #[serde(default)]
    pub reactions: ReactionConstants,
    #[serde(default)]
    pub field: FieldConstants,
    #[serde(default)]
    pub combat: CombatConstants,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulerConstants {
    /// AV cycle length = base_turn_value / speed
    #[serde(default = "default_base_turn_value")]
    pub base_turn_value: f64,
    /// Extra AV added to buff timers so they resolve after their owner
    #[serde(default = "default_buff_timer_offset")]
    pub buff_timer_offset: f64,
    /// Cadence of buff timers and field object timers
    #[serde(default = "default_timer_speed")]
    pub timer_speed: f64,
}

impl Default for SchedulerConstants {
    fn default() -> Self {
        SchedulerConstants {
            base_turn_value: default_base_turn_value(),
            buff_timer_offset: default_buff_timer_offset(),
            timer_speed: default_timer_speed(),
        }
    }
}

fn default_base_turn_value() -> f64 {
    10_000.0
}
fn default_buff_timer_offset() -> f64 {
    50.0
}
fn default_timer_speed() -> f64 {
    100.0
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuraConstants {
    /// Turns an aura persists before decay begins
    #[serde(default = "default_aura_duration")]
    pub base_duration: u32,
    /// Units lost per tick once duration is exhausted
    #[serde(default = "default_decay_rate")]
    pub decay_rate: f64,
    /// Units carried by a freshly formed composite aura
    #[serde(default = "default_composite_units")]
    pub composite_units: f64,
}

impl Default for AuraConstants {
    fn default() -> Self {
        AuraConstants {
            base_duration: default_aura_duration(),
            decay_rate: default_decay_rate(),
            composite_units: default_composite_units(),
        }
    }
}

fn default_aura_duration() -> u32 {
    2
}
fn default_decay_rate() -> f64 {
    0.3
}
fn default_composite_units() -> f64 {
    1.0
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReactionConstants {
    /// Level base for transformative reactions
    #[serde(default = "default_transformative_base")]
    pub transformative_base: f64,
    /// Level base for Aggravate/Spread
    #[serde(default = "default_additive_base")]
    pub additive_base: f64,
    /// Physical RES removed by Superconduct
    #[serde(default = "default_superconduct_shred")]
    pub superconduct_res_shred: f64,
    /// Owner turns the Superconduct debuff lasts
    #[serde(default = "default_superconduct_turns")]
    pub superconduct_turns: u32,
    /// Units of the Frost-Twined Cryo aura left by Rimegrass
    #[serde(default = "default_frost_twined_units")]
    pub frost_twined_units: f64,
}

impl Default for ReactionConstants {
    fn default() -> Self {
        ReactionConstants {
            transformative_base: default_transformative_base(),
            additive_base: default_additive_base(),
            superconduct_res_shred: default_superconduct_shred(),
            superconduct_turns: default_superconduct_turns(),
            frost_twined_units: default_frost_twined_units(),
        }
    }
}

fn default_transformative_base() -> f64 {
    1446.0
}
fn default_additive_base() -> f64 {
    1447.0
}
fn default_superconduct_shred() -> f64 {
    0.4
}
fn default_superconduct_turns() -> u32 {
    2
}
fn default_frost_twined_units() -> f64 {
    5.0
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldConstants {
    /// Scheduler slices a Dendro Core survives
    #[serde(default = "default_core_lifetime")]
    pub dendro_core_lifetime: u32,
    /// Distance within which Electro/Pyro detonates a core
    #[serde(default = "default_detonation_proximity")]
    pub detonation_proximity: f64,
    /// Burgeon blast radius around the core
    #[serde(default = "default_burgeon_radius")]
    pub burgeon_radius: f64,
}

impl Default for FieldConstants {
    fn default() -> Self {
        FieldConstants {
            dendro_core_lifetime: default_core_lifetime(),
            detonation_proximity: default_detonation_proximity(),
            burgeon_radius: default_burgeon_radius(),
        }
    }
}

fn default_core_lifetime() -> u32 {
    3
}
fn default_detonation_proximity() -> f64 {
    1.5
}
fn default_burgeon_radius() -> f64 {
    2.0
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CombatConstants {
    #[serde(default = "default_level")]
    pub default_level: u32,
    /// Resistance assumed for elements a combatant does not list
    #[serde(default = "default_resistance")]
    pub default_resistance: f64,
    /// Grid columns used when placing a roster
    #[serde(default = "default_grid_columns")]
    pub grid_columns: usize,
}

impl Default for CombatConstants {
    fn default() -> Self {
        CombatConstants {
            default_level: default_level(),
            default_resistance: default_resistance(),
            grid_columns: default_grid_columns(),
        }
    }
}

fn default_level() -> u32 {
    90
}
fn default_resistance() -> f64 {
    0.1
}
fn default_grid_columns() -> usize {
    3
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_constants() {
        let constants = EngineConstants::default();
        assert!((constants.scheduler.base_turn_value - 10_000.0).abs() < f64::EPSILON);
        assert_eq!(constants.aura.base_duration, 2);
        assert!((constants.reactions.transformative_base - 1446.0).abs() < f64::EPSILON);
        assert!((constants.field.detonation_proximity - 1.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_parse_partial_constants() {
        let toml = r#"
[scheduler]
base_turn_value = 5000

[reactions]
superconduct_res_shred = 0.2
"#;

        let constants: EngineConstants = toml::from_str(toml).unwrap();
        assert!((constants.scheduler.base_turn_value - 5000.0).abs() < f64::EPSILON);
        assert!((constants.scheduler.buff_timer_offset - 50.0).abs() < f64::EPSILON);
        assert!((constants.reactions.superconduct_res_shred - 0.2).abs() < f64::EPSILON);
        assert_eq!(constants.field.dendro_core_lifetime, 3);
    }
}
