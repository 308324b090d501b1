//! combat_core - Turn-based elemental combat engine
//!
//! This library provides:
//! - Scheduler: action-value timeline for combatants, buff timers and field objects
//! - Auras and reactions: elemental state on targets and what happens when elements meet
//! - Damage pipeline: bonuses, crit, defense, resistance, reactions and internal cooldown
//! - Events: buffs and passives reacting to battle events
//! - Battle: rosters, talents, summons and the turn loop

pub mod aura;
pub mod battle;
pub mod combatant;
pub mod config;
pub mod damage;
pub mod defense;
pub mod events;
pub mod field;
pub mod icd;
pub mod prelude;
pub mod reaction;
pub mod scheduler;
pub mod stats;
pub mod types;

// Re-export core types for convenience
pub use aura::{Aura, AuraChange, AuraSet};
pub use battle::{Battle, BattleError, BattleOutcome, BattleSummary, TalentOutcome};
pub use combatant::{Combatant, Talent};
pub use config::{default_roster, ConfigError, EngineConstants, RosterConfig};
pub use damage::{compute_damage, DamageInstance, DamageResult};
pub use events::{Buff, EffectPayload, EffectRegistry, EventName, Passive};
pub use field::{Field, FieldObject, FieldObjectId};
pub use icd::IcdTracker;
pub use reaction::{apply_element, ReactionKind, ReactionOutcome};
pub use scheduler::{Actor, Scheduler, SchedulerError};
pub use types::{CombatantId, DamageCategory, Element, Position, StatType, Team};
