//! Prelude module for convenient imports
//!
//! ```rust
//! use combat_core::prelude::*;
//! ```

// Core types
pub use crate::types::{CombatantId, DamageCategory, Element, EnergyKind, Position, StatType, Team};
pub use crate::stats::{BaseStats, CombatStats, DamageBonuses, Resistances};

// Combatants
pub use crate::combatant::{Combatant, SummonSpec, Talent, TalentEffect, TalentTarget};

// Damage and reactions
pub use crate::damage::{DamageInstance, DamageResult};
pub use crate::reaction::{ReactionClass, ReactionKind};

// Events
pub use crate::events::{Buff, EffectPayload, EffectRegistry, EventName, Passive};

// Battle
pub use crate::battle::{ActionOutcome, Battle, BattleOutcome, BattleSummary};
pub use crate::scheduler::Actor;

// Config
pub use crate::config::{default_roster, EngineConstants, RosterConfig};
