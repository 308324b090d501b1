//! Effect registry - custom effect ids mapped to plain functions

use super::effect::TimelineRequest;
use super::EventContext;
use crate::combatant::Combatant;
use std::collections::HashMap;
use std::fmt;

/// Everything a custom effect may touch
pub struct EffectScope<'a> {
    /// The observer the effect runs for
    pub unit: &'a mut Combatant,
    pub context: &'a EventContext,
    pub requests: &'a mut Vec<TimelineRequest>,
}

pub type EffectFn = fn(&mut EffectScope<'_>);

/// Custom effect registry
#[derive(Clone, Default)]
pub struct EffectRegistry {
    effects: HashMap<String, EffectFn>,
}

impl fmt::Debug for EffectRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut ids: Vec<_> = self.effects.keys().collect();
        ids.sort();
        f.debug_struct("EffectRegistry").field("effects", &ids).finish()
    }
}

impl EffectRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        EffectRegistry {
            effects: HashMap::new(),
        }
    }

    /// Register an effect, replacing any previous one with the same id
    pub fn register(&mut self, id: &str, effect: EffectFn) {
        self.effects.insert(id.to_string(), effect);
    }

    pub fn get(&self, id: &str) -> Option<EffectFn> {
        self.effects.get(id).copied()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.effects.contains_key(id)
    }

    /// Registry with the built-in effects
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();

        // Heal 5% of max HP
        registry.register("regeneration", |scope| {
            let amount = (scope.unit.max_hp as f64 * 0.05).round() as i64;
            scope.unit.heal(amount);
        });

        // Advance own turn by 10%
        registry.register("momentum", |scope| {
            scope.requests.push(TimelineRequest {
                actor: scope.unit.id,
                percent: -0.1,
            });
        });

        // Strip every unlocked aura
        registry.register("cleanse", |scope| {
            let elements: Vec<_> = scope.unit.auras.iter().map(|a| a.element).collect();
            scope.unit.auras.remove_unlocked(&elements);
        });

        registry
    }
}
