//! Damage results - what one hit did to one target

use crate::reaction::{ReactionKind, ReactionOutcome};
use crate::types::{CombatantId, Element};
use serde::{Deserialize, Serialize};

/// Standalone reaction damage waiting to be dealt
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReactionHit {
    pub source: CombatantId,
    pub target: CombatantId,
    pub reaction: ReactionKind,
    pub damage: i64,
    pub element: Element,
    /// Splash radius around `target`
    pub aoe_radius: f64,
    pub crit: bool,
}

/// Outcome of one damage instance against one target
#[derive(Debug, Clone)]
pub struct DamageResult {
    pub target: CombatantId,
    pub damage: i64,
    pub crit: bool,
    pub element: Option<Element>,
    /// Whether the element reached the reaction resolver
    pub applied_element: bool,
    pub label: String,
    pub outcome: Option<ReactionOutcome>,
    pub reaction_hits: Vec<ReactionHit>,
}

impl DamageResult {
    pub fn reaction(&self) -> Option<ReactionKind> {
        self.outcome.as_ref().and_then(|o| o.reaction)
    }

    /// Damage of this hit plus every reaction hit it produced on its target
    pub fn total_damage(&self) -> i64 {
        self.damage
            + self
                .reaction_hits
                .iter()
                .filter(|h| h.target == self.target)
                .map(|h| h.damage)
                .sum::<i64>()
    }
}
