//! Talent use outcomes

use crate::damage::DamageResult;
use crate::reaction::ReactionKind;
use serde::{Deserialize, Serialize};

/// Whether a talent went off
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionOutcome {
    Used,
    InsufficientEnergy,
    OnCooldown,
    /// The talent needs a form its user is not in
    FormLocked,
}

#[derive(Debug, Clone)]
pub struct TalentOutcome {
    pub talent: String,
    pub action: ActionOutcome,
    pub results: Vec<DamageResult>,
    pub reactions: Vec<ReactionKind>,
}

impl TalentOutcome {
    /// Outcome of a talent that could not be used
    pub fn refused(talent: &str, action: ActionOutcome) -> Self {
        TalentOutcome {
            talent: talent.to_string(),
            action,
            results: Vec::new(),
            reactions: Vec::new(),
        }
    }

    pub fn used(&self) -> bool {
        self.action == ActionOutcome::Used
    }

    /// Direct damage of every instance, reaction hits included
    pub fn total_damage(&self) -> i64 {
        self.results.iter().map(DamageResult::total_damage).sum()
    }
}
