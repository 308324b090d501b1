//! Battle summary - per-combatant totals and reaction counts

use crate::combatant::Combatant;
use crate::reaction::ReactionKind;
use crate::types::{CombatantId, Team};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// How a battle ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BattleOutcome {
    PlayersWin,
    EnemiesWin,
    /// The step cap was reached with both sides standing
    StepLimit,
}

impl fmt::Display for BattleOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BattleOutcome::PlayersWin => f.write_str("players win"),
            BattleOutcome::EnemiesWin => f.write_str("enemies win"),
            BattleOutcome::StepLimit => f.write_str("step limit reached"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CombatantSummary {
    pub id: CombatantId,
    pub name: String,
    pub team: Team,
    pub summon: bool,
    pub damage_dealt: i64,
    pub damage_taken: i64,
    pub healing_done: i64,
    pub talents_used: u32,
    pub turns_taken: u32,
    pub alive: bool,
    pub final_hp: i64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BattleSummary {
    pub outcome: Option<BattleOutcome>,
    pub steps: u64,
    pub clock: f64,
    pub combatants: Vec<CombatantSummary>,
    /// Reaction name -> times triggered
    pub reactions: BTreeMap<String, u32>,
}

impl BattleSummary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, unit: &Combatant) {
        self.combatants.push(CombatantSummary {
            id: unit.id,
            name: unit.name.clone(),
            team: unit.team,
            summon: unit.is_summon(),
            damage_dealt: 0,
            damage_taken: 0,
            healing_done: 0,
            talents_used: 0,
            turns_taken: 0,
            alive: unit.is_alive(),
            final_hp: unit.current_hp,
        });
    }

    fn entry(&mut self, id: CombatantId) -> Option<&mut CombatantSummary> {
        self.combatants.iter_mut().find(|c| c.id == id)
    }

    pub fn record_damage(&mut self, source: Option<CombatantId>, target: CombatantId, amount: i64) {
        if let Some(source) = source {
            if let Some(entry) = self.entry(source) {
                entry.damage_dealt += amount;
            }
        }
        if let Some(entry) = self.entry(target) {
            entry.damage_taken += amount;
        }
    }

    pub fn record_healing(&mut self, source: Option<CombatantId>, amount: i64) {
        if let Some(entry) = source.and_then(|s| self.entry(s)) {
            entry.healing_done += amount;
        }
    }

    pub fn record_talent(&mut self, id: CombatantId) {
        if let Some(entry) = self.entry(id) {
            entry.talents_used += 1;
        }
    }

    pub fn record_turn(&mut self, id: CombatantId) {
        if let Some(entry) = self.entry(id) {
            entry.turns_taken += 1;
        }
    }

    pub fn record_reaction(&mut self, reaction: ReactionKind) {
        *self.reactions.entry(reaction.name().to_string()).or_insert(0) += 1;
    }

    /// Refresh the per-combatant end state
    pub fn snapshot(&mut self, units: &[Combatant]) {
        for unit in units {
            if let Some(entry) = self.entry(unit.id) {
                entry.alive = unit.is_alive();
                entry.final_hp = unit.current_hp;
            }
        }
    }

    pub fn total_damage(&self, team: Team) -> i64 {
        self.combatants
            .iter()
            .filter(|c| c.team == team)
            .map(|c| c.damage_dealt)
            .sum()
    }

    pub fn reaction_count(&self, reaction: ReactionKind) -> u32 {
        self.reactions.get(reaction.name()).copied().unwrap_or(0)
    }
}
