//! Battle reports - summary tables and multi-seed statistics

use combat_core::scheduler::TimelineSlot;
use combat_core::{Actor, BattleOutcome, BattleSummary, Combatant, Team};
use std::fmt::Write;

/// Damage share of one combatant within its team
pub fn damage_share(summary: &BattleSummary, index: usize) -> f64 {
    let Some(entry) = summary.combatants.get(index) else {
        return 0.0;
    };
    let team_total = summary.total_damage(entry.team);
    if team_total > 0 {
        entry.damage_dealt as f64 / team_total as f64 * 100.0
    } else {
        0.0
    }
}

/// Render a summary as a plain-text table
pub fn render(summary: &BattleSummary) -> String {
    let mut out = String::new();
    let outcome = summary
        .outcome
        .map(|o| o.to_string())
        .unwrap_or_else(|| "in progress".to_string());

    let _ = writeln!(out, "Outcome: {} after {} steps (AV {:.1})", outcome, summary.steps, summary.clock);
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "{:<20} {:<8} {:>10} {:>10} {:>8} {:>7} {:>6} {:>8}",
        "Combatant", "Team", "Dealt", "Taken", "Healed", "Share", "Turns", "HP"
    );

    for (index, entry) in summary.combatants.iter().enumerate() {
        let team = match entry.team {
            Team::Players => "players",
            Team::Enemies => "enemies",
        };
        let name = if entry.summon {
            format!("{} (summon)", entry.name)
        } else {
            entry.name.clone()
        };
        let hp = if entry.alive {
            entry.final_hp.to_string()
        } else {
            "down".to_string()
        };
        let _ = writeln!(
            out,
            "{:<20} {:<8} {:>10} {:>10} {:>8} {:>6.1}% {:>6} {:>8}",
            name,
            team,
            entry.damage_dealt,
            entry.damage_taken,
            entry.healing_done,
            damage_share(summary, index),
            entry.turns_taken,
            hp
        );
    }

    if !summary.reactions.is_empty() {
        let _ = writeln!(out);
        let _ = writeln!(out, "Reactions:");
        for (name, count) in &summary.reactions {
            let _ = writeln!(out, "  {:<20} {:>5}", name, count);
        }
    }
    out
}

/// Render upcoming turns; delayed or advanced slots are marked
pub fn render_timeline(slots: &[TimelineSlot], units: &[Combatant]) -> String {
    let mut out = String::new();
    for (turn, slot) in slots.iter().enumerate() {
        let name = match slot.actor {
            Actor::Combatant(id) => units
                .get(id.0)
                .map(|u| u.name.clone())
                .unwrap_or_else(|| id.to_string()),
            other => other.to_string(),
        };
        let marker = if slot.shifted { " [moved]" } else { "" };
        let _ = writeln!(
            out,
            "{:>3}. {:<20} AV {:>8.1} (+{:.1}){}",
            turn + 1,
            name,
            slot.time,
            slot.av_remaining,
            marker
        );
    }
    out
}

/// Aggregate over several seeded battles
#[derive(Debug, Clone, Default)]
pub struct TrialStats {
    pub battles: u32,
    pub player_wins: u32,
    pub enemy_wins: u32,
    pub step_limits: u32,
    pub total_steps: u64,
    pub total_reactions: u64,
}

impl TrialStats {
    pub fn record(&mut self, summary: &BattleSummary) {
        self.battles += 1;
        match summary.outcome {
            Some(BattleOutcome::PlayersWin) => self.player_wins += 1,
            Some(BattleOutcome::EnemiesWin) => self.enemy_wins += 1,
            Some(BattleOutcome::StepLimit) | None => self.step_limits += 1,
        }
        self.total_steps += summary.steps;
        self.total_reactions += summary.reactions.values().map(|c| *c as u64).sum::<u64>();
    }

    /// Player win rate in percent
    pub fn win_rate(&self) -> f64 {
        if self.battles > 0 {
            self.player_wins as f64 / self.battles as f64 * 100.0
        } else {
            0.0
        }
    }

    pub fn avg_steps(&self) -> f64 {
        if self.battles > 0 {
            self.total_steps as f64 / self.battles as f64
        } else {
            0.0
        }
    }

    pub fn render(&self) -> String {
        format!(
            "Battles: {}  Players: {}  Enemies: {}  Step limit: {}\nWin rate: {:.1}%  Avg steps: {:.1}  Reactions: {}",
            self.battles,
            self.player_wins,
            self.enemy_wins,
            self.step_limits,
            self.win_rate(),
            self.avg_steps(),
            self.total_reactions
        )
    }
}
