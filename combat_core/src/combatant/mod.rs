//! Combatant - a character, enemy or summon taking part in a battle

mod resources;
mod talent;

pub use resources::{Cooldowns, EnergyPools};
pub use talent::{NormalAttackChain, SummonInfo, SummonSpec, Talent, TalentEffect, TalentTarget};

use crate::aura::AuraSet;
use crate::events::{Buff, Passive};
use crate::icd::IcdTracker;
use crate::stats::{BaseStats, CombatStats, DamageBonuses, Resistances};
use crate::types::{CombatantId, Element, Position, StatType, Team};
use std::collections::HashMap;
use tracing::debug;

/// Level assumed when none is configured
pub const DEFAULT_LEVEL: u32 = 90;

/// A unit on the battlefield
///
/// Owns its auras, buffs and ICD counters; everything else refers to it by
/// [`CombatantId`].
#[derive(Debug, Clone)]
pub struct Combatant {
    pub id: CombatantId,
    pub name: String,
    pub team: Team,
    pub element: Element,
    pub level: u32,
    pub base: BaseStats,
    pub stats: CombatStats,
    pub max_hp: i64,
    pub current_hp: i64,
    pub bonuses: DamageBonuses,
    pub resistances: Resistances,
    pub auras: AuraSet,
    pub buffs: Vec<Buff>,
    pub passives: Vec<Passive>,
    pub icd: IcdTracker,
    pub energy: EnergyPools,
    pub cooldowns: Cooldowns,
    pub position: Position,
    pub talents: Vec<Talent>,
    pub normal_chain: Option<NormalAttackChain>,
    /// Chains that replace the normal one while in a form
    pub form_chains: HashMap<String, NormalAttackChain>,
    pub form: Option<String>,
    /// Next step of the active chain
    pub combo_index: usize,
    pub summon: Option<SummonInfo>,
    /// Skips its next turn
    pub frozen: bool,
    /// Left the battle without dying (expired summon)
    pub departed: bool,
}

impl Combatant {
    pub fn new(id: CombatantId, name: String, team: Team, element: Element, base: BaseStats) -> Self {
        let stats = CombatStats::from_base(&base);
        let max_hp = base.hp.round().max(1.0) as i64;
        Combatant {
            id,
            name,
            team,
            element,
            level: DEFAULT_LEVEL,
            base,
            stats,
            max_hp,
            current_hp: max_hp,
            bonuses: DamageBonuses::default(),
            resistances: Resistances::default(),
            auras: AuraSet::new(),
            buffs: Vec::new(),
            passives: Vec::new(),
            icd: IcdTracker::new(),
            energy: EnergyPools::new(),
            cooldowns: Cooldowns::new(),
            position: Position::default(),
            talents: Vec::new(),
            normal_chain: None,
            form_chains: HashMap::new(),
            form: None,
            combo_index: 0,
            summon: None,
            frozen: false,
            departed: false,
        }
    }

    pub fn with_level(mut self, level: u32) -> Self {
        self.level = level;
        self
    }

    pub fn with_position(mut self, position: Position) -> Self {
        self.position = position;
        self
    }

    pub fn with_resistances(mut self, resistances: Resistances) -> Self {
        self.resistances = resistances;
        self
    }

    pub fn with_bonuses(mut self, bonuses: DamageBonuses) -> Self {
        self.bonuses = bonuses;
        self
    }

    pub fn with_talent(mut self, talent: Talent) -> Self {
        self.talents.push(talent);
        self
    }

    pub fn with_passive(mut self, passive: Passive) -> Self {
        self.passives.push(passive);
        self
    }

    pub fn with_normal_chain(mut self, chain: NormalAttackChain) -> Self {
        self.normal_chain = Some(chain);
        self
    }

    pub fn with_form_chain(mut self, form: &str, chain: NormalAttackChain) -> Self {
        self.form_chains.insert(form.to_string(), chain);
        self
    }

    pub fn is_alive(&self) -> bool {
        self.current_hp > 0 && !self.departed
    }

    pub fn is_summon(&self) -> bool {
        self.summon.is_some()
    }

    pub fn speed(&self) -> f64 {
        self.stats.speed()
    }

    pub fn em(&self) -> f64 {
        self.stats.em()
    }

    pub fn crit_rate(&self) -> f64 {
        self.stats.get(StatType::CritRate)
    }

    pub fn crit_dmg(&self) -> f64 {
        self.stats.get(StatType::CritDmg)
    }

    /// Re-derive max HP after an HP buff, keeping current HP in range
    pub fn sync_max_hp(&mut self) {
        self.max_hp = self.stats.get(StatType::Hp).round().max(1.0) as i64;
        self.current_hp = self.current_hp.min(self.max_hp);
    }

    /// Lose HP, clamped at 0; returns the HP actually lost
    pub fn take_damage(&mut self, amount: i64) -> i64 {
        let lost = amount.max(0).min(self.current_hp);
        self.current_hp -= lost;
        lost
    }

    /// Restore HP, clamped at max; returns the HP actually restored
    pub fn heal(&mut self, amount: i64) -> i64 {
        let restored = amount.max(0).min(self.max_hp - self.current_hp).max(0);
        self.current_hp += restored;
        restored
    }

    pub fn hp_fraction(&self) -> f64 {
        self.current_hp as f64 / self.max_hp as f64
    }

    pub fn talent(&self, id: &str) -> Option<&Talent> {
        self.talents.iter().find(|t| t.id == id)
    }

    // === Forms and combos ===

    /// Chain for the current form, else the normal one
    pub fn active_chain(&self) -> Option<&NormalAttackChain> {
        self.form
            .as_ref()
            .and_then(|form| self.form_chains.get(form))
            .or(self.normal_chain.as_ref())
    }

    /// Basic attack the combo is up to
    pub fn next_normal_attack(&self) -> Option<&Talent> {
        self.active_chain()
            .and_then(|chain| chain.step(self.combo_index))
            .and_then(|id| self.talent(id))
    }

    fn in_any_chain(&self, talent_id: &str) -> bool {
        self.normal_chain
            .iter()
            .chain(self.form_chains.values())
            .any(|chain| chain.contains(talent_id))
    }

    /// Whether the current form allows the talent
    pub fn form_allows(&self, talent: &Talent) -> bool {
        match &talent.form_lock {
            Some(lock) => self.form.as_deref() == Some(lock.as_str()),
            None => true,
        }
    }

    /// Move to the next chain step, wrapping after the last
    pub fn advance_combo(&mut self) {
        let len = self.active_chain().map_or(0, NormalAttackChain::len);
        self.combo_index = if len == 0 { 0 } else { (self.combo_index + 1) % len };
    }

    pub fn reset_combo(&mut self) {
        self.combo_index = 0;
    }

    /// Switch to a form; the combo starts over
    pub fn enter_form(&mut self, form: &str) {
        debug!(unit = %self.name, form, "form entered");
        self.form = Some(form.to_string());
        self.combo_index = 0;
    }

    /// Leave `form` if it is the current one
    pub fn leave_form(&mut self, form: &str) {
        if self.form.as_deref() == Some(form) {
            debug!(unit = %self.name, form, "form left");
            self.form = None;
            self.combo_index = 0;
        }
    }

    /// Talent the auto-battler would pick: first one that is affordable
    /// and off cooldown, else the first usable talent
    ///
    /// Chain members are only eligible on their own combo step, and
    /// form-locked talents only in their form.
    pub fn preferred_talent(&self) -> Option<&Talent> {
        let next_basic = self.next_normal_attack().map(|t| t.id.as_str());
        let eligible = |t: &&Talent| {
            self.form_allows(t) && (!self.in_any_chain(&t.id) || Some(t.id.as_str()) == next_basic)
        };
        self.talents
            .iter()
            .filter(eligible)
            .find(|t| {
                self.cooldowns.is_ready(&t.id) && self.energy.can_afford(&t.energy_kind, t.energy_cost)
            })
            .or_else(|| self.talents.iter().find(eligible))
            .or_else(|| self.talents.first())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{DamageCategory, EnergyKind};

    fn fighter() -> Combatant {
        Combatant::new(
            CombatantId(0),
            "Fighter".to_string(),
            Team::Players,
            Element::Electro,
            BaseStats {
                atk: 900.0,
                hp: 10_000.0,
                ..Default::default()
            },
        )
    }

    #[test]
    fn test_take_damage_clamps_at_zero() {
        let mut unit = fighter();
        assert_eq!(unit.take_damage(4_000), 4_000);
        assert_eq!(unit.take_damage(9_000), 6_000);
        assert_eq!(unit.current_hp, 0);
        assert!(!unit.is_alive());
    }

    #[test]
    fn test_heal_clamps_at_max() {
        let mut unit = fighter();
        unit.take_damage(500);
        assert_eq!(unit.heal(2_000), 500);
        assert_eq!(unit.current_hp, unit.max_hp);
    }

    #[test]
    fn test_departed_is_not_alive() {
        let mut unit = fighter();
        unit.departed = true;
        assert!(!unit.is_alive());
    }

    #[test]
    fn test_preferred_talent_skips_unaffordable() {
        let unit = fighter()
            .with_talent(
                Talent::new("burst", "Thunderclap", DamageCategory::Burst)
                    .with_cost(EnergyKind::elemental(), 60.0),
            )
            .with_talent(Talent::new("na", "Strike", DamageCategory::NormalAttack));

        assert_eq!(unit.preferred_talent().unwrap().id, "na");
    }

    #[test]
    fn test_preferred_talent_falls_back_to_first() {
        let mut unit = fighter().with_talent(
            Talent::new("skill", "Spark", DamageCategory::Skill).with_cooldown(2),
        );
        unit.cooldowns.start("skill", 2);
        assert_eq!(unit.preferred_talent().unwrap().id, "skill");
    }

    fn chained() -> Combatant {
        fighter()
            .with_talent(Talent::new("skill", "Spark", DamageCategory::Skill).with_cooldown(2))
            .with_talent(Talent::new("n1", "Strike 1", DamageCategory::NormalAttack))
            .with_talent(Talent::new("n2", "Strike 2", DamageCategory::NormalAttack))
            .with_talent(Talent::new("s1", "Shatter 1", DamageCategory::NormalAttack))
            .with_talent(
                Talent::new("pierce", "Starpiercer", DamageCategory::Burst).with_form_lock("nightsoul"),
            )
            .with_normal_chain(NormalAttackChain::new("Strikes", &["n1", "n2"]))
            .with_form_chain("nightsoul", NormalAttackChain::new("Shatter", &["s1"]))
    }

    #[test]
    fn test_combo_advances_and_wraps() {
        let mut unit = chained();
        assert_eq!(unit.next_normal_attack().unwrap().id, "n1");
        unit.advance_combo();
        assert_eq!(unit.next_normal_attack().unwrap().id, "n2");
        unit.advance_combo();
        assert_eq!(unit.combo_index, 0);
        unit.advance_combo();
        unit.reset_combo();
        assert_eq!(unit.next_normal_attack().unwrap().id, "n1");
    }

    #[test]
    fn test_preferred_talent_follows_combo() {
        let mut unit = chained();
        unit.cooldowns.start("skill", 2);
        assert_eq!(unit.preferred_talent().unwrap().id, "n1");
        unit.advance_combo();
        assert_eq!(unit.preferred_talent().unwrap().id, "n2");
    }

    #[test]
    fn test_form_swaps_chain_and_unlocks_talents() {
        let mut unit = chained();
        unit.cooldowns.start("skill", 2);
        unit.advance_combo();
        assert!(!unit.form_allows(unit.talent("pierce").unwrap()));

        unit.enter_form("nightsoul");
        assert_eq!(unit.combo_index, 0);
        assert_eq!(unit.active_chain().unwrap().name, "Shatter");
        assert_eq!(unit.preferred_talent().unwrap().id, "s1");
        assert!(unit.form_allows(unit.talent("pierce").unwrap()));

        unit.leave_form("other");
        assert_eq!(unit.form.as_deref(), Some("nightsoul"));
        unit.leave_form("nightsoul");
        assert_eq!(unit.next_normal_attack().unwrap().id, "n1");
    }
}
