//! Talents - the actions a combatant can take

use crate::damage::DamageInstance;
use crate::events::Buff;
use crate::stats::BaseStats;
use crate::types::{CombatantId, DamageCategory, Element, EnergyKind};
use serde::{Deserialize, Serialize};

/// Who an on-use effect lands on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TalentTarget {
    /// The talent's user
    User,
    /// The selected target
    Target,
    /// Every living ally of the user, user included
    Allies,
}

/// Summon created by a talent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummonSpec {
    pub name: String,
    pub element: Element,
    #[serde(default)]
    pub stats: BaseStats,
    /// Turns the summon acts before leaving
    pub lifetime: u32,
    #[serde(default)]
    pub talents: Vec<Talent>,
}

/// Summon bookkeeping on the summoned combatant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummonInfo {
    pub owner: CombatantId,
    pub remaining_turns: u32,
}

/// Non-damage consequence of using a talent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TalentEffect {
    /// Positive delays, negative advances
    ShiftTimeline { target: TalentTarget, percent: f64 },
    GrantEnergy {
        target: TalentTarget,
        #[serde(default)]
        energy: EnergyKind,
        amount: f64,
    },
    ApplyBuff { target: TalentTarget, buff: Buff },
    Summon(SummonSpec),
    /// Heal a fraction of each recipient's max HP
    Heal { target: TalentTarget, fraction: f64 },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Talent {
    pub id: String,
    pub name: String,
    pub category: DamageCategory,
    #[serde(default)]
    pub instances: Vec<DamageInstance>,
    #[serde(default)]
    pub energy_kind: EnergyKind,
    #[serde(default)]
    pub energy_cost: f64,
    /// Energy gained on use, before energy recharge
    #[serde(default)]
    pub energy_gain: f64,
    /// Owner turns before the talent is usable again
    #[serde(default)]
    pub cooldown: u32,
    #[serde(default)]
    pub on_use: Vec<TalentEffect>,
    /// Only usable while the owner is in this form
    #[serde(default)]
    pub form_lock: Option<String>,
}

impl Talent {
    pub fn new(id: &str, name: &str, category: DamageCategory) -> Self {
        Talent {
            id: id.to_string(),
            name: name.to_string(),
            category,
            instances: Vec::new(),
            energy_kind: EnergyKind::elemental(),
            energy_cost: 0.0,
            energy_gain: 0.0,
            cooldown: 0,
            on_use: Vec::new(),
            form_lock: None,
        }
    }

    pub fn with_instance(mut self, instance: DamageInstance) -> Self {
        self.instances.push(instance);
        self
    }

    pub fn with_cost(mut self, kind: EnergyKind, cost: f64) -> Self {
        self.energy_kind = kind;
        self.energy_cost = cost;
        self
    }

    pub fn with_energy_gain(mut self, gain: f64) -> Self {
        self.energy_gain = gain;
        self
    }

    pub fn with_cooldown(mut self, turns: u32) -> Self {
        self.cooldown = turns;
        self
    }

    pub fn with_effect(mut self, effect: TalentEffect) -> Self {
        self.on_use.push(effect);
        self
    }

    pub fn with_form_lock(mut self, form: &str) -> Self {
        self.form_lock = Some(form.to_string());
        self
    }
}

/// Basic attacks used in rotation, one step per normal attack
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalAttackChain {
    pub name: String,
    /// Talent ids in combo order
    pub steps: Vec<String>,
}

impl NormalAttackChain {
    pub fn new(name: &str, steps: &[&str]) -> Self {
        NormalAttackChain {
            name: name.to_string(),
            steps: steps.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Talent id for a combo index; wraps past the last step
    pub fn step(&self, index: usize) -> Option<&str> {
        if self.steps.is_empty() {
            return None;
        }
        Some(self.steps[index % self.steps.len()].as_str())
    }

    pub fn contains(&self, talent_id: &str) -> bool {
        self.steps.iter().any(|s| s == talent_id)
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_talent() {
        let toml = r#"
id = "hydro_burst"
name = "Tidal Surge"
category = "burst"
energy_cost = 60.0
cooldown = 2

[[instances]]
element = "hydro"
multiplier = 2.5
aoe_radius = 1.5
icd_tag = "burst"

[[on_use]]
kind = "shift_timeline"
target = "allies"
percent = -0.2

[[on_use]]
kind = "summon"
name = "Droplet"
element = "hydro"
lifetime = 2
"#;
        let talent: Talent = toml::from_str(toml).unwrap();
        assert_eq!(talent.category, DamageCategory::Burst);
        assert_eq!(talent.energy_kind, EnergyKind::elemental());
        assert_eq!(talent.instances.len(), 1);
        assert_eq!(talent.instances[0].icd_interval, 3);
        assert!(matches!(talent.on_use[1], TalentEffect::Summon(ref s) if s.lifetime == 2));
    }

    #[test]
    fn test_summon_specs_compare_by_stats() {
        let droplet = SummonSpec {
            name: "Droplet".to_string(),
            element: Element::Hydro,
            stats: BaseStats::default(),
            lifetime: 2,
            talents: Vec::new(),
        };
        let mut sturdier = droplet.clone();
        assert_eq!(TalentEffect::Summon(droplet.clone()), TalentEffect::Summon(sturdier.clone()));

        sturdier.stats.hp += 1000.0;
        assert_ne!(droplet, sturdier);
    }

    #[test]
    fn test_chain_steps_wrap() {
        let chain = NormalAttackChain::new("Sharpshooter", &["n1", "n2", "n3"]);
        let picked: Vec<_> = (0..5).filter_map(|i| chain.step(i)).collect();
        assert_eq!(picked, vec!["n1", "n2", "n3", "n1", "n2"]);
        assert!(chain.contains("n2"));
        assert!(!chain.contains("skill"));
        assert_eq!(NormalAttackChain::new("Empty", &[]).step(0), None);
    }

    #[test]
    fn test_form_lock_defaults_to_none() {
        let toml = r#"
id = "frosted"
name = "Frosted Starpiercer"
category = "skill"
form_lock = "nightsoul"
"#;
        let talent: Talent = toml::from_str(toml).unwrap();
        assert_eq!(talent.form_lock.as_deref(), Some("nightsoul"));
        assert!(Talent::new("na", "Strike", DamageCategory::NormalAttack).form_lock.is_none());
    }
}
