//! Roster configuration loading

use super::{ConfigError, EngineConstants};
use crate::combatant::{Combatant, NormalAttackChain, Talent};
use crate::events::Passive;
use crate::stats::{BaseStats, DamageBonuses, Resistances};
use crate::types::{CombatantId, Element, EnergyKind, Team};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::Path;

/// Both sides of a battle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RosterConfig {
    #[serde(default)]
    pub players: Vec<CombatantConfig>,
    #[serde(default)]
    pub enemies: Vec<CombatantConfig>,
}

/// One combatant as written in a roster file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CombatantConfig {
    pub name: String,
    pub element: Element,
    /// Falls back to `combat.default_level`
    #[serde(default)]
    pub level: Option<u32>,
    #[serde(default)]
    pub stats: BaseStats,
    #[serde(default)]
    pub resistances: HashMap<Element, f64>,
    /// Falls back to `combat.default_resistance`
    #[serde(default)]
    pub default_resistance: Option<f64>,
    #[serde(default)]
    pub bonuses: DamageBonuses,
    #[serde(default)]
    pub talents: Vec<Talent>,
    /// Basic attack rotation, by talent id
    #[serde(default)]
    pub normal_chain: Option<NormalAttackChain>,
    /// Form name -> rotation used while in that form
    #[serde(default)]
    pub form_chains: HashMap<String, NormalAttackChain>,
    #[serde(default)]
    pub passives: Vec<Passive>,
    /// Starting elemental energy
    #[serde(default)]
    pub energy: f64,
}

impl CombatantConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.talents.is_empty() {
            return Err(ConfigError::ValidationError(format!(
                "{} has no talents",
                self.name
            )));
        }
        if self.stats.spd <= 0.0 {
            return Err(ConfigError::ValidationError(format!(
                "{} must have positive speed",
                self.name
            )));
        }

        let mut seen = HashSet::new();
        for talent in &self.talents {
            if !seen.insert(talent.id.as_str()) {
                return Err(ConfigError::ValidationError(format!(
                    "{} has duplicate talent '{}'",
                    self.name, talent.id
                )));
            }
            if talent.instances.iter().any(|i| i.icd_interval == 0) {
                return Err(ConfigError::ValidationError(format!(
                    "{}: talent '{}' has an ICD interval of 0",
                    self.name, talent.id
                )));
            }
        }

        let chains = self.normal_chain.iter().chain(self.form_chains.values());
        for chain in chains {
            if chain.is_empty() {
                return Err(ConfigError::ValidationError(format!(
                    "{}: attack chain '{}' has no steps",
                    self.name, chain.name
                )));
            }
            if let Some(missing) = chain.steps.iter().find(|id| !seen.contains(id.as_str())) {
                return Err(ConfigError::ValidationError(format!(
                    "{}: attack chain '{}' names unknown talent '{}'",
                    self.name, chain.name, missing
                )));
            }
        }
        Ok(())
    }

    /// Build the live combatant; the battle assigns the final id and position
    pub fn to_combatant(&self, team: Team, constants: &EngineConstants) -> Combatant {
        let resistances = Resistances::with_values(
            self.default_resistance
                .unwrap_or(constants.combat.default_resistance),
            self.resistances.clone(),
        );
        let mut unit = Combatant::new(
            CombatantId(0),
            self.name.clone(),
            team,
            self.element,
            self.stats.clone(),
        )
        .with_level(self.level.unwrap_or(constants.combat.default_level))
        .with_resistances(resistances)
        .with_bonuses(self.bonuses.clone());

        unit.talents = self.talents.clone();
        unit.normal_chain = self.normal_chain.clone();
        unit.form_chains = self.form_chains.clone();
        unit.passives = self.passives.clone();
        unit.energy.gain(&EnergyKind::elemental(), self.energy);
        unit
    }
}

impl RosterConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.players.is_empty() {
            return Err(ConfigError::ValidationError(
                "roster has no players".to_string(),
            ));
        }
        if self.enemies.is_empty() {
            return Err(ConfigError::ValidationError(
                "roster has no enemies".to_string(),
            ));
        }
        self.players
            .iter()
            .chain(&self.enemies)
            .try_for_each(CombatantConfig::validate)
    }
}

/// Load and validate a roster from a TOML file
pub fn load_roster(path: &Path) -> Result<RosterConfig, ConfigError> {
    let roster: RosterConfig = super::load_toml(path)?;
    roster.validate()?;
    Ok(roster)
}

/// Parse and validate a roster from a TOML string
pub fn parse_roster(content: &str) -> Result<RosterConfig, ConfigError> {
    let roster: RosterConfig = super::parse_toml(content)?;
    roster.validate()?;
    Ok(roster)
}

/// Demo roster shipped with the crate
pub fn default_roster() -> RosterConfig {
    let toml = include_str!("../../config/roster.toml");
    parse_roster(toml).unwrap_or_else(|_| RosterConfig {
        players: vec![fallback("Traveler", Element::Pyro)],
        enemies: vec![fallback("Training Dummy", Element::Physical)],
    })
}

fn fallback(name: &str, element: Element) -> CombatantConfig {
    use crate::damage::DamageInstance;
    use crate::types::{DamageCategory, StatType};

    CombatantConfig {
        name: name.to_string(),
        element,
        level: None,
        stats: BaseStats {
            atk: 800.0,
            ..Default::default()
        },
        resistances: HashMap::new(),
        default_resistance: None,
        bonuses: DamageBonuses::default(),
        talents: vec![Talent::new("strike", "Strike", DamageCategory::NormalAttack)
            .with_instance(DamageInstance::new(StatType::Atk, 1.0, Some(element)))],
        normal_chain: None,
        form_chains: HashMap::new(),
        passives: Vec::new(),
        energy: 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ROSTER: &str = r#"
[[players]]
name = "Kaeya"
element = "cryo"
level = 80
energy = 20.0

[players.stats]
atk = 1200.0
spd = 110.0
em = 100.0

[players.resistances]
cryo = 0.3

[[players.talents]]
id = "slash"
name = "Slash"
category = "normal_attack"

[[players.talents.instances]]
element = "cryo"
multiplier = 1.2
icd_tag = "na"

[[players.passives]]
name = "Cold Blood"
trigger = "turn_start"

[[players.passives.effects]]
kind = "custom"
id = "regeneration"

[[enemies]]
name = "Slime"
element = "hydro"

[[enemies.talents]]
id = "bounce"
name = "Bounce"
category = "normal_attack"

[[enemies.talents.instances]]
element = "hydro"
"#;

    #[test]
    fn test_parse_roster() {
        let roster = parse_roster(ROSTER).unwrap();
        assert_eq!(roster.players.len(), 1);
        assert_eq!(roster.enemies.len(), 1);

        let kaeya = &roster.players[0];
        assert_eq!(kaeya.element, Element::Cryo);
        assert_eq!(kaeya.talents[0].instances[0].icd_interval, 3);
        assert_eq!(kaeya.passives.len(), 1);
        assert!((kaeya.stats.hp - 15_000.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_to_combatant_applies_defaults() {
        let roster = parse_roster(ROSTER).unwrap();
        let constants = EngineConstants::default();

        let kaeya = roster.players[0].to_combatant(Team::Players, &constants);
        assert_eq!(kaeya.level, 80);
        assert!((kaeya.resistances.get(Element::Cryo) - 0.3).abs() < f64::EPSILON);
        assert!((kaeya.resistances.get(Element::Pyro) - 0.1).abs() < f64::EPSILON);
        assert!((kaeya.energy.get(&EnergyKind::elemental()) - 20.0).abs() < f64::EPSILON);

        let slime = roster.enemies[0].to_combatant(Team::Enemies, &constants);
        assert_eq!(slime.level, 90);
        assert_eq!(slime.team, Team::Enemies);
    }

    #[test]
    fn test_rejects_talentless_combatant() {
        let toml = r#"
[[players]]
name = "Nobody"
element = "anemo"

[[enemies]]
name = "Slime"
element = "hydro"

[[enemies.talents]]
id = "bounce"
name = "Bounce"
category = "normal_attack"
"#;
        assert!(matches!(
            parse_roster(toml),
            Err(ConfigError::ValidationError(_))
        ));
    }

    #[test]
    fn test_rejects_unknown_element() {
        let toml = r#"
[[players]]
name = "Odd"
element = "plasma"
"#;
        assert!(matches!(parse_roster(toml), Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn test_rejects_duplicate_talent_ids() {
        let toml = r#"
[[players]]
name = "Twin"
element = "pyro"

[[players.talents]]
id = "a"
name = "A"
category = "skill"

[[players.talents]]
id = "a"
name = "A again"
category = "skill"

[[enemies]]
name = "Slime"
element = "hydro"

[[enemies.talents]]
id = "bounce"
name = "Bounce"
category = "normal_attack"
"#;
        assert!(matches!(
            parse_roster(toml),
            Err(ConfigError::ValidationError(_))
        ));
    }

    #[test]
    fn test_default_roster_is_valid() {
        let roster = default_roster();
        assert!(roster.validate().is_ok());
        assert!(roster.players.len() >= 2);
        assert!(!roster.enemies.is_empty());
    }

    #[test]
    fn test_chains_load_and_validate() {
        let toml = r#"
[[players]]
name = "Cordelia"
element = "cryo"

[[players.talents]]
id = "n1"
name = "Dimmed Star 1"
category = "normal_attack"

[[players.talents]]
id = "n2"
name = "Dimmed Star 2"
category = "normal_attack"

[[players.talents]]
id = "s1"
name = "Shatterlight 1"
category = "normal_attack"

[players.normal_chain]
name = "Dimmed Star"
steps = ["n1", "n2"]

[players.form_chains.nightsoul]
name = "Shatterlight Strikes"
steps = ["s1"]

[[enemies]]
name = "Slime"
element = "hydro"

[[enemies.talents]]
id = "bounce"
name = "Bounce"
category = "normal_attack"
"#;
        let roster = parse_roster(toml).unwrap();
        let unit = roster.players[0].to_combatant(Team::Players, &EngineConstants::default());
        assert_eq!(unit.active_chain().unwrap().name, "Dimmed Star");
        assert_eq!(unit.form_chains["nightsoul"].steps, vec!["s1".to_string()]);

        let broken = toml.replace(r#"steps = ["s1"]"#, r#"steps = ["s9"]"#);
        assert!(matches!(
            parse_roster(&broken),
            Err(ConfigError::ValidationError(_))
        ));
    }
}
