//! Buffs and passives - effect carriers attached to a combatant

use super::effect::{apply_payload, EffectPayload, TimelineRequest};
use super::registry::EffectRegistry;
use super::{EventContext, EventName};
use crate::combatant::Combatant;
use crate::types::CombatantId;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

/// Identifier of a buff's countdown actor on the timeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BuffTimerId(pub u64);

impl fmt::Display for BuffTimerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "timer-{}", self.0)
    }
}

/// Temporary effect carrier
///
/// `on_apply` payloads run once when the buff lands; reversible buffs undo
/// them on expiry. `on_trigger` payloads run whenever `trigger` fires.
/// Buffs without a timer count down at the end of their owner's turn;
/// timer buffs count down when their own timeline actor comes up.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Buff {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub source: Option<CombatantId>,
    #[serde(default)]
    pub trigger: Option<EventName>,
    #[serde(default)]
    pub on_apply: Vec<EffectPayload>,
    #[serde(default)]
    pub on_trigger: Vec<EffectPayload>,
    /// Custom effect id run on expiry
    #[serde(default)]
    pub cleanup: Option<String>,
    #[serde(default = "default_reversible")]
    pub reversible: bool,
    pub duration: u32,
    #[serde(skip)]
    pub remaining_turns: u32,
    #[serde(default)]
    pub timer: bool,
    #[serde(skip)]
    pub timer_id: Option<BuffTimerId>,
    #[serde(skip)]
    pub applied: bool,
}

fn default_reversible() -> bool {
    true
}

impl Buff {
    pub fn new(name: &str, duration: u32) -> Self {
        Buff {
            name: name.to_string(),
            description: String::new(),
            source: None,
            trigger: None,
            on_apply: Vec::new(),
            on_trigger: Vec::new(),
            cleanup: None,
            reversible: true,
            duration,
            remaining_turns: duration,
            timer: false,
            timer_id: None,
            applied: false,
        }
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = description.to_string();
        self
    }

    pub fn from_source(mut self, source: CombatantId) -> Self {
        self.source = Some(source);
        self
    }

    pub fn triggered_by(mut self, event: EventName) -> Self {
        self.trigger = Some(event);
        self
    }

    pub fn on_apply(mut self, payload: EffectPayload) -> Self {
        self.on_apply.push(payload);
        self
    }

    pub fn on_trigger(mut self, payload: EffectPayload) -> Self {
        self.on_trigger.push(payload);
        self
    }

    pub fn with_cleanup(mut self, effect_id: &str) -> Self {
        self.cleanup = Some(effect_id.to_string());
        self
    }

    pub fn irreversible(mut self) -> Self {
        self.reversible = false;
        self
    }

    /// Count down on a dedicated timeline actor instead of owner turns
    pub fn with_timer(mut self) -> Self {
        self.timer = true;
        self
    }
}

/// Always-on listener
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Passive {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub trigger: EventName,
    #[serde(default)]
    pub effects: Vec<EffectPayload>,
}

/// Attach a buff to `unit`, running its on-apply payloads once
///
/// Re-applying a buff with the same name only refreshes its countdown.
pub fn apply_buff(
    unit: &mut Combatant,
    mut buff: Buff,
    registry: &EffectRegistry,
    context: &EventContext,
) -> Vec<TimelineRequest> {
    let mut requests = Vec::new();

    if let Some(existing) = unit
        .buffs
        .iter_mut()
        .find(|b| b.applied && b.name == buff.name)
    {
        existing.remaining_turns = existing.remaining_turns.max(buff.duration);
        debug!(unit = %unit.name, buff = %buff.name, "buff refreshed");
        return requests;
    }

    for payload in &buff.on_apply {
        apply_payload(payload, unit, registry, context, &mut requests);
    }
    buff.applied = true;
    buff.remaining_turns = buff.duration;
    debug!(unit = %unit.name, buff = %buff.name, turns = buff.duration, "buff applied");
    unit.buffs.push(buff);

    requests
}

/// Undo a buff that has left `unit`
pub fn expire_buff(
    unit: &mut Combatant,
    buff: &Buff,
    registry: &EffectRegistry,
    context: &EventContext,
) -> Vec<TimelineRequest> {
    let mut requests = Vec::new();
    if !buff.applied {
        return requests;
    }

    if buff.reversible {
        for payload in buff.on_apply.iter().filter_map(EffectPayload::negated) {
            apply_payload(&payload, unit, registry, context, &mut requests);
        }
    }
    if let Some(cleanup) = &buff.cleanup {
        let payload = EffectPayload::Custom {
            id: cleanup.clone(),
        };
        apply_payload(&payload, unit, registry, context, &mut requests);
    }
    debug!(unit = %unit.name, buff = %buff.name, "buff expired");

    requests
}

/// Owner end-of-turn countdown for buffs without a timer
pub fn tick_buffs(
    unit: &mut Combatant,
    registry: &EffectRegistry,
    context: &EventContext,
) -> Vec<TimelineRequest> {
    let mut expired = Vec::new();
    let mut kept = Vec::with_capacity(unit.buffs.len());

    for mut buff in unit.buffs.drain(..) {
        if buff.timer {
            kept.push(buff);
            continue;
        }
        buff.remaining_turns = buff.remaining_turns.saturating_sub(1);
        if buff.remaining_turns == 0 {
            expired.push(buff);
        } else {
            kept.push(buff);
        }
    }
    unit.buffs = kept;

    let mut requests = Vec::new();
    for buff in &expired {
        requests.extend(expire_buff(unit, buff, registry, context));
    }
    requests
}

/// Countdown for the buff owning `timer`; returns true once it expired
pub fn tick_buff_timer(
    unit: &mut Combatant,
    timer: BuffTimerId,
    registry: &EffectRegistry,
    context: &EventContext,
) -> (bool, Vec<TimelineRequest>) {
    let Some(index) = unit.buffs.iter().position(|b| b.timer_id == Some(timer)) else {
        return (true, Vec::new());
    };

    let buff = &mut unit.buffs[index];
    buff.remaining_turns = buff.remaining_turns.saturating_sub(1);
    if buff.remaining_turns > 0 {
        return (false, Vec::new());
    }

    let buff = unit.buffs.remove(index);
    let requests = expire_buff(unit, &buff, registry, context);
    (true, requests)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::BaseStats;
    use crate::types::{Element, StatType, Team};

    fn unit() -> Combatant {
        Combatant::new(
            CombatantId(0),
            "Owner".to_string(),
            Team::Players,
            Element::Cryo,
            BaseStats {
                atk: 1000.0,
                spd: 100.0,
                ..Default::default()
            },
        )
    }

    fn ctx() -> EventContext {
        EventContext::new(EventName::TurnEnd)
    }

    #[test]
    fn test_reversible_buff_restores_stat() {
        let mut u = unit();
        let registry = EffectRegistry::new();
        let buff = Buff::new("Warcry", 2).on_apply(EffectPayload::StatDelta {
            stat: StatType::Atk,
            amount: 0.2,
        });

        apply_buff(&mut u, buff, &registry, &ctx());
        assert!((u.stats.get(StatType::Atk) - 1200.0).abs() < 1e-9);

        tick_buffs(&mut u, &registry, &ctx());
        assert_eq!(u.buffs.len(), 1);
        assert!((u.stats.get(StatType::Atk) - 1200.0).abs() < 1e-9);

        tick_buffs(&mut u, &registry, &ctx());
        assert!(u.buffs.is_empty());
        assert!((u.stats.get(StatType::Atk) - 1000.0).abs() < 1e-9);
    }

    #[test]
    fn test_irreversible_buff_keeps_stat() {
        let mut u = unit();
        let registry = EffectRegistry::new();
        let buff = Buff::new("Blessing", 1)
            .irreversible()
            .on_apply(EffectPayload::StatDelta {
                stat: StatType::Atk,
                amount: 0.1,
            });

        apply_buff(&mut u, buff, &registry, &ctx());
        tick_buffs(&mut u, &registry, &ctx());
        assert!(u.buffs.is_empty());
        assert!((u.stats.get(StatType::Atk) - 1100.0).abs() < 1e-9);
    }

    #[test]
    fn test_reapply_refreshes_without_stacking() {
        let mut u = unit();
        let registry = EffectRegistry::new();
        let make = || {
            Buff::new("Warcry", 2).on_apply(EffectPayload::StatDelta {
                stat: StatType::Atk,
                amount: 0.2,
            })
        };

        apply_buff(&mut u, make(), &registry, &ctx());
        tick_buffs(&mut u, &registry, &ctx());
        apply_buff(&mut u, make(), &registry, &ctx());

        assert_eq!(u.buffs.len(), 1);
        assert_eq!(u.buffs[0].remaining_turns, 2);
        assert!((u.stats.get(StatType::Atk) - 1200.0).abs() < 1e-9);
    }

    #[test]
    fn test_timer_buffs_ignore_owner_turns() {
        let mut u = unit();
        let registry = EffectRegistry::new();
        let mut buff = Buff::new("Shred", 1)
            .with_timer()
            .on_apply(EffectPayload::ResistanceDelta {
                element: Element::Physical,
                amount: -0.4,
            });
        buff.timer_id = Some(BuffTimerId(9));

        apply_buff(&mut u, buff, &registry, &ctx());
        tick_buffs(&mut u, &registry, &ctx());
        assert_eq!(u.buffs.len(), 1);
        assert!((u.resistances.get(Element::Physical) + 0.3).abs() < 1e-9);

        let (expired, _) = tick_buff_timer(&mut u, BuffTimerId(9), &registry, &ctx());
        assert!(expired);
        assert!(u.buffs.is_empty());
        assert!((u.resistances.get(Element::Physical) - 0.1).abs() < 1e-9);
    }

    #[test]
    fn test_cleanup_effect_runs_on_expiry() {
        let mut u = unit();
        u.current_hp = 1_000;
        let registry = EffectRegistry::with_defaults();
        let buff = Buff::new("Afterglow", 1).with_cleanup("regeneration");

        apply_buff(&mut u, buff, &registry, &ctx());
        tick_buffs(&mut u, &registry, &ctx());
        // 5% of the default 15k
        assert_eq!(u.current_hp, 1_750);
    }

    #[test]
    fn test_buff_from_toml() {
        let toml = r#"
name = "Overclock"
duration = 2
timer = true
trigger = "turn_start"

[[on_apply]]
kind = "stat_delta"
stat = "spd"
amount = 0.1
"#;
        let buff: Buff = toml::from_str(toml).unwrap();
        assert!(buff.timer);
        assert!(buff.reversible);
        assert_eq!(buff.trigger, Some(EventName::TurnStart));
        assert!(!buff.applied);
    }
}
