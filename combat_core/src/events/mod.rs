//! Event/trigger dispatch - passives and buffs reacting to battle events
//!
//! Effects are plain data ([`EffectPayload`]); custom behaviour is looked up
//! by id in an [`EffectRegistry`]. Dispatch never touches the scheduler: any
//! timeline change is returned to the caller as a [`TimelineRequest`].

mod buff;
mod effect;
mod registry;

pub use buff::{apply_buff, expire_buff, tick_buff_timer, tick_buffs, Buff, BuffTimerId, Passive};
pub use effect::{apply_payload, EffectPayload, TimelineRequest};
pub use registry::{EffectFn, EffectRegistry, EffectScope};

use crate::combatant::Combatant;
use crate::reaction::ReactionKind;
use crate::types::CombatantId;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

/// Named battle events buffs and passives can listen to
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventName {
    TurnStart,
    TurnEnd,
    DamageTaken,
    HpChange,
    ReactionTriggered,
    Custom(String),
}

impl fmt::Display for EventName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventName::TurnStart => f.write_str("on_turn_start"),
            EventName::TurnEnd => f.write_str("on_turn_end"),
            EventName::DamageTaken => f.write_str("on_damage_taken"),
            EventName::HpChange => f.write_str("on_hp_change"),
            EventName::ReactionTriggered => f.write_str("on_reaction"),
            EventName::Custom(name) => write!(f, "{}", name),
        }
    }
}

/// Payload describing what happened
#[derive(Debug, Clone, PartialEq)]
pub struct EventContext {
    pub event: EventName,
    /// Combatant that caused the event, if any
    pub source: Option<CombatantId>,
    /// Combatant the event happened to, if any
    pub target: Option<CombatantId>,
    /// Damage, HP delta, ... depending on the event
    pub amount: f64,
    pub reaction: Option<ReactionKind>,
}

impl EventContext {
    pub fn new(event: EventName) -> Self {
        EventContext {
            event,
            source: None,
            target: None,
            amount: 0.0,
            reaction: None,
        }
    }

    pub fn with_source(mut self, source: CombatantId) -> Self {
        self.source = Some(source);
        self
    }

    pub fn with_target(mut self, target: CombatantId) -> Self {
        self.target = Some(target);
        self
    }

    pub fn with_amount(mut self, amount: f64) -> Self {
        self.amount = amount;
        self
    }

    pub fn with_reaction(mut self, reaction: ReactionKind) -> Self {
        self.reaction = Some(reaction);
        self
    }
}

/// Dispatch an event to every audience member, passives before buffs
///
/// `units` is the battle roster indexed by [`CombatantId`]; ids outside it
/// are skipped. Returns the timeline shifts the effects asked for.
pub fn trigger(
    registry: &EffectRegistry,
    context: &EventContext,
    audience: &[CombatantId],
    units: &mut [Combatant],
) -> Vec<TimelineRequest> {
    let mut requests = Vec::new();

    for id in audience {
        let Some(unit) = units.get_mut(id.0) else {
            continue;
        };

        for index in 0..unit.passives.len() {
            if unit.passives[index].trigger != context.event {
                continue;
            }
            let effects = unit.passives[index].effects.clone();
            debug!(
                unit = %unit.name,
                passive = %unit.passives[index].name,
                event = %context.event,
                "passive fired"
            );
            for payload in &effects {
                apply_payload(payload, unit, registry, context, &mut requests);
            }
        }

        for index in 0..unit.buffs.len() {
            let buff = &unit.buffs[index];
            if !buff.applied || buff.trigger.as_ref() != Some(&context.event) {
                continue;
            }
            let effects = buff.on_trigger.clone();
            debug!(
                unit = %unit.name,
                buff = %buff.name,
                event = %context.event,
                "buff triggered"
            );
            for payload in &effects {
                apply_payload(payload, unit, registry, context, &mut requests);
            }
        }
    }

    requests
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::BaseStats;
    use crate::types::{Element, StatType, Team};

    fn unit(id: usize) -> Combatant {
        Combatant::new(
            CombatantId(id),
            format!("Unit {}", id),
            Team::Players,
            Element::Pyro,
            BaseStats {
                atk: 1000.0,
                hp: 10_000.0,
                ..Default::default()
            },
        )
    }

    #[test]
    fn test_passive_fires_on_matching_event() {
        let mut units = vec![unit(0), unit(1)];
        units[0].passives.push(Passive {
            name: "Kindling".to_string(),
            description: String::new(),
            trigger: EventName::TurnStart,
            effects: vec![EffectPayload::StatDelta {
                stat: StatType::Atk,
                amount: 0.1,
            }],
        });

        let registry = EffectRegistry::with_defaults();
        let ctx = EventContext::new(EventName::TurnStart);
        trigger(&registry, &ctx, &[CombatantId(0), CombatantId(1)], &mut units);

        assert!((units[0].stats.get(StatType::Atk) - 1100.0).abs() < 1e-9);
        assert!((units[1].stats.get(StatType::Atk) - 1000.0).abs() < 1e-9);

        let other = EventContext::new(EventName::TurnEnd);
        trigger(&registry, &other, &[CombatantId(0)], &mut units);
        assert!((units[0].stats.get(StatType::Atk) - 1100.0).abs() < 1e-9);
    }

    #[test]
    fn test_timeline_requests_are_returned_not_applied() {
        let mut units = vec![unit(0)];
        units[0].passives.push(Passive {
            name: "Haste".to_string(),
            description: String::new(),
            trigger: EventName::DamageTaken,
            effects: vec![EffectPayload::ShiftTimeline { percent: -0.2 }],
        });

        let registry = EffectRegistry::new();
        let ctx = EventContext::new(EventName::DamageTaken).with_amount(100.0);
        let requests = trigger(&registry, &ctx, &[CombatantId(0)], &mut units);

        assert_eq!(
            requests,
            vec![TimelineRequest {
                actor: CombatantId(0),
                percent: -0.2
            }]
        );
    }

    #[test]
    fn test_buff_on_trigger_runs_after_passives() {
        let mut units = vec![unit(0)];
        units[0].current_hp = 5_000;
        let registry = EffectRegistry::with_defaults();

        let buff = Buff::new("Regrowth", 2)
            .triggered_by(EventName::TurnEnd)
            .on_trigger(EffectPayload::Custom {
                id: "regeneration".to_string(),
            });
        let ctx = EventContext::new(EventName::TurnEnd);
        apply_buff(&mut units[0], buff, &registry, &ctx);

        trigger(&registry, &ctx, &[CombatantId(0)], &mut units);
        // 5% of 10k
        assert_eq!(units[0].current_hp, 5_500);
    }

    #[test]
    fn test_unknown_ids_are_skipped() {
        let mut units = vec![unit(0)];
        let registry = EffectRegistry::new();
        let ctx = EventContext::new(EventName::TurnStart);
        let requests = trigger(&registry, &ctx, &[CombatantId(7)], &mut units);
        assert!(requests.is_empty());
    }
}
