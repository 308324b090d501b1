//! Effect payloads - what a buff or passive does when it fires

use super::registry::{EffectRegistry, EffectScope};
use super::EventContext;
use crate::combatant::Combatant;
use crate::types::{CombatantId, Element, EnergyKind, StatType};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Data-only description of an effect
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EffectPayload {
    /// Adds `base × amount` to the derived stat
    StatDelta { stat: StatType, amount: f64 },
    /// Shifts one elemental resistance (negative shreds)
    ResistanceDelta { element: Element, amount: f64 },
    /// General damage bonus
    DamageBonus { amount: f64 },
    GrantEnergy {
        #[serde(default)]
        energy: EnergyKind,
        amount: f64,
    },
    /// Positive delays, negative advances the unit's next turn
    ShiftTimeline { percent: f64 },
    /// Switch the unit into a form (swaps its basic attack chain)
    EnterForm { form: String },
    LeaveForm { form: String },
    /// Behaviour looked up in the effect registry
    Custom { id: String },
}

impl EffectPayload {
    /// Payload undoing this one, for numeric effects that can be reversed
    pub fn negated(&self) -> Option<EffectPayload> {
        match self {
            EffectPayload::StatDelta { stat, amount } => Some(EffectPayload::StatDelta {
                stat: *stat,
                amount: -amount,
            }),
            EffectPayload::ResistanceDelta { element, amount } => {
                Some(EffectPayload::ResistanceDelta {
                    element: *element,
                    amount: -amount,
                })
            }
            EffectPayload::DamageBonus { amount } => {
                Some(EffectPayload::DamageBonus { amount: -amount })
            }
            EffectPayload::EnterForm { form } => Some(EffectPayload::LeaveForm { form: form.clone() }),
            _ => None,
        }
    }
}

/// Scheduler change requested by an effect; the battle loop applies it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineRequest {
    pub actor: CombatantId,
    pub percent: f64,
}

/// Apply one payload to `unit`
pub fn apply_payload(
    payload: &EffectPayload,
    unit: &mut Combatant,
    registry: &EffectRegistry,
    context: &EventContext,
    requests: &mut Vec<TimelineRequest>,
) {
    match payload {
        EffectPayload::StatDelta { stat, amount } => {
            unit.stats.value_mut(*stat).add_percent(*amount);
            if *stat == StatType::Hp {
                unit.sync_max_hp();
            }
        }
        EffectPayload::ResistanceDelta { element, amount } => {
            unit.resistances.adjust(*element, *amount);
        }
        EffectPayload::DamageBonus { amount } => {
            unit.bonuses.general += amount;
        }
        EffectPayload::GrantEnergy { energy, amount } => {
            unit.energy.gain(energy, *amount);
        }
        EffectPayload::ShiftTimeline { percent } => {
            requests.push(TimelineRequest {
                actor: unit.id,
                percent: *percent,
            });
        }
        EffectPayload::EnterForm { form } => unit.enter_form(form),
        EffectPayload::LeaveForm { form } => unit.leave_form(form),
        EffectPayload::Custom { id } => match registry.get(id) {
            Some(effect) => {
                let mut scope = EffectScope {
                    unit,
                    context,
                    requests,
                };
                effect(&mut scope);
            }
            None => warn!(effect = %id, unit = %unit.name, "unknown custom effect skipped"),
        },
    }
}
