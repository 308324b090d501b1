//! Damage calculation - turning an instance + stats into a DamageResult

use super::{DamageInstance, DamageResult, ReactionHit};
use crate::combatant::Combatant;
use crate::defense::{defense_multiplier, resistance_multiplier};
use crate::reaction::{apply_element, ReactionContext};
use crate::types::{DamageCategory, Element};
use rand::Rng;
use tracing::debug;

/// Scaled damage before bonuses, crit and mitigation
pub fn base_damage(attacker: &Combatant, instance: &DamageInstance) -> f64 {
    attacker.stats.get(instance.scaling) * instance.multiplier * instance.base_multiplier
        + instance.additive_bonus
}

/// Resolve one damage instance against one defender
///
/// Order: base, damage bonuses (minus the defender's reduction), crit,
/// level defense, resistance, then the reaction the element causes.
/// Amplifying reactions multiply, Aggravate/Spread add after mitigation,
/// transformative reactions come back as separate [`ReactionHit`]s.
/// The defender's HP is not touched.
pub fn compute_damage(
    attacker: &Combatant,
    defender: &mut Combatant,
    instance: &DamageInstance,
    fallback_category: DamageCategory,
    ctx: &mut ReactionContext<'_>,
    rng: &mut impl Rng,
) -> DamageResult {
    let category = instance.category_or(fallback_category);

    // Step 1: base and bonuses
    let bonus = attacker.bonuses.total_for(instance.element, category)
        - defender.bonuses.reduction_taken;
    let mut damage = base_damage(attacker, instance) * (1.0 + bonus);

    // Step 2: crit
    let crit = rng.gen::<f64>() < attacker.crit_rate();
    if crit {
        damage *= 1.0 + attacker.crit_dmg();
    }

    // Step 3: mitigation
    damage *= defense_multiplier(attacker.level, defender.level, 0.0);
    let resisted = instance.element.unwrap_or(Element::Physical);
    damage *= resistance_multiplier(defender.resistances.get(resisted));

    // Step 4: reaction
    let mut reaction_hits = Vec::new();
    let outcome = instance.applied_element().map(|element| {
        apply_element(defender, element, attacker, instance.units, ctx)
    });

    if let Some(outcome) = &outcome {
        if let Some(amplifier) = outcome.amplifier {
            damage *= amplifier;
        }
        damage += outcome.additive_bonus;
        if let Some(hit) = &outcome.transformative {
            reaction_hits.push(ReactionHit {
                source: attacker.id,
                target: defender.id,
                reaction: hit.reaction,
                damage: hit.damage,
                element: hit.element,
                aoe_radius: hit.aoe_radius,
                crit: hit.crit,
            });
        }
    }

    let damage = damage.round().max(0.0) as i64;
    debug!(
        attacker = %attacker.name,
        defender = %defender.name,
        damage,
        crit,
        reaction = ?outcome.as_ref().and_then(|o| o.reaction),
        "damage computed"
    );

    DamageResult {
        target: defender.id,
        damage,
        crit,
        element: instance.element,
        applied_element: outcome.is_some(),
        label: instance.label(),
        outcome,
        reaction_hits,
    }
}
