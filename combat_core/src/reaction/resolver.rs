//! Resolution of one element landing on a target

use super::formula::{additive_bonus, amplifying_multiplier, transformative_damage};
use super::kind::{ReactionClass, ReactionKind};
use super::table::{binary_reaction, composite_rule};
use crate::aura::{Aura, AuraChange};
use crate::combatant::Combatant;
use crate::config::EngineConstants;
use crate::events::{Buff, EffectPayload};
use crate::field::{Field, FieldObjectId};
use crate::types::{AuraTag, Element, Position};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Shared state the resolver reads or mutates besides the target
pub struct ReactionContext<'a> {
    pub constants: &'a EngineConstants,
    pub field: &'a mut Field,
}

/// Standalone hit produced by a transformative reaction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransformativeHit {
    pub reaction: ReactionKind,
    pub damage: i64,
    pub element: Element,
    /// Other enemies within this distance of the target are hit too
    pub aoe_radius: f64,
    pub crit: bool,
}

/// A Dendro Core going off
///
/// Hyperbloom (radius 0) hits the attacker's enemy nearest to the core;
/// Burgeon hits every enemy within `radius` of it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDetonation {
    pub object: FieldObjectId,
    pub reaction: ReactionKind,
    pub position: Position,
    pub damage: i64,
    pub element: Element,
    pub radius: f64,
}

/// Everything that happened when an element landed
#[derive(Debug, Clone, PartialEq)]
pub struct ReactionOutcome {
    pub reaction: Option<ReactionKind>,
    pub trigger: Element,
    /// Face-up element of the aura the trigger reacted with
    pub reacted_with: Option<Element>,
    pub aura_change: AuraChange,
    /// Multiplier for the triggering hit
    pub amplifier: Option<f64>,
    /// Flat bonus for the triggering hit
    pub additive_bonus: f64,
    pub transformative: Option<TransformativeHit>,
    /// Fraction of the target's cycle to move its next turn by
    pub timeline_shift: Option<f64>,
    pub spawned_core: Option<FieldObjectId>,
    pub detonation: Option<FieldDetonation>,
    /// Debuff for the target (Superconduct)
    pub debuff: Option<Buff>,
}

impl ReactionOutcome {
    fn new(trigger: Element) -> Self {
        ReactionOutcome {
            reaction: None,
            trigger,
            reacted_with: None,
            aura_change: AuraChange::None,
            amplifier: None,
            additive_bonus: 0.0,
            transformative: None,
            timeline_shift: None,
            spawned_core: None,
            detonation: None,
            debuff: None,
        }
    }

    pub fn class(&self) -> ReactionClass {
        self.reaction
            .map(ReactionKind::class)
            .unwrap_or(ReactionClass::None)
    }

    pub fn reacted(&self) -> bool {
        self.reaction.is_some()
    }
}

/// Land `element` on `target` and resolve whatever it causes
///
/// Resolution order, first match wins: Dendro Core detonation, composite
/// formation, Superposition, Aggravate/Spread, the binary table, and finally
/// plain aura application.
pub fn apply_element(
    target: &mut Combatant,
    element: Element,
    attacker: &Combatant,
    units: f64,
    ctx: &mut ReactionContext<'_>,
) -> ReactionOutcome {
    let mut outcome = ReactionOutcome::new(element);
    let constants = ctx.constants;
    let em = attacker.em();

    if let Some(detonation) = detonate_core(target.position, element, em, ctx) {
        debug!(
            attacker = %attacker.name,
            reaction = %detonation.reaction,
            core = %detonation.object,
            damage = detonation.damage,
            "dendro core detonated"
        );
        outcome.reaction = Some(detonation.reaction);
        outcome.detonation = Some(detonation);
        return outcome;
    }

    let matched = form_composite(target, element, constants, &mut outcome)
        .or_else(|| superposition(target, element))
        .or_else(|| quicken_bonus(target, element))
        .or_else(|| table_lookup(target, element));

    let Some((kind, index)) = matched else {
        if element.is_persistent() {
            outcome.aura_change = target.auras.refresh_or_insert(
                element,
                units,
                constants.aura.base_duration,
                constants.aura.decay_rate,
            );
        }
        return outcome;
    };

    outcome.reaction = Some(kind);
    if let Some(index) = index {
        let reacted = target.auras.get_index(index).map(|a| a.element);
        outcome.reacted_with = reacted;
        if let Some(amount) = kind.consumption() {
            outcome.aura_change = target.auras.consume(index, amount);
        }
    }

    if kind.is_transformative() {
        let (hit_element, aoe_radius) = kind.hit_profile(outcome.reacted_with.unwrap_or(element));
        outcome.transformative = Some(TransformativeHit {
            reaction: kind,
            damage: transformative_damage(
                em,
                kind.transformative_multiplier(),
                constants.reactions.transformative_base,
            ),
            element: hit_element,
            aoe_radius,
            crit: kind == ReactionKind::Superposition,
        });
    }
    if let Some((multiplier, em_factor)) = kind.amplifier() {
        outcome.amplifier = Some(amplifying_multiplier(em, multiplier, em_factor));
    }
    if let Some(coefficient) = kind.additive_coefficient() {
        outcome.additive_bonus = additive_bonus(em, coefficient, constants.reactions.additive_base);
    }

    apply_side_effects(target, attacker, kind, ctx, &mut outcome);

    debug!(
        attacker = %attacker.name,
        target = %target.name,
        trigger = %element,
        reaction = %kind,
        "reaction triggered"
    );

    outcome
}

fn detonate_core(
    position: Position,
    element: Element,
    em: f64,
    ctx: &mut ReactionContext<'_>,
) -> Option<FieldDetonation> {
    let reaction = match element {
        Element::Electro => ReactionKind::Hyperbloom,
        Element::Pyro => ReactionKind::Burgeon,
        _ => return None,
    };
    let constants = ctx.constants;
    let core = ctx
        .field
        .detonation_candidate(position, constants.field.detonation_proximity)?;

    let detonation = FieldDetonation {
        object: core.id,
        reaction,
        position: core.position,
        damage: transformative_damage(
            em,
            reaction.transformative_multiplier(),
            constants.reactions.transformative_base,
        ),
        element: Element::Dendro,
        radius: if reaction == ReactionKind::Burgeon {
            constants.field.burgeon_radius
        } else {
            0.0
        },
    };
    ctx.field.deactivate(detonation.object);
    Some(detonation)
}

/// Merge the incoming element with an unlocked aura into a locked composite
///
/// Returns the reaction with no aura index, since the contributing auras
/// are already gone.
fn form_composite(
    target: &mut Combatant,
    element: Element,
    constants: &EngineConstants,
    outcome: &mut ReactionOutcome,
) -> Option<(ReactionKind, Option<usize>)> {
    let (existing, rule) = target
        .auras
        .iter()
        .filter(|a| !a.locked && !a.is_expired() && a.element != element)
        .find_map(|a| composite_rule(a.element, element).map(|rule| (a.element, rule)))?;

    // one aura per face-up element
    if target
        .auras
        .iter()
        .any(|a| a.locked && a.element == rule.face)
    {
        return None;
    }

    let removed = target.auras.remove_unlocked(&[existing, element]);
    target.auras.push(Aura::composite(
        rule.name,
        rule.face,
        vec![existing, element],
        rule.tag,
        constants.aura.composite_units,
        constants.aura.base_duration,
    ));
    outcome.reacted_with = Some(existing);
    outcome.aura_change = AuraChange::Composite {
        name: rule.name.to_string(),
        removed,
    };
    Some((rule.reaction, None))
}

fn superposition(target: &Combatant, element: Element) -> Option<(ReactionKind, Option<usize>)> {
    if element != Element::Quantum || target.auras.is_empty() {
        return None;
    }
    let index = target
        .auras
        .iter()
        .position(Aura::is_tagged)
        .unwrap_or(0);
    Some((ReactionKind::Superposition, Some(index)))
}

fn quicken_bonus(target: &Combatant, element: Element) -> Option<(ReactionKind, Option<usize>)> {
    if !target.auras.has_tag(AuraTag::Quicken) {
        return None;
    }
    match element {
        Element::Electro => Some((ReactionKind::Aggravate, None)),
        Element::Dendro => Some((ReactionKind::Spread, None)),
        _ => None,
    }
}

/// First aura, oldest first, that reacts with `element` through any source
///
/// A locked composite still reacts through its constituents. Pairs that
/// would form a composite (Freeze, Quicken, Burning, Rimegrass) fire again
/// this way without stacking a second composite: Hydro on Frozen refreezes.
fn table_lookup(target: &Combatant, element: Element) -> Option<(ReactionKind, Option<usize>)> {
    target.auras.iter().enumerate().find_map(|(index, aura)| {
        aura.reacts_via()
            .iter()
            .find_map(|source| binary_reaction(element, *source))
            .map(|kind| (kind, Some(index)))
    })
}

fn apply_side_effects(
    target: &mut Combatant,
    attacker: &Combatant,
    kind: ReactionKind,
    ctx: &mut ReactionContext<'_>,
    outcome: &mut ReactionOutcome,
) {
    let constants = ctx.constants;
    outcome.timeline_shift = kind.timeline_shift();

    match kind {
        ReactionKind::Bloom => {
            let id = ctx.field.spawn_core(
                target.position,
                attacker.id,
                constants.field.dendro_core_lifetime,
            );
            outcome.spawned_core = Some(id);
        }
        ReactionKind::Superconduct => {
            let reactions = &constants.reactions;
            outcome.debuff = Some(
                Buff::new("Superconduct", reactions.superconduct_turns)
                    .with_description("Physical RES reduced")
                    .from_source(attacker.id)
                    .on_apply(EffectPayload::ResistanceDelta {
                        element: Element::Physical,
                        amount: -reactions.superconduct_res_shred,
                    }),
            );
        }
        ReactionKind::Freeze => {
            target.frozen = true;
        }
        ReactionKind::Rimegrass => {
            // one aura per face-up element
            if target.auras.get(Element::Cryo).is_none() {
                let mut aura = Aura::new(
                    Element::Cryo,
                    constants.reactions.frost_twined_units,
                    constants.aura.base_duration,
                    constants.aura.decay_rate,
                );
                aura.name = "Frost-Twined".to_string();
                target.auras.push(aura);
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::BaseStats;
    use crate::types::{CombatantId, Team};

    fn attacker(em: f64) -> Combatant {
        Combatant::new(
            CombatantId(0),
            "Attacker".to_string(),
            Team::Players,
            Element::Pyro,
            BaseStats {
                atk: 1000.0,
                em,
                ..Default::default()
            },
        )
    }

    fn target() -> Combatant {
        Combatant::new(
            CombatantId(1),
            "Target".to_string(),
            Team::Enemies,
            Element::Physical,
            BaseStats::default(),
        )
    }

    fn land(
        target: &mut Combatant,
        element: Element,
        field: &mut Field,
        constants: &EngineConstants,
    ) -> ReactionOutcome {
        let mut ctx = ReactionContext { constants, field };
        apply_element(target, element, &attacker(0.0), 1.0, &mut ctx)
    }

    #[test]
    fn test_plain_application_creates_aura() {
        let constants = EngineConstants::default();
        let mut field = Field::new();
        let mut t = target();

        let outcome = land(&mut t, Element::Hydro, &mut field, &constants);
        assert!(!outcome.reacted());
        assert_eq!(outcome.aura_change, AuraChange::Created(Element::Hydro));
        assert_eq!(t.auras.len(), 1);
    }

    #[test]
    fn test_non_persistent_leaves_nothing() {
        let constants = EngineConstants::default();
        let mut field = Field::new();
        let mut t = target();

        for element in [Element::Anemo, Element::Geo, Element::Quantum, Element::Physical] {
            let outcome = land(&mut t, element, &mut field, &constants);
            assert!(!outcome.reacted());
        }
        assert!(t.auras.is_empty());
    }

    #[test]
    fn test_composite_formation() {
        let constants = EngineConstants::default();
        let mut field = Field::new();
        let mut t = target();

        land(&mut t, Element::Cryo, &mut field, &constants);
        let outcome = land(&mut t, Element::Hydro, &mut field, &constants);

        assert_eq!(outcome.reaction, Some(ReactionKind::Freeze));
        assert_eq!(t.auras.len(), 1);
        let aura = t.auras.get_index(0).unwrap();
        assert!(aura.locked);
        assert_eq!(aura.name, "Frozen");
        assert_eq!(aura.source_elements, vec![Element::Cryo, Element::Hydro]);
        assert!(t.frozen);
    }

    #[test]
    fn test_electro_charged_composite_deals_damage() {
        let constants = EngineConstants::default();
        let mut field = Field::new();
        let mut t = target();

        land(&mut t, Element::Hydro, &mut field, &constants);
        let outcome = land(&mut t, Element::Electro, &mut field, &constants);

        let hit = outcome.transformative.unwrap();
        assert_eq!(hit.reaction, ReactionKind::ElectroCharged);
        assert_eq!(hit.damage, 2892);
        assert_eq!(hit.element, Element::Electro);
    }

    #[test]
    fn test_forward_vaporize_consumes_hydro() {
        let constants = EngineConstants::default();
        let mut field = Field::new();
        let mut t = target();

        land(&mut t, Element::Hydro, &mut field, &constants);
        let outcome = land(&mut t, Element::Pyro, &mut field, &constants);

        assert_eq!(outcome.reaction, Some(ReactionKind::ForwardVaporize));
        assert!((outcome.amplifier.unwrap() - 2.0).abs() < 1e-12);
        assert!(t.auras.is_empty());
        // reacted triggers never leave their own aura
        assert!(t.auras.get(Element::Pyro).is_none());
    }

    #[test]
    fn test_reverse_melt_leaves_remainder() {
        let constants = EngineConstants::default();
        let mut field = Field::new();
        let mut t = target();

        land(&mut t, Element::Cryo, &mut field, &constants);
        let outcome = land(&mut t, Element::Pyro, &mut field, &constants);

        assert_eq!(outcome.reaction, Some(ReactionKind::ReverseMelt));
        assert!((outcome.amplifier.unwrap() - 1.5).abs() < 1e-12);
        assert!((t.auras.get(Element::Cryo).unwrap().units - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_quicken_then_aggravate() {
        let constants = EngineConstants::default();
        let mut field = Field::new();
        let mut t = target();

        land(&mut t, Element::Dendro, &mut field, &constants);
        let formed = land(&mut t, Element::Electro, &mut field, &constants);
        assert_eq!(formed.reaction, Some(ReactionKind::Quicken));

        let outcome = land(&mut t, Element::Electro, &mut field, &constants);
        assert_eq!(outcome.reaction, Some(ReactionKind::Aggravate));
        assert!((outcome.additive_bonus - 1.15 * 1447.0).abs() < 1e-9);
        assert_eq!(t.auras.len(), 1);

        let spread = land(&mut t, Element::Dendro, &mut field, &constants);
        assert_eq!(spread.reaction, Some(ReactionKind::Spread));
    }

    #[test]
    fn test_superposition_uses_tagged_aura() {
        let constants = EngineConstants::default();
        let mut field = Field::new();
        let mut t = target();

        land(&mut t, Element::Pyro, &mut field, &constants);
        t.auras.push(Aura::composite(
            "Quicken",
            Element::Dendro,
            vec![Element::Electro, Element::Dendro],
            AuraTag::Quicken,
            1.0,
            2,
        ));

        let outcome = land(&mut t, Element::Quantum, &mut field, &constants);
        assert_eq!(outcome.reaction, Some(ReactionKind::Superposition));
        let hit = outcome.transformative.unwrap();
        assert_eq!(hit.element, Element::Dendro);
        assert!(hit.crit);
        assert!((outcome.amplifier.unwrap() - 2.25).abs() < 1e-12);
        assert!(t.auras.get(Element::Dendro).is_none());
        assert!(t.auras.get(Element::Pyro).is_some());
    }

    #[test]
    fn test_swirl_on_locked_composite() {
        let constants = EngineConstants::default();
        let mut field = Field::new();
        let mut t = target();

        land(&mut t, Element::Hydro, &mut field, &constants);
        land(&mut t, Element::Electro, &mut field, &constants);

        // EC composite reacts through Hydro first
        let outcome = land(&mut t, Element::Anemo, &mut field, &constants);
        assert_eq!(outcome.reaction, Some(ReactionKind::HydroSwirl));
        let hit = outcome.transformative.unwrap();
        assert_eq!(hit.element, Element::Hydro);
        assert!((hit.aoe_radius - 3.0).abs() < f64::EPSILON);
        assert!((t.auras.get(Element::Electro).unwrap().units - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_imaginary_shift() {
        let constants = EngineConstants::default();
        let mut field = Field::new();
        let mut t = target();

        land(&mut t, Element::Cryo, &mut field, &constants);
        let outcome = land(&mut t, Element::Imaginary, &mut field, &constants);
        assert_eq!(outcome.reaction, Some(ReactionKind::Stasis));
        assert_eq!(outcome.timeline_shift, Some(0.25));
    }

    #[test]
    fn test_superconduct_debuff() {
        let constants = EngineConstants::default();
        let mut field = Field::new();
        let mut t = target();

        land(&mut t, Element::Cryo, &mut field, &constants);
        let outcome = land(&mut t, Element::Electro, &mut field, &constants);
        let debuff = outcome.debuff.unwrap();
        assert_eq!(debuff.duration, 2);
        assert_eq!(
            debuff.on_apply,
            vec![EffectPayload::ResistanceDelta {
                element: Element::Physical,
                amount: -0.4
            }]
        );
    }

    #[test]
    fn test_bloom_then_hyperbloom_once() {
        let constants = EngineConstants::default();
        let mut field = Field::new();
        let mut t = target();

        land(&mut t, Element::Hydro, &mut field, &constants);
        let bloom = land(&mut t, Element::Dendro, &mut field, &constants);
        assert_eq!(bloom.reaction, Some(ReactionKind::Bloom));
        let core = bloom.spawned_core.unwrap();

        let first = land(&mut t, Element::Electro, &mut field, &constants);
        let detonation = first.detonation.unwrap();
        assert_eq!(detonation.reaction, ReactionKind::Hyperbloom);
        assert_eq!(detonation.object, core);
        assert_eq!(detonation.damage, 4338);
        assert!(!field.get(core).unwrap().active);

        let second = land(&mut t, Element::Electro, &mut field, &constants);
        assert!(second.detonation.is_none());
    }

    #[test]
    fn test_locked_aura_rejects_refresh_on_no_reaction() {
        let constants = EngineConstants::default();
        let mut field = Field::new();
        let mut t = target();

        land(&mut t, Element::Dendro, &mut field, &constants);
        land(&mut t, Element::Electro, &mut field, &constants);
        // Geo has no reaction and no aura
        let outcome = land(&mut t, Element::Geo, &mut field, &constants);
        assert_eq!(outcome.aura_change, AuraChange::None);
        assert_eq!(t.auras.len(), 1);
    }

    #[test]
    fn test_rimegrass_leaves_frost_twined() {
        let constants = EngineConstants::default();
        let mut field = Field::new();
        let mut t = target();

        land(&mut t, Element::Dendro, &mut field, &constants);
        let outcome = land(&mut t, Element::Cryo, &mut field, &constants);
        assert_eq!(outcome.reaction, Some(ReactionKind::Rimegrass));

        assert_eq!(t.auras.len(), 2);
        let composite = t.auras.get(Element::Dendro).unwrap();
        assert!(composite.locked);
        assert_eq!(composite.name, "Rimegrass");

        let frost = t.auras.get(Element::Cryo).unwrap();
        assert_eq!(frost.name, "Frost-Twined");
        assert!(!frost.locked);
        assert!((frost.units - 5.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_hydro_on_frozen_refreezes_in_place() {
        let constants = EngineConstants::default();
        let mut field = Field::new();
        let mut t = target();

        land(&mut t, Element::Cryo, &mut field, &constants);
        land(&mut t, Element::Hydro, &mut field, &constants);
        t.frozen = false;

        for _ in 0..3 {
            let outcome = land(&mut t, Element::Hydro, &mut field, &constants);
            assert_eq!(outcome.reaction, Some(ReactionKind::Freeze));
            assert_eq!(outcome.reacted_with, Some(Element::Cryo));
            assert_eq!(outcome.aura_change, AuraChange::None);
        }
        assert!(t.frozen);
        assert_eq!(t.auras.len(), 1);
        assert!((t.auras.get(Element::Cryo).unwrap().units - 1.0).abs() < f64::EPSILON);
    }
}
