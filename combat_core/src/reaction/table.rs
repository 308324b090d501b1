//! Reaction decision tables

use super::kind::ReactionKind;
use crate::types::{AuraTag, Element};

/// Element pairs that merge into a locked composite aura
pub struct CompositeRule {
    pub name: &'static str,
    pub pair: (Element, Element),
    /// Element the composite shows
    pub face: Element,
    pub tag: AuraTag,
    pub reaction: ReactionKind,
}

pub const COMPOSITE_RULES: &[CompositeRule] = &[
    CompositeRule {
        name: "Quicken",
        pair: (Element::Dendro, Element::Electro),
        face: Element::Dendro,
        tag: AuraTag::Quicken,
        reaction: ReactionKind::Quicken,
    },
    CompositeRule {
        name: "Frozen",
        pair: (Element::Hydro, Element::Cryo),
        face: Element::Cryo,
        tag: AuraTag::Frozen,
        reaction: ReactionKind::Freeze,
    },
    CompositeRule {
        name: "Electro-Charged",
        pair: (Element::Electro, Element::Hydro),
        face: Element::Electro,
        tag: AuraTag::ElectroCharged,
        reaction: ReactionKind::ElectroCharged,
    },
    CompositeRule {
        name: "Burning",
        pair: (Element::Dendro, Element::Pyro),
        face: Element::Pyro,
        tag: AuraTag::Burning,
        reaction: ReactionKind::Burning,
    },
    CompositeRule {
        name: "Rimegrass",
        pair: (Element::Dendro, Element::Cryo),
        face: Element::Dendro,
        tag: AuraTag::Rimegrass,
        reaction: ReactionKind::Rimegrass,
    },
];

/// Composite formed by landing `incoming` on an aura of `existing`
pub fn composite_rule(existing: Element, incoming: Element) -> Option<&'static CompositeRule> {
    COMPOSITE_RULES.iter().find(|rule| {
        rule.pair == (existing, incoming) || rule.pair == (incoming, existing)
    })
}

/// (incoming, aura) pairs whose result depends on direction
const DIRECTIONAL: &[(Element, Element, ReactionKind)] = &[
    (Element::Pyro, Element::Hydro, ReactionKind::ForwardVaporize),
    (Element::Hydro, Element::Pyro, ReactionKind::ReverseVaporize),
    (Element::Cryo, Element::Pyro, ReactionKind::ForwardMelt),
    (Element::Pyro, Element::Cryo, ReactionKind::ReverseMelt),
];

/// Pairs that react the same way in either order
const SYMMETRIC: &[(Element, Element, ReactionKind)] = &[
    (Element::Electro, Element::Pyro, ReactionKind::Overload),
    (Element::Cryo, Element::Hydro, ReactionKind::Freeze),
    (Element::Electro, Element::Cryo, ReactionKind::Superconduct),
    (Element::Electro, Element::Hydro, ReactionKind::ElectroCharged),
    (Element::Pyro, Element::Dendro, ReactionKind::Burning),
    (Element::Dendro, Element::Hydro, ReactionKind::Bloom),
    (Element::Cryo, Element::Dendro, ReactionKind::Rimegrass),
    (Element::Electro, Element::Dendro, ReactionKind::Quicken),
    (Element::Anemo, Element::Pyro, ReactionKind::PyroSwirl),
    (Element::Anemo, Element::Hydro, ReactionKind::HydroSwirl),
    (Element::Anemo, Element::Electro, ReactionKind::ElectroSwirl),
    (Element::Anemo, Element::Cryo, ReactionKind::CryoSwirl),
    (Element::Imaginary, Element::Cryo, ReactionKind::Stasis),
    (Element::Imaginary, Element::Pyro, ReactionKind::Ignition),
    (Element::Imaginary, Element::Electro, ReactionKind::Impulse),
    (Element::Imaginary, Element::Hydro, ReactionKind::Anchor),
];

/// Reaction between an incoming element and one aura element
pub fn binary_reaction(incoming: Element, aura: Element) -> Option<ReactionKind> {
    DIRECTIONAL
        .iter()
        .find(|(i, a, _)| *i == incoming && *a == aura)
        .or_else(|| {
            SYMMETRIC.iter().find(|(a, b, _)| {
                (*a == incoming && *b == aura) || (*a == aura && *b == incoming)
            })
        })
        .map(|(_, _, kind)| *kind)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vaporize_direction() {
        assert_eq!(
            binary_reaction(Element::Pyro, Element::Hydro),
            Some(ReactionKind::ForwardVaporize)
        );
        assert_eq!(
            binary_reaction(Element::Hydro, Element::Pyro),
            Some(ReactionKind::ReverseVaporize)
        );
    }

    #[test]
    fn test_melt_direction() {
        assert_eq!(
            binary_reaction(Element::Cryo, Element::Pyro),
            Some(ReactionKind::ForwardMelt)
        );
        assert_eq!(
            binary_reaction(Element::Pyro, Element::Cryo),
            Some(ReactionKind::ReverseMelt)
        );
    }

    #[test]
    fn test_symmetric_pairs() {
        for (a, b, kind) in SYMMETRIC {
            assert_eq!(binary_reaction(*a, *b), Some(*kind));
            assert_eq!(binary_reaction(*b, *a), Some(*kind));
        }
    }

    #[test]
    fn test_no_reaction() {
        assert_eq!(binary_reaction(Element::Geo, Element::Pyro), None);
        assert_eq!(binary_reaction(Element::Pyro, Element::Pyro), None);
        assert_eq!(binary_reaction(Element::Anemo, Element::Dendro), None);
    }

    #[test]
    fn test_composite_either_order() {
        let a = composite_rule(Element::Hydro, Element::Cryo).unwrap();
        let b = composite_rule(Element::Cryo, Element::Hydro).unwrap();
        assert_eq!(a.name, "Frozen");
        assert_eq!(a.name, b.name);
        assert!(composite_rule(Element::Pyro, Element::Hydro).is_none());
    }
}
