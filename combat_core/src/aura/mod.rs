//! Aura state - elemental markers carried by a combatant
//!
//! Auras are kept in application order; reaction lookups walk them oldest
//! first, so the container is a `Vec`, never a set.

use crate::types::{AuraTag, Element};
use serde::{Deserialize, Serialize};

/// One elemental marker on a target
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Aura {
    /// Display name ("Hydro", "Quicken", ...)
    pub name: String,
    /// Face-up element
    pub element: Element,
    /// Remaining strength; consumed by reactions, decayed by time
    pub units: f64,
    /// Ticks left before unit decay starts
    pub duration: u32,
    /// Units lost per tick once duration is exhausted
    pub decay_rate: f64,
    /// Composite auras are locked: no refresh, no time decay
    pub locked: bool,
    /// Constituent elements of a composite, existing element first
    pub source_elements: Vec<Element>,
    pub tags: Vec<AuraTag>,
}

impl Aura {
    /// Plain single-element aura
    pub fn new(element: Element, units: f64, duration: u32, decay_rate: f64) -> Self {
        Aura {
            name: element.name().to_string(),
            element,
            units: units.max(0.0),
            duration,
            decay_rate,
            locked: false,
            source_elements: Vec::new(),
            tags: Vec::new(),
        }
    }

    /// Locked aura representing an ongoing reaction state
    pub fn composite(
        name: &str,
        element: Element,
        source_elements: Vec<Element>,
        tag: AuraTag,
        units: f64,
        duration: u32,
    ) -> Self {
        Aura {
            name: name.to_string(),
            element,
            units: units.max(0.0),
            duration,
            decay_rate: 0.0,
            locked: true,
            source_elements,
            tags: vec![tag],
        }
    }

    /// Elements this aura can react through
    pub fn reacts_via(&self) -> &[Element] {
        if self.source_elements.is_empty() {
            std::slice::from_ref(&self.element)
        } else {
            &self.source_elements
        }
    }

    pub fn is_composite(&self) -> bool {
        self.source_elements.len() > 1
    }

    pub fn has_tag(&self, tag: AuraTag) -> bool {
        self.tags.contains(&tag)
    }

    pub fn is_tagged(&self) -> bool {
        !self.tags.is_empty()
    }

    pub fn is_expired(&self) -> bool {
        self.units <= 0.0 || self.duration == 0
    }

    /// Advance one tick. Returns true once the aura has expired.
    pub fn decay(&mut self) -> bool {
        if self.locked {
            return false;
        }
        if self.duration > 0 {
            self.duration -= 1;
        } else {
            self.units = (self.units - self.decay_rate).max(0.0);
        }
        self.is_expired()
    }
}

/// What happened to the target's auras when an element landed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AuraChange {
    None,
    Created(Element),
    Refreshed(Element),
    /// A locked aura with this face-up element refused the refresh
    Rejected(Element),
    /// Two auras merged into a locked composite
    Composite { name: String, removed: Vec<Element> },
    /// Units removed from the reacted aura
    Consumed { element: Element, units: f64, removed: bool },
}

/// Ordered aura collection owned by a combatant
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuraSet {
    auras: Vec<Aura>,
}

impl AuraSet {
    pub fn new() -> Self {
        AuraSet { auras: Vec::new() }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Aura> {
        self.auras.iter()
    }

    pub fn as_slice(&self) -> &[Aura] {
        &self.auras
    }

    pub fn len(&self) -> usize {
        self.auras.len()
    }

    pub fn is_empty(&self) -> bool {
        self.auras.is_empty()
    }

    pub fn get(&self, element: Element) -> Option<&Aura> {
        self.auras.iter().find(|a| a.element == element)
    }

    pub fn get_index(&self, index: usize) -> Option<&Aura> {
        self.auras.get(index)
    }

    pub fn has_tag(&self, tag: AuraTag) -> bool {
        self.auras.iter().any(|a| a.has_tag(tag))
    }

    pub fn push(&mut self, aura: Aura) {
        self.auras.push(aura);
    }

    /// Remove every unlocked aura whose face-up element is in `elements`
    pub fn remove_unlocked(&mut self, elements: &[Element]) -> Vec<Element> {
        let mut removed = Vec::new();
        self.auras.retain(|a| {
            if !a.locked && elements.contains(&a.element) {
                removed.push(a.element);
                false
            } else {
                true
            }
        });
        removed
    }

    /// Create an aura for `element` or refresh the existing one
    ///
    /// Refreshing raises units to at least `units` and resets duration.
    /// A locked aura showing the same element rejects the refresh.
    pub fn refresh_or_insert(
        &mut self,
        element: Element,
        units: f64,
        duration: u32,
        decay_rate: f64,
    ) -> AuraChange {
        if let Some(existing) = self.auras.iter_mut().find(|a| a.element == element) {
            if existing.locked {
                return AuraChange::Rejected(element);
            }
            existing.units = existing.units.max(units);
            existing.duration = duration;
            return AuraChange::Refreshed(element);
        }
        self.auras.push(Aura::new(element, units, duration, decay_rate));
        AuraChange::Created(element)
    }

    /// Remove `units` from the aura at `index`, deleting it when drained
    pub fn consume(&mut self, index: usize, units: f64) -> AuraChange {
        let Some(aura) = self.auras.get_mut(index) else {
            return AuraChange::None;
        };
        let element = aura.element;
        aura.units = (aura.units - units).max(0.0);
        let removed = aura.units <= 0.0;
        if removed {
            self.auras.remove(index);
        }
        AuraChange::Consumed {
            element,
            units,
            removed,
        }
    }

    /// End-of-turn housekeeping; returns the auras that expired
    pub fn decay_all(&mut self) -> Vec<Aura> {
        let mut expired = Vec::new();
        let mut kept = Vec::with_capacity(self.auras.len());
        for mut aura in self.auras.drain(..) {
            if aura.decay() {
                expired.push(aura);
            } else {
                kept.push(aura);
            }
        }
        self.auras = kept;
        expired
    }

    pub fn clear(&mut self) {
        self.auras.clear();
    }
}
