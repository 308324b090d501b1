//! Field objects - temporary battlefield entities spawned by reactions
//!
//! The only kind today is the Dendro Core left behind by Bloom. A core lives
//! for a fixed number of timeline slices and detonates when Electro
//! (Hyperbloom) or Pyro (Burgeon) lands close enough to it.

use crate::types::{CombatantId, Position};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FieldObjectId(pub u64);

impl fmt::Display for FieldObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "core-{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldObjectKind {
    DendroCore,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldObject {
    pub id: FieldObjectId,
    pub kind: FieldObjectKind,
    pub position: Position,
    /// Timeline slices left before it fizzles
    pub remaining: u32,
    pub active: bool,
    pub creator: CombatantId,
}

/// All field objects of a battle
#[derive(Debug, Clone, Default)]
pub struct Field {
    objects: Vec<FieldObject>,
    next_id: u64,
}

impl Field {
    pub fn new() -> Self {
        Field {
            objects: Vec::new(),
            next_id: 0,
        }
    }

    /// Place a Dendro Core
    pub fn spawn_core(&mut self, position: Position, creator: CombatantId, lifetime: u32) -> FieldObjectId {
        let id = FieldObjectId(self.next_id);
        self.next_id += 1;
        self.objects.push(FieldObject {
            id,
            kind: FieldObjectKind::DendroCore,
            position,
            remaining: lifetime,
            active: lifetime > 0,
            creator,
        });
        debug!(core = %id, x = position.x, y = position.y, lifetime, "dendro core spawned");
        id
    }

    pub fn get(&self, id: FieldObjectId) -> Option<&FieldObject> {
        self.objects.iter().find(|o| o.id == id)
    }

    pub fn active(&self) -> impl Iterator<Item = &FieldObject> {
        self.objects.iter().filter(|o| o.active)
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Nearest active core within `proximity` of `position` (oldest on ties)
    pub fn detonation_candidate(&self, position: Position, proximity: f64) -> Option<&FieldObject> {
        self.active()
            .map(|o| (o, o.position.distance(&position)))
            .filter(|(_, d)| *d <= proximity)
            .min_by(|(_, a), (_, b)| a.total_cmp(b))
            .map(|(o, _)| o)
    }

    pub fn deactivate(&mut self, id: FieldObjectId) {
        if let Some(object) = self.objects.iter_mut().find(|o| o.id == id) {
            object.active = false;
        }
    }

    /// One timeline slice passed for this object; returns false once it
    /// is no longer active
    pub fn tick(&mut self, id: FieldObjectId) -> bool {
        let Some(object) = self.objects.iter_mut().find(|o| o.id == id) else {
            return false;
        };
        if !object.active {
            return false;
        }
        object.remaining = object.remaining.saturating_sub(1);
        if object.remaining == 0 {
            object.active = false;
            debug!(core = %id, "dendro core fizzled");
        }
        object.active
    }

    /// Drop inactive objects, returning their ids
    pub fn prune(&mut self) -> Vec<FieldObjectId> {
        let removed: Vec<_> = self
            .objects
            .iter()
            .filter(|o| !o.active)
            .map(|o| o.id)
            .collect();
        self.objects.retain(|o| o.active);
        removed
    }
}
