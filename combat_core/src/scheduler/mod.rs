//! AV turn scheduler - continuous-time priority queue of actors
//!
//! Every actor sits on the timeline at an action value (AV). An actor with
//! speed `s` comes up once every `base_turn_value / s` AV. Ties are broken
//! by insertion order.

use crate::config::SchedulerConstants;
use crate::events::BuffTimerId;
use crate::field::FieldObjectId;
use crate::types::CombatantId;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};
use std::fmt;
use thiserror::Error;

/// Scheduler failure
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SchedulerError {
    #[error("Timeline is empty: no actor left to schedule")]
    EmptyTimeline,
}

/// Anything that takes turns on the timeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Actor {
    Combatant(CombatantId),
    BuffTimer(BuffTimerId),
    FieldObject(FieldObjectId),
}

impl fmt::Display for Actor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Actor::Combatant(id) => write!(f, "{}", id),
            Actor::BuffTimer(id) => write!(f, "{}", id),
            Actor::FieldObject(id) => write!(f, "{}", id),
        }
    }
}

/// Live cadence of actors, read every time one is re-enqueued
pub trait SpeedSource {
    fn speed(&self, actor: &Actor) -> f64;
}

/// Fixed speed table
#[derive(Debug, Clone, Default)]
pub struct SpeedTable {
    speeds: HashMap<Actor, f64>,
    fallback: f64,
}

impl SpeedTable {
    pub fn new(fallback: f64) -> Self {
        SpeedTable {
            speeds: HashMap::new(),
            fallback,
        }
    }

    pub fn set(&mut self, actor: Actor, speed: f64) {
        self.speeds.insert(actor, speed);
    }
}

impl SpeedSource for SpeedTable {
    fn speed(&self, actor: &Actor) -> f64 {
        self.speeds.get(actor).copied().unwrap_or(self.fallback)
    }
}

#[derive(Debug, Clone, Copy)]
struct Entry {
    time: f64,
    sequence: u64,
    actor: Actor,
    /// Delayed or advanced since it was enqueued
    shifted: bool,
}

impl PartialEq for Entry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Entry {}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Entry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed: BinaryHeap is a max-heap
        other
            .time
            .total_cmp(&self.time)
            .then(other.sequence.cmp(&self.sequence))
    }
}

/// One upcoming slot, for turn-order display
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineSlot {
    pub actor: Actor,
    pub time: f64,
    /// AV left until the slot comes up
    pub av_remaining: f64,
    /// The slot was delayed or advanced after being enqueued
    pub shifted: bool,
}

#[derive(Debug, Clone)]
pub struct Scheduler {
    heap: BinaryHeap<Entry>,
    clock: f64,
    sequence: u64,
    base_turn_value: f64,
    timer_offset: f64,
}

impl Scheduler {
    pub fn new(constants: &SchedulerConstants) -> Self {
        Scheduler {
            heap: BinaryHeap::new(),
            clock: 0.0,
            sequence: 0,
            base_turn_value: constants.base_turn_value,
            timer_offset: constants.buff_timer_offset,
        }
    }

    /// AV between two turns at `speed` (speed floored at 1)
    pub fn cycle(&self, speed: f64) -> f64 {
        self.base_turn_value / speed.max(1.0)
    }

    pub fn clock(&self) -> f64 {
        self.clock
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    fn push(&mut self, actor: Actor, time: f64) {
        self.heap.push(Entry {
            time,
            sequence: self.sequence,
            actor,
            shifted: false,
        });
        self.sequence += 1;
    }

    /// Enqueue one cycle from now; buff timers get an extra offset so
    /// they resolve after the turn that created them
    pub fn add(&mut self, actor: Actor, speed: f64) {
        let mut time = self.clock + self.cycle(speed);
        if matches!(actor, Actor::BuffTimer(_)) {
            time += self.timer_offset;
        }
        self.push(actor, time);
    }

    /// Pop the next actor, advance the clock and re-enqueue the actor one
    /// cycle later at its current speed
    pub fn pop_next(&mut self, speeds: &impl SpeedSource) -> Result<Actor, SchedulerError> {
        let entry = self.heap.pop().ok_or(SchedulerError::EmptyTimeline)?;
        self.clock = entry.time;
        let next = self.clock + self.cycle(speeds.speed(&entry.actor));
        self.push(entry.actor, next);
        Ok(entry.actor)
    }

    /// Move the actor's next slot by `percent` of its cycle (positive
    /// delays). Never moves it before the current clock. Returns false
    /// when the actor is not scheduled.
    pub fn delay_by_percent(&mut self, actor: Actor, percent: f64, speeds: &impl SpeedSource) -> bool {
        let shift = percent * self.cycle(speeds.speed(&actor));
        let clock = self.clock;

        let mut entries = std::mem::take(&mut self.heap).into_vec();
        let next = entries
            .iter_mut()
            .filter(|e| e.actor == actor)
            .min_by(|a, b| a.time.total_cmp(&b.time).then(a.sequence.cmp(&b.sequence)));
        let found = match next {
            Some(entry) => {
                let moved = (entry.time + shift).max(clock).max(0.0);
                entry.shifted |= moved != entry.time;
                entry.time = moved;
                true
            }
            None => false,
        };
        self.heap = BinaryHeap::from(entries);
        found
    }

    /// Purge every entry of the actor; returns whether any existed
    pub fn remove(&mut self, actor: Actor) -> bool {
        let before = self.heap.len();
        self.heap.retain(|e| e.actor != actor);
        self.heap.len() != before
    }

    pub fn contains(&self, actor: Actor) -> bool {
        self.heap.iter().any(|e| e.actor == actor)
    }

    /// Time of the actor's next slot
    pub fn next_time(&self, actor: Actor) -> Option<f64> {
        self.heap
            .iter()
            .filter(|e| e.actor == actor)
            .map(|e| e.time)
            .min_by(|a, b| a.total_cmp(b))
    }

    /// Upcoming slots in pop order
    pub fn preview(&self, limit: usize) -> Vec<TimelineSlot> {
        let mut entries: Vec<Entry> = self.heap.iter().copied().collect();
        // Entry ordering is reversed, so sort descending for earliest first
        entries.sort_by(|a, b| b.cmp(a));
        entries
            .into_iter()
            .take(limit)
            .map(|e| TimelineSlot {
                actor: e.actor,
                time: e.time,
                av_remaining: (e.time - self.clock).max(0.0),
                shifted: e.shifted,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scheduler() -> Scheduler {
        Scheduler::new(&SchedulerConstants::default())
    }

    fn hero(id: usize) -> Actor {
        Actor::Combatant(CombatantId(id))
    }

    #[test]
    fn test_empty_timeline_is_an_error() {
        let mut s = scheduler();
        let speeds = SpeedTable::new(100.0);
        assert_eq!(s.pop_next(&speeds), Err(SchedulerError::EmptyTimeline));
    }

    #[test]
    fn test_faster_actor_acts_twice_as_often() {
        let mut s = scheduler();
        let mut speeds = SpeedTable::new(100.0);
        speeds.set(hero(1), 200.0);
        s.add(hero(0), 100.0);
        s.add(hero(1), 200.0);

        let mut counts = [0usize; 2];
        for _ in 0..30 {
            if let Actor::Combatant(id) = s.pop_next(&speeds).unwrap() {
                counts[id.0] += 1;
            }
        }
        assert_eq!(counts, [10, 20]);
    }

    #[test]
    fn test_ties_resolve_in_insertion_order() {
        let mut s = scheduler();
        let speeds = SpeedTable::new(100.0);
        s.add(hero(3), 100.0);
        s.add(hero(1), 100.0);
        s.add(hero(2), 100.0);

        assert_eq!(s.pop_next(&speeds).unwrap(), hero(3));
        assert_eq!(s.pop_next(&speeds).unwrap(), hero(1));
        assert_eq!(s.pop_next(&speeds).unwrap(), hero(2));
    }

    #[test]
    fn test_delay_and_advance() {
        let mut s = scheduler();
        let speeds = SpeedTable::new(100.0);
        s.add(hero(0), 100.0);
        let before = s.next_time(hero(0)).unwrap();

        assert!(s.delay_by_percent(hero(0), 0.25, &speeds));
        let delayed = s.next_time(hero(0)).unwrap();
        assert!((delayed - before - 25.0).abs() < 1e-9);

        assert!(s.delay_by_percent(hero(0), -0.5, &speeds));
        let advanced = s.next_time(hero(0)).unwrap();
        assert!(advanced < delayed);
        assert!((advanced - 75.0).abs() < 1e-9);
    }

    #[test]
    fn test_advance_clamps_at_clock() {
        let mut s = scheduler();
        let speeds = SpeedTable::new(100.0);
        s.add(hero(0), 100.0);
        s.delay_by_percent(hero(0), -5.0, &speeds);
        assert!((s.next_time(hero(0)).unwrap()).abs() < 1e-9);
    }

    #[test]
    fn test_missing_actor_is_a_noop() {
        let mut s = scheduler();
        let speeds = SpeedTable::new(100.0);
        assert!(!s.delay_by_percent(hero(9), 0.5, &speeds));
        assert!(!s.remove(hero(9)));
    }

    #[test]
    fn test_remove_purges_actor() {
        let mut s = scheduler();
        let speeds = SpeedTable::new(100.0);
        s.add(hero(0), 100.0);
        s.add(hero(1), 100.0);
        assert!(s.remove(hero(0)));
        assert!(!s.contains(hero(0)));
        assert_eq!(s.pop_next(&speeds).unwrap(), hero(1));
    }

    #[test]
    fn test_buff_timer_offset() {
        let mut s = scheduler();
        let timer = Actor::BuffTimer(BuffTimerId(0));
        s.add(hero(0), 100.0);
        s.add(timer, 100.0);
        assert!((s.next_time(timer).unwrap() - 150.0).abs() < 1e-9);

        let speeds = SpeedTable::new(100.0);
        assert_eq!(s.pop_next(&speeds).unwrap(), hero(0));
        assert_eq!(s.pop_next(&speeds).unwrap(), timer);
    }

    #[test]
    fn test_speed_change_applies_on_requeue() {
        let mut s = scheduler();
        let mut speeds = SpeedTable::new(100.0);
        s.add(hero(0), 100.0);
        speeds.set(hero(0), 50.0);

        s.pop_next(&speeds).unwrap();
        // popped at 100, next cycle at speed 50 is 200 AV
        assert!((s.next_time(hero(0)).unwrap() - 300.0).abs() < 1e-9);
    }

    #[test]
    fn test_preview_is_ordered() {
        let mut s = scheduler();
        s.add(hero(0), 50.0);
        s.add(hero(1), 200.0);
        s.add(hero(2), 100.0);

        let slots = s.preview(2);
        assert_eq!(slots.len(), 2);
        assert_eq!(slots[0].actor, hero(1));
        assert_eq!(slots[1].actor, hero(2));
        assert!((slots[0].av_remaining - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_preview_marks_moved_slots() {
        let mut s = scheduler();
        let speeds = SpeedTable::new(100.0);
        s.add(hero(0), 100.0);
        s.add(hero(1), 100.0);
        s.add(hero(2), 100.0);

        s.delay_by_percent(hero(0), 0.5, &speeds);
        s.delay_by_percent(hero(1), -0.2, &speeds);
        // zero shift leaves the slot where it was
        s.delay_by_percent(hero(2), 0.0, &speeds);

        let slots = s.preview(3);
        let moved: Vec<(Actor, bool)> = slots.iter().map(|slot| (slot.actor, slot.shifted)).collect();
        assert_eq!(moved, vec![(hero(1), true), (hero(2), false), (hero(0), true)]);

        // the requeued slot after a turn starts clean
        assert_eq!(s.pop_next(&speeds).unwrap(), hero(1));
        let requeued = s
            .preview(3)
            .into_iter()
            .find(|slot| slot.actor == hero(1))
            .unwrap();
        assert!(!requeued.shifted);
    }
}
