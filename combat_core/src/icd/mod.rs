//! Internal cooldown - throttles how often an attacker's hits apply their element
//!
//! Counters are owned by the attacker and keyed by (defender, tag). The first
//! hit on a fresh key applies and primes the counter to 1; each later hit
//! bumps the counter and is suppressed, until the counter reaches the
//! interval and wraps back to 0 so the next hit applies again.

use crate::types::CombatantId;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IcdTracker {
    counters: HashMap<(CombatantId, String), u32>,
}

impl IcdTracker {
    pub fn new() -> Self {
        IcdTracker {
            counters: HashMap::new(),
        }
    }

    /// Register a hit and report whether it may apply its element
    ///
    /// An empty tag is never throttled.
    pub fn permit(&mut self, defender: CombatantId, tag: &str, interval: u32) -> bool {
        if tag.is_empty() {
            return true;
        }
        let interval = interval.max(1);
        let counter = self
            .counters
            .entry((defender, tag.to_string()))
            .or_insert(0);

        if *counter == 0 {
            *counter = 1;
            // interval 1 never suppresses
            if interval == 1 {
                *counter = 0;
            }
            return true;
        }

        *counter += 1;
        if *counter >= interval {
            *counter = 0;
        }
        false
    }

    /// Current counter for a key (0 when unseen)
    pub fn counter(&self, defender: CombatantId, tag: &str) -> u32 {
        self.counters
            .get(&(defender, tag.to_string()))
            .copied()
            .unwrap_or(0)
    }

    /// Forget every counter against a defender (used when it leaves combat)
    pub fn forget(&mut self, defender: CombatantId) {
        self.counters.retain(|(d, _), _| *d != defender);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pattern(interval: u32, hits: usize) -> Vec<bool> {
        let mut icd = IcdTracker::new();
        (0..hits)
            .map(|_| icd.permit(CombatantId(1), "na", interval))
            .collect()
    }

    #[test]
    fn test_interval_three() {
        assert_eq!(
            pattern(3, 7),
            vec![true, false, false, true, false, false, true]
        );
    }

    #[test]
    fn test_interval_one_always_applies() {
        assert!(pattern(1, 5).iter().all(|p| *p));
    }

    #[test]
    fn test_keys_are_independent() {
        let mut icd = IcdTracker::new();
        assert!(icd.permit(CombatantId(1), "skill", 3));
        assert!(icd.permit(CombatantId(2), "skill", 3));
        assert!(icd.permit(CombatantId(1), "burst", 3));
        assert!(!icd.permit(CombatantId(1), "skill", 3));
    }

    #[test]
    fn test_empty_tag_never_throttled() {
        let mut icd = IcdTracker::new();
        for _ in 0..5 {
            assert!(icd.permit(CombatantId(0), "", 3));
        }
    }

    #[test]
    fn test_forget_resets_counters() {
        let mut icd = IcdTracker::new();
        icd.permit(CombatantId(4), "na", 3);
        assert_eq!(icd.counter(CombatantId(4), "na"), 1);
        icd.forget(CombatantId(4));
        assert_eq!(icd.counter(CombatantId(4), "na"), 0);
    }
}
