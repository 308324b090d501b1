//! Target selection on the battlefield grid

use crate::combatant::Combatant;
use crate::types::{CombatantId, Position, Team};

/// Living members of `team` within `radius` of `center`, excluding `skip`
pub fn within_radius(
    units: &[Combatant],
    team: Team,
    center: Position,
    radius: f64,
    skip: Option<CombatantId>,
) -> Vec<CombatantId> {
    units
        .iter()
        .filter(|u| u.team == team && u.is_alive() && Some(u.id) != skip)
        .filter(|u| u.position.distance(&center) <= radius)
        .map(|u| u.id)
        .collect()
}

/// Living member of `team` closest to `point`, lowest id on ties
pub fn nearest(units: &[Combatant], team: Team, point: Position) -> Option<CombatantId> {
    units
        .iter()
        .filter(|u| u.team == team && u.is_alive())
        .min_by(|a, b| {
            a.position
                .distance(&point)
                .total_cmp(&b.position.distance(&point))
                .then(a.id.cmp(&b.id))
        })
        .map(|u| u.id)
}

/// First living member of `team` by id
pub fn first_living(units: &[Combatant], team: Team) -> Option<CombatantId> {
    units
        .iter()
        .find(|u| u.team == team && u.is_alive())
        .map(|u| u.id)
}

/// Living members of `team`
pub fn living(units: &[Combatant], team: Team) -> Vec<CombatantId> {
    units
        .iter()
        .filter(|u| u.team == team && u.is_alive())
        .map(|u| u.id)
        .collect()
}
