//! Damage system - damage instances and the per-hit pipeline

mod calculation;
mod instance;
mod result;

pub use calculation::{base_damage, compute_damage};
pub use instance::DamageInstance;
pub use result::{DamageResult, ReactionHit};
