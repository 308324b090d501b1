//! Defense system - level-based defense and elemental resistance

mod level;
mod resistance;

pub use level::defense_multiplier;
pub use resistance::{resistance_multiplier, resistance_reduction_percent};

/// Defense calculation constants
pub mod constants {
    /// Level offset in the defense formula
    pub const LEVEL_OFFSET: f64 = 100.0;

    /// Resistance above this uses the diminishing 1 / (4·res + 1) curve
    pub const HIGH_RESISTANCE_THRESHOLD: f64 = 0.75;
}
