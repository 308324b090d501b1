//! Elemental reactions - what happens when an element meets existing auras

mod formula;
mod kind;
mod resolver;
mod table;

pub use formula::{additive_bonus, amplifying_multiplier, transformative_damage};
pub use kind::{ReactionClass, ReactionKind};
pub use resolver::{
    apply_element, FieldDetonation, ReactionContext, ReactionOutcome, TransformativeHit,
};
pub use table::{binary_reaction, composite_rule, CompositeRule, COMPOSITE_RULES};
