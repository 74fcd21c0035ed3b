//! Interactive constraint logic applied while options are edited.

pub mod exclusion;

pub use exclusion::{EXCLUSION_GROUPS, ExclusionEngine, ExclusionGroup, StateChange, apply_update};
