//! Error types for the two fallible subsystems of this crate: geometry (the collision
//! math used by [`crate::layout::Layout::step`]) and configuration (registering masses
//! and constraints by name).
use thiserror::Error;

/// Failure of a geometric computation performed while applying a safe-distance bounce.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeometryError {
    #[error("movement segment does not intersect the safe-distance circle")]
    NoIntersection,
}

/// Failure while registering or resolving named masses and constraints.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("mass name {name:?} is already registered")]
    DuplicateMassName { name: String },
    #[error("constraint references unknown mass {name:?}")]
    UnknownMass { name: String },
    #[error("update_constraints requires a non-negative tag id, got {tag_id}")]
    TagIdNegativeOnUpdate { tag_id: i64 },
    #[error("update_constraints requires every constraint to share one tag id; expected {expected}, found {found}")]
    TagIdMismatch { expected: i64, found: i64 },
}
