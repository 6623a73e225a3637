//! Pure computation engines.
//!
//! # Responsibility
//! - Host side-effect-free domain algorithms consumed by services.
//!
//! # Invariants
//! - Nothing in this module performs I/O or reads the wall clock.

pub mod recurrence;
