//! Screen-specific content rendering.

pub mod roster;
pub mod student;
