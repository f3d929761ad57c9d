//! Conformance validators.

pub mod cases;
pub mod equivalence;
pub mod negative;
pub mod oracle;
pub mod resolver;
