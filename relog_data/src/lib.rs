//! Shared data model for relog rule sets.

pub mod defs;
pub mod validate;

pub use defs::*;
pub use validate::{ValidationError, validate_rule_set};
