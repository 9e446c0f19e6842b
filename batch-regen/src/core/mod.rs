//! Pure, deterministic logic for the regenerator.

pub mod platform;
pub mod predicate;
