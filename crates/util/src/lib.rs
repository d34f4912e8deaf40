//! json-delta-util - Value-level helpers for the json-delta engine.
//!
//! This crate provides the building blocks the diff/patch engine composes:
//! recursive value equality (with strict and tolerant number modes), deep
//! cloning, and a seeded random-JSON generator used by the property tests.

pub mod fuzzer;
pub mod json_clone;
pub mod json_equal;
pub mod json_random;

// Re-exports for convenience
pub use fuzzer::Fuzzer;
pub use json_clone::clone;
pub use json_equal::{deep_equal, value_equal};
pub use json_random::{NodeOdds, RandomJson, RandomJsonOptions};
