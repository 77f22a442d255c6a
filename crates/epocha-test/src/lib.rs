//! Epocha Test Harness - randomized edit sequences and shared fixtures
//!
//! This crate provides:
//! - Scenario fixtures (the reference instant, US Central sessions)
//! - An edit fuzzer that drives a session with valid, malformed and
//!   visibility events and checks the synchronization invariants after
//!   every step

pub mod edit_fuzzer;
pub mod scenarios;

pub use edit_fuzzer::*;
pub use scenarios::*;
