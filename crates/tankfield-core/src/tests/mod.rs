//! Test module for determinism, integration and property tests.
//!
//! This module exercises the Entity-Plugin-Resolver pipeline end to end:
//! - **Determinism tests**: same seed and inputs produce the same world
//! - **Integration tests**: scenarios driven through `Simulation::step`
//! - **Property tests**: invariants over generated inputs
//! - **Helper functions**: utilities for test setup
//!
//! # Test Structure
//!
//! - `determinism.rs`: Tests that verify deterministic execution
//! - `integration.rs`: End-to-end tests of the simulation
//! - `properties.rs`: `proptest` suites
//! - `helpers.rs`: Test setup utilities and factory functions

mod helpers;
mod properties;

// Re-export for convenience
pub use helpers::*;
