//! Scenario tests for Sheaf.
//!
//! Scenarios test complete user workflows end-to-end.
//!
//! Run with: cargo test --test scenarios

mod common;

#[path = "scenarios/code_splitting.rs"]
mod code_splitting;

#[path = "scenarios/production_release.rs"]
mod production_release;
