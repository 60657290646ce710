//! Common test utilities for Sheaf integration and scenario tests.
//!
//! This module provides:
//! - `TestEnv`: an isolated project in a temp directory plus a CLI runner
//! - Assertion macros: `assert_emitted!`, `assert_output_contains!`
//! - Fixtures: small projects reused across tests

#![allow(dead_code)]

pub mod assertions;
pub mod env;
pub mod fixtures;

pub use assertions::*;
pub use env::*;
pub use fixtures::*;
