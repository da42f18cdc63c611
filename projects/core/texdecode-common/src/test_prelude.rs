//! Common test imports and utilities for texdecode-common tests
//!
//! This module provides a common prelude for test modules to avoid
//! duplicate imports across the codebase.
#![allow(unused_imports)]

pub use rstest::rstest;

/// Installs `env_logger` once so `log` output shows up under `cargo test -- --nocapture`.
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}
