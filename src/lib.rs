//! Stevedore - builds CMake-based native extensions for Python packages
//!
//! This crate provides the core library functionality for stevedore,
//! including environment probing, build planning, and execution.

pub mod builder;
pub mod core;
pub mod ops;
pub mod util;

/// Test utilities and mocks for stevedore unit tests.
///
/// This module is only available when compiling with `--cfg test` or
/// running tests. It provides a recording command runner and environment
/// fixtures.
#[cfg(test)]
pub mod test_support;

pub use crate::builder::{BuildError, BuildPlan};
pub use crate::core::{BuildEnvironment, Extension, HostOs, StagingPaths};
pub use crate::util::config::Manifest;
