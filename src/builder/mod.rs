//! CMake extension builds.
//!
//! This module turns a probed environment into a build plan and drives the
//! external toolchain through it.

pub mod cmake;
pub mod config;
pub mod errors;
pub mod executor;
pub mod parallelism;
pub mod plan;
pub mod strategy;

pub use config::{BuildConfiguration, CacheEntry};
pub use errors::BuildError;
pub use executor::{BuildExecutor, CommandRunner, RunStatus, SystemRunner};
pub use parallelism::ParallelismSpec;
pub use plan::BuildPlan;
pub use strategy::{BuildSequence, BuildStep, BuildStrategy, Stage};
