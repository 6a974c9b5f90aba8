//! Core data structures for stevedore.
//!
//! This module contains the foundational types used throughout stevedore:
//! - The extension descriptor and its staging directories
//! - The probed build environment
//! - Host and runtime library versions

pub mod environment;
pub mod extension;
pub mod platform;
pub mod runtime;

pub use environment::{BuildEnvironment, ProcessEnv, ToolOverrides, VarSource};
pub use extension::{Extension, StagingPaths};
pub use platform::HostOs;
pub use runtime::RuntimeVersion;
