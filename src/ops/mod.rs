//! High-level operations.
//!
//! This module contains the implementation of stevedore commands.

pub mod build_ext;
pub mod purity;

pub use build_ext::{
    build_extension, build_with, plan_extension, plan_with, BuildExtOptions, PlanReport,
};
pub use purity::{package_purity, purity_for, PackagePurity};
