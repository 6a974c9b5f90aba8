//! Build plan derivation.
//!
//! Turns a probed [`BuildEnvironment`] into the configure arguments and
//! parallelism flags of one build. Derivation is pure: the same environment
//! always yields the same plan.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::builder::config::{BuildConfiguration, CacheEntry};
use crate::builder::errors::BuildError;
use crate::builder::parallelism::ParallelismSpec;
use crate::core::environment::{
    BuildEnvironment, CMAKE_ARGS_VAR, MAKE_ARGS_VAR, RUNTIME_VERSION_VAR,
};
use crate::core::extension::{Extension, StagingPaths};
use crate::core::platform::HostOs;
use crate::core::runtime::{version_gated_entries, RuntimeVersion};
use crate::util::fs::absolute_path;

/// Base configuration used when no override is set.
pub const DEFAULT_BASE_CONFIGURATION: &str = "-DCMAKE_BUILD_TYPE=Release";

/// CUDA architectures the extension is compiled for.
pub const CUDA_ARCHITECTURES: &[&str] = &["80", "86", "89", "90", "120"];

/// Cache key carrying the interpreter path.
pub const PYTHON_EXECUTABLE_KEY: &str = "PYTHON_EXECUTABLE";

/// Everything needed to run one build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildPlan {
    /// Extension being built
    pub extension: Extension,
    /// Host the plan was derived for
    pub host: HostOs,
    /// Parsed runtime library version
    pub runtime_version: String,
    /// Root of the CMake project
    pub source_dir: PathBuf,
    /// Staging directories
    pub staging: StagingPaths,
    configuration: BuildConfiguration,
    parallelism: ParallelismSpec,
}

impl BuildPlan {
    /// Derive the plan for `ext` from a probed environment.
    ///
    /// Fails before anything runs if the runtime version is malformed or an
    /// interpreter path is needed but unknown.
    pub fn derive(
        ext: &Extension,
        env: &BuildEnvironment,
        source_dir: &Path,
        staging: &StagingPaths,
    ) -> Result<Self, BuildError> {
        let version = RuntimeVersion::parse(&env.runtime_version).map_err(|source| {
            BuildError::MalformedVersion {
                source,
                override_var: ext.env_var(RUNTIME_VERSION_VAR),
            }
        })?;

        let base = env
            .cmake_args
            .as_deref()
            .unwrap_or(DEFAULT_BASE_CONFIGURATION);
        let mut configuration = BuildConfiguration::parse(base).map_err(|source| {
            BuildError::MalformedConfiguration {
                source,
                override_var: ext.env_var(CMAKE_ARGS_VAR),
            }
        })?;

        if !configuration.contains_key(PYTHON_EXECUTABLE_KEY) {
            let python = env.python.as_ref().ok_or(BuildError::InterpreterNotFound)?;
            tracing::info!("Setting {} to {}", PYTHON_EXECUTABLE_KEY, python.display());
            configuration.set(CacheEntry::new(
                PYTHON_EXECUTABLE_KEY,
                python.display().to_string(),
            ));
        }

        for entry in derived_entries(ext, staging) {
            configuration.set(entry);
        }

        for entry in version_gated_entries(version) {
            configuration.set(entry);
        }

        let parallelism = ParallelismSpec::resolve(
            env.make_args.as_deref(),
            env.inherited_make_flags.as_deref(),
        );

        for note in parallelism_notes(ext, env.host, &parallelism) {
            tracing::info!("{}", note);
        }

        for entry in configuration.entries() {
            tracing::debug!("configure entry {}", entry);
        }

        Ok(BuildPlan {
            extension: ext.clone(),
            host: env.host,
            runtime_version: version.to_string(),
            source_dir: source_dir.to_path_buf(),
            staging: staging.clone(),
            configuration,
            parallelism,
        })
    }

    /// Configure arguments, read-only.
    pub fn configuration(&self) -> &BuildConfiguration {
        &self.configuration
    }

    pub fn parallelism(&self) -> &ParallelismSpec {
        &self.parallelism
    }

    /// Directory the install stage writes into.
    pub fn install_prefix(&self) -> PathBuf {
        absolute_path(&self.staging.install_prefix(&self.extension))
    }
}

/// Messages explaining the `-j4` fallback on make-based hosts.
///
/// Empty when an override or inherited flags were found, and on Windows,
/// where the job count is MSBuild's.
pub fn parallelism_notes(
    ext: &Extension,
    host: HostOs,
    parallelism: &ParallelismSpec,
) -> Vec<String> {
    if !parallelism.is_default() || host.is_windows() {
        return Vec::new();
    }

    vec![
        format!(
            "For fast compilation, run: export {}=\"-j\"",
            ext.env_var(MAKE_ARGS_VAR)
        ),
        format!("Setting make args to '{}'", parallelism.flags()),
    ]
}

/// Fixed entries that no base configuration can override.
fn derived_entries(ext: &Extension, staging: &StagingPaths) -> Vec<CacheEntry> {
    let prefix = absolute_path(&staging.install_prefix(ext));

    vec![
        CacheEntry::new(ext.tests_option.clone(), "OFF"),
        CacheEntry::new("CMAKE_INSTALL_PREFIX", prefix.display().to_string()),
        CacheEntry::new("CMAKE_CUDA_ARCHITECTURES", CUDA_ARCHITECTURES.join(";")),
        CacheEntry::new("CUDA", "ON"),
    ]
}
