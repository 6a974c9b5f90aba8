//! Extension descriptor and staging paths.

use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::Serialize;

use crate::util::config::ExtensionConfig;
use crate::util::fs::ensure_dir;

/// Runtime library queried when the manifest does not name one.
pub const DEFAULT_RUNTIME: &str = "torch";

/// A native extension built by an external CMake project.
///
/// Only names are carried: which sources make up the module is the CMake
/// project's business.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Extension {
    /// Package name
    pub name: String,
    /// CMake target that produces the module
    pub target: String,
    /// Subdirectory of the staging library root receiving the install
    pub install_dir: String,
    /// CMake option switching the project's tests
    pub tests_option: String,
    /// Python module providing the runtime library version
    pub runtime: String,
    /// Where to report build failures
    pub issues_url: Option<String>,
    /// Prefix of the environment overrides
    pub env_prefix: String,
}

impl Extension {
    /// Describe an extension using the default naming scheme.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Extension {
            target: format!("_{}", name),
            install_dir: name.clone(),
            tests_option: format!("{}_BUILD_TESTS", name),
            runtime: DEFAULT_RUNTIME.to_string(),
            issues_url: None,
            env_prefix: env_prefix_for(&name),
            name,
        }
    }

    /// Describe an extension from the manifest's `[extension]` table.
    pub fn from_config(config: &ExtensionConfig) -> Self {
        let mut ext = Extension::new(config.name.clone());

        if let Some(ref target) = config.target {
            ext.target = target.clone();
        }
        if let Some(ref install_dir) = config.install_dir {
            ext.install_dir = install_dir.clone();
        }
        if let Some(ref tests_option) = config.tests_option {
            ext.tests_option = tests_option.clone();
        }
        if let Some(ref runtime) = config.runtime {
            ext.runtime = runtime.clone();
        }
        if let Some(ref prefix) = config.env_prefix {
            ext.env_prefix = prefix.clone();
        }
        ext.issues_url = config.issues_url.clone();

        ext
    }

    /// Name of a prefixed environment variable, e.g. `KALDIFEAT_CMAKE_ARGS`.
    pub fn env_var(&self, suffix: &str) -> String {
        format!("{}_{}", self.env_prefix, suffix)
    }

    /// Set the issue tracker users are pointed at on failure.
    pub fn with_issues_url(mut self, url: impl Into<String>) -> Self {
        self.issues_url = Some(url.into());
        self
    }
}

/// Environment prefix derived from a package name.
fn env_prefix_for(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_uppercase() } else { '_' })
        .collect()
}

/// Directories supplied by the packaging tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StagingPaths {
    /// Temporary build tree root (e.g. `build/temp.linux-x86_64-3.8`)
    pub build_temp: PathBuf,
    /// Library tree root the install stage writes into
    /// (e.g. `build/lib.linux-x86_64-3.8`)
    pub build_lib: PathBuf,
}

impl StagingPaths {
    pub fn new(build_temp: impl Into<PathBuf>, build_lib: impl Into<PathBuf>) -> Self {
        StagingPaths {
            build_temp: build_temp.into(),
            build_lib: build_lib.into(),
        }
    }

    /// Create both directories if they are missing.
    pub fn ensure(&self) -> Result<()> {
        ensure_dir(&self.build_temp)?;
        ensure_dir(&self.build_lib)?;
        Ok(())
    }

    /// Where the install stage places the extension package.
    pub fn install_prefix(&self, ext: &Extension) -> PathBuf {
        self.build_lib.join(&ext.install_dir)
    }

    pub fn build_temp(&self) -> &Path {
        &self.build_temp
    }

    pub fn build_lib(&self) -> &Path {
        &self.build_lib
    }
}
