//! Project manifest support.
//!
//! A native source tree describes its extension in `Stevedore.toml`:
//!
//! ```toml
//! [extension]
//! name = "kaldifeat"
//! issues-url = "https://github.com/csukuangfj/kaldifeat/issues/new"
//! ```
//!
//! Every other field has a default derived from `name`.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use crate::util::fs::read_to_string;

/// File name of the project manifest.
pub const MANIFEST_FILE: &str = "Stevedore.toml";

/// Stevedore project manifest.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Manifest {
    /// Extension settings
    pub extension: ExtensionConfig,
}

/// The `[extension]` table.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ExtensionConfig {
    /// Package name (also the default install subdirectory)
    pub name: String,

    /// CMake target producing the extension module (default: `_<name>`)
    pub target: Option<String>,

    /// Subdirectory of the staging library root to install into
    pub install_dir: Option<String>,

    /// CMake option that toggles the project's test suite
    pub tests_option: Option<String>,

    /// Python module whose version gates the C++ standard (default: `torch`)
    pub runtime: Option<String>,

    /// Where users should report build failures
    pub issues_url: Option<String>,

    /// Prefix for environment overrides (default: uppercased name)
    pub env_prefix: Option<String>,
}

impl Manifest {
    /// Load a manifest from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = read_to_string(path).context("failed to read manifest")?;

        let manifest: Manifest = toml::from_str(&contents)
            .with_context(|| format!("failed to parse manifest: {}", path.display()))?;

        if manifest.extension.name.trim().is_empty() {
            bail!("`extension.name` must not be empty in {}", path.display());
        }

        Ok(manifest)
    }

    /// Load the manifest that sits at the root of a source tree.
    pub fn find_in(source_dir: &Path) -> Result<Self> {
        let path = manifest_path(source_dir);
        if !path.exists() {
            bail!(
                "no manifest found at {}\n\
                 \n\
                 Create a `{}` with an `[extension]` table naming the extension.",
                path.display(),
                MANIFEST_FILE
            );
        }

        Self::load(&path)
    }
}

/// Path of the manifest inside a source tree.
pub fn manifest_path(source_dir: &Path) -> PathBuf {
    source_dir.join(MANIFEST_FILE)
}
