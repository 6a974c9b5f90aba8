//! Environment probe.
//!
//! Every environment read a build performs happens here, once, at the start
//! of the invocation. The resulting [`BuildEnvironment`] is then passed to
//! the plan builder and the executor; nothing downstream reads the process
//! environment again.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::Serialize;

use crate::core::extension::Extension;
use crate::core::platform::HostOs;
use crate::util::fs::normalize_path;
use crate::util::process::{find_cmake, find_python, ProcessBuilder};

/// Suffix of the base CMake arguments override.
pub const CMAKE_ARGS_VAR: &str = "CMAKE_ARGS";
/// Suffix of the explicit build-tool arguments override.
pub const MAKE_ARGS_VAR: &str = "MAKE_ARGS";
/// Suffix of the public-distribution flag.
pub const PUBLIC_DISTRIBUTION_VAR: &str = "IS_FOR_PYPI";
/// Suffix of the runtime library version override.
pub const RUNTIME_VERSION_VAR: &str = "RUNTIME_VERSION";
/// Suffix of the interpreter override.
pub const PYTHON_VAR: &str = "PYTHON";
/// Parallel-build flags inherited from a parent make.
pub const INHERITED_MAKE_FLAGS_VAR: &str = "MAKEFLAGS";
/// Location of the `cmake` executable.
pub const CMAKE_VAR: &str = "CMAKE";

/// A source of environment variables.
pub trait VarSource {
    /// Look up a variable; `None` when unset.
    fn var(&self, key: &str) -> Option<String>;
}

/// The real process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl VarSource for ProcessEnv {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

impl VarSource for HashMap<String, String> {
    fn var(&self, key: &str) -> Option<String> {
        self.get(key).cloned()
    }
}

/// Tool locations given on the command line; they win over the environment.
#[derive(Debug, Clone, Default)]
pub struct ToolOverrides {
    pub python: Option<PathBuf>,
    pub cmake: Option<PathBuf>,
}

/// Everything a build invocation needs to know about its environment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildEnvironment {
    /// Host operating system family
    pub host: HostOs,
    /// Installed runtime library version, unparsed
    pub runtime_version: String,
    /// Whether this build is for public distribution
    pub public_distribution: bool,
    /// Base CMake arguments override
    pub cmake_args: Option<String>,
    /// Explicit build-tool arguments
    pub make_args: Option<String>,
    /// Flags inherited through `MAKEFLAGS`
    pub inherited_make_flags: Option<String>,
    /// Interpreter handed to CMake as `PYTHON_EXECUTABLE`
    pub python: Option<PathBuf>,
    /// CMake executable
    pub cmake: PathBuf,
}

impl BuildEnvironment {
    /// Probe the environment for a build of `ext`.
    ///
    /// The runtime version comes from `<PREFIX>_RUNTIME_VERSION` when set,
    /// otherwise the interpreter is asked for it.
    pub fn capture(ext: &Extension, vars: &impl VarSource, tools: &ToolOverrides) -> Result<Self> {
        let python = resolve_python(ext, vars, tools);

        let runtime_version = match non_empty(vars.var(&ext.env_var(RUNTIME_VERSION_VAR))) {
            Some(version) => version,
            None => {
                let Some(ref python) = python else {
                    bail!(
                        "cannot determine the installed `{}` version: no Python interpreter found\n\
                         \n\
                         Pass `--python`, or set `{}`.",
                        ext.runtime,
                        ext.env_var(RUNTIME_VERSION_VAR)
                    );
                };
                query_runtime_version(python, &ext.runtime)?
            }
        };

        let cmake = tools
            .cmake
            .clone()
            .or_else(|| non_empty(vars.var(CMAKE_VAR)).map(PathBuf::from))
            .or_else(find_cmake)
            .unwrap_or_else(|| PathBuf::from("cmake"));

        let env = BuildEnvironment {
            host: HostOs::current(),
            runtime_version,
            public_distribution: is_public_distribution(ext, vars),
            cmake_args: non_empty(vars.var(&ext.env_var(CMAKE_ARGS_VAR))),
            make_args: non_empty(vars.var(&ext.env_var(MAKE_ARGS_VAR))),
            inherited_make_flags: non_empty(vars.var(INHERITED_MAKE_FLAGS_VAR)),
            python,
            cmake,
        };

        tracing::debug!(
            host = %env.host,
            runtime_version = %env.runtime_version,
            public_distribution = env.public_distribution,
            "probed build environment"
        );

        Ok(env)
    }

    /// Override the detected host.
    pub fn with_host(mut self, host: HostOs) -> Self {
        self.host = host;
        self
    }
}

/// Whether the public-distribution flag is set for `ext`.
///
/// Presence is what counts: any value, even empty or `0`, means true.
pub fn is_public_distribution(ext: &Extension, vars: &impl VarSource) -> bool {
    vars.var(&ext.env_var(PUBLIC_DISTRIBUTION_VAR)).is_some()
}

/// Ask an interpreter for `<module>.__version__`.
pub fn query_runtime_version(python: &Path, module: &str) -> Result<String> {
    let output = ProcessBuilder::new(python)
        .arg("-c")
        .arg(format!("import {module}; print({module}.__version__)"))
        .exec_and_check()
        .with_context(|| {
            format!(
                "failed to query the `{}` version with {}",
                module,
                python.display()
            )
        })?;

    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

fn resolve_python(ext: &Extension, vars: &impl VarSource, tools: &ToolOverrides) -> Option<PathBuf> {
    tools
        .python
        .clone()
        .or_else(|| non_empty(vars.var(&ext.env_var(PYTHON_VAR))).map(PathBuf::from))
        .or_else(find_python)
        .map(|p| normalize_path(&p))
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
