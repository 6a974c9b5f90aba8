//! Test fixtures for common test scenarios.

use std::path::{Path, PathBuf};

use crate::core::environment::BuildEnvironment;
use crate::core::platform::HostOs;
use crate::util::config::MANIFEST_FILE;

/// Builder for a probed [`BuildEnvironment`] without touching the process
/// environment.
#[derive(Debug, Clone)]
pub struct EnvFixture {
    env: BuildEnvironment,
}

impl EnvFixture {
    /// A Linux host with `python3` and `cmake` in `/usr/bin`.
    pub fn linux(runtime_version: &str) -> Self {
        EnvFixture {
            env: BuildEnvironment {
                host: HostOs::Linux,
                runtime_version: runtime_version.to_string(),
                public_distribution: false,
                cmake_args: None,
                make_args: None,
                inherited_make_flags: None,
                python: Some(PathBuf::from("/usr/bin/python3")),
                cmake: PathBuf::from("/usr/bin/cmake"),
            },
        }
    }

    pub fn host(mut self, host: HostOs) -> Self {
        self.env.host = host;
        self
    }

    pub fn cmake_args(mut self, args: &str) -> Self {
        self.env.cmake_args = Some(args.to_string());
        self
    }

    pub fn make_args(mut self, args: &str) -> Self {
        self.env.make_args = Some(args.to_string());
        self
    }

    pub fn makeflags(mut self, flags: &str) -> Self {
        self.env.inherited_make_flags = Some(flags.to_string());
        self
    }

    pub fn public_distribution(mut self, public: bool) -> Self {
        self.env.public_distribution = public;
        self
    }

    pub fn without_python(mut self) -> Self {
        self.env.python = None;
        self
    }

    pub fn build(self) -> BuildEnvironment {
        self.env
    }
}

/// Write a minimal `Stevedore.toml` into `dir`.
pub fn write_manifest(dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(MANIFEST_FILE);
    let contents = format!(
        "[extension]\nname = \"{name}\"\nissues-url = \"https://example.org/{name}/issues/new\"\n"
    );
    std::fs::write(&path, contents).expect("write manifest");
    path
}
