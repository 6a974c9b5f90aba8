//! CMake command construction.

use std::path::Path;

use crate::builder::config::BuildConfiguration;
use crate::util::process::ProcessBuilder;

/// Configuration used by multi-config generators (Visual Studio).
pub const MULTI_CONFIG: &str = "Release";

/// Target name CMake uses for the install step.
pub const INSTALL_TARGET: &str = "install";

/// CMake invocations for one project.
#[derive(Debug, Clone, Copy)]
pub struct CMakeCommands<'a> {
    cmake: &'a Path,
    configuration: &'a BuildConfiguration,
}

impl<'a> CMakeCommands<'a> {
    pub fn new(cmake: &'a Path, configuration: &'a BuildConfiguration) -> Self {
        CMakeCommands {
            cmake,
            configuration,
        }
    }

    /// `cmake <args> -B <build_dir> -S <source_dir>`
    pub fn configure(&self, source_dir: &Path, build_dir: &Path) -> ProcessBuilder {
        ProcessBuilder::new(self.cmake)
            .args(self.configuration.to_args())
            .arg("-B")
            .arg(build_dir)
            .arg("-S")
            .arg(source_dir)
    }

    /// `cmake <args> <source_dir>`, configuring into the working directory.
    pub fn configure_in_place(&self, source_dir: &Path) -> ProcessBuilder {
        ProcessBuilder::new(self.cmake)
            .args(self.configuration.to_args())
            .arg(source_dir)
    }

    /// `cmake --build <build_dir> --target <target> --config Release -- -m`
    ///
    /// `-m` asks MSBuild to build projects in parallel.
    pub fn build_target(&self, build_dir: &Path, target: &str) -> ProcessBuilder {
        ProcessBuilder::new(self.cmake)
            .arg("--build")
            .arg(build_dir)
            .args(["--target", target])
            .args(["--config", MULTI_CONFIG])
            .args(["--", "-m"])
    }
}
