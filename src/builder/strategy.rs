//! Platform-specific build sequences.
//!
//! Windows generators are multi-config projects driven through
//! `cmake --build`, one stage at a time. Everywhere else the build runs as a
//! single shell invocation of `cmake` followed by `make`, so its stages are
//! not observable separately and a failure is reported for the whole
//! sequence.

use std::fmt;
use std::path::Path;

use serde::Serialize;

use crate::builder::cmake::{CMakeCommands, INSTALL_TARGET};
use crate::builder::plan::BuildPlan;
use crate::core::platform::HostOs;
use crate::util::process::{shell_quote, ProcessBuilder};

/// Build tool invoked by the make-based sequence.
pub const MAKE_PROGRAM: &str = "make";

/// Shell running the make-based sequence.
pub const POSIX_SHELL: &str = "sh";

/// Stage a step belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Stage {
    Configure,
    Build,
    Install,
    /// Configure, build and install in one shell invocation.
    Composite,
}

impl Stage {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Stage::Configure => "configure",
            Stage::Build => "build",
            Stage::Install => "install",
            Stage::Composite => "composite",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One external invocation and the stage it performs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildStep {
    pub stage: Stage,
    pub command: ProcessBuilder,
}

/// How the external toolchain is driven.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum BuildStrategy {
    /// Visual Studio style: configure, build target, build `install`.
    ProjectBased,
    /// Makefiles: one shell invocation doing everything.
    MakeBased,
}

impl BuildStrategy {
    /// The strategy used on `host`.
    pub fn for_host(host: HostOs) -> Self {
        if host.is_windows() {
            BuildStrategy::ProjectBased
        } else {
            BuildStrategy::MakeBased
        }
    }

    /// Lay out the steps for `plan`.
    pub fn sequence(&self, plan: &BuildPlan, cmake: &Path) -> BuildSequence {
        let commands = CMakeCommands::new(cmake, plan.configuration());
        let build_temp = plan.staging.build_temp();

        let steps = match self {
            BuildStrategy::ProjectBased => vec![
                BuildStep {
                    stage: Stage::Configure,
                    command: commands.configure(&plan.source_dir, build_temp),
                },
                BuildStep {
                    stage: Stage::Build,
                    command: commands.build_target(build_temp, &plan.extension.target),
                },
                BuildStep {
                    stage: Stage::Install,
                    command: commands.build_target(build_temp, INSTALL_TARGET),
                },
            ],
            BuildStrategy::MakeBased => {
                let make = ProcessBuilder::new(MAKE_PROGRAM)
                    .args(plan.parallelism().command_line_flags())
                    .arg(&plan.extension.target)
                    .arg(INSTALL_TARGET);

                let script = [
                    format!("mkdir -p {}", shell_quote(&build_temp.display().to_string())),
                    format!("cd {}", shell_quote(&build_temp.display().to_string())),
                    commands.configure_in_place(&plan.source_dir).display_command(),
                    make.display_command(),
                ]
                .join(" && ");

                vec![BuildStep {
                    stage: Stage::Composite,
                    command: ProcessBuilder::new(POSIX_SHELL).arg("-c").arg(script),
                }]
            }
        };

        BuildSequence {
            strategy: *self,
            steps,
        }
    }
}

/// Ordered steps of one build. Steps run strictly in order and the first
/// failure stops the sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildSequence {
    pub strategy: BuildStrategy,
    pub steps: Vec<BuildStep>,
}

impl BuildSequence {
    /// Human-readable listing of every command, one per line.
    pub fn listing(&self) -> String {
        self.steps
            .iter()
            .map(|step| match (step.stage, step.command.get_args()) {
                (Stage::Composite, [_, script]) => script.replace(" && ", "\n"),
                _ => step.command.display_command(),
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::extension::{Extension, StagingPaths};
    use crate::test_support::EnvFixture;

    fn plan_for(host: HostOs, fixture: EnvFixture) -> BuildPlan {
        let env = fixture.build().with_host(host);
        BuildPlan::derive(
            &Extension::new("kaldifeat"),
            &env,
            Path::new("/src/kaldifeat"),
            &StagingPaths::new("/tmp/build/temp", "/tmp/build/lib"),
        )
        .unwrap()
    }

    #[test]
    fn test_strategy_for_host() {
        assert_eq!(BuildStrategy::for_host(HostOs::Windows), BuildStrategy::ProjectBased);
        assert_eq!(BuildStrategy::for_host(HostOs::Linux), BuildStrategy::MakeBased);
        assert_eq!(BuildStrategy::for_host(HostOs::MacOs), BuildStrategy::MakeBased);
        assert_eq!(BuildStrategy::for_host(HostOs::OtherPosix), BuildStrategy::MakeBased);
    }

    #[test]
    fn test_project_based_sequence() {
        let plan = plan_for(HostOs::Windows, EnvFixture::linux("2.1"));
        let seq = BuildStrategy::ProjectBased.sequence(&plan, Path::new("cmake"));

        let stages: Vec<Stage> = seq.steps.iter().map(|s| s.stage).collect();
        assert_eq!(stages, vec![Stage::Configure, Stage::Build, Stage::Install]);

        let configure = &seq.steps[0].command;
        assert!(configure.get_args().contains(&"-DCUDA=ON".to_string()));
        assert!(configure
            .display_command()
            .ends_with("-B /tmp/build/temp -S /src/kaldifeat"));

        assert_eq!(
            seq.steps[1].command.display_command(),
            "cmake --build /tmp/build/temp --target _kaldifeat --config Release -- -m"
        );
        assert_eq!(
            seq.steps[2].command.display_command(),
            "cmake --build /tmp/build/temp --target install --config Release -- -m"
        );
    }

    #[test]
    fn test_make_based_sequence() {
        let plan = plan_for(HostOs::Linux, EnvFixture::linux("2.1"));
        let seq = BuildStrategy::MakeBased.sequence(&plan, Path::new("cmake"));

        assert_eq!(seq.steps.len(), 1);
        let step = &seq.steps[0];
        assert_eq!(step.stage, Stage::Composite);
        assert_eq!(step.command.get_program(), Path::new("sh"));

        let script = &step.command.get_args()[1];
        assert!(script.starts_with("mkdir -p /tmp/build/temp && cd /tmp/build/temp && cmake "));
        assert!(script.contains("'-DCMAKE_CUDA_ARCHITECTURES=80;86;89;90;120'"));
        assert!(script.contains(" /src/kaldifeat && make -j4 _kaldifeat install"));
    }

    #[test]
    fn test_make_based_uses_explicit_flags() {
        let plan = plan_for(HostOs::Linux, EnvFixture::linux("2.1").make_args("-j16"));
        let seq = BuildStrategy::MakeBased.sequence(&plan, Path::new("cmake"));

        let script = &seq.steps[0].command.get_args()[1];
        assert!(script.ends_with("make -j16 _kaldifeat install"));
    }

    #[test]
    fn test_make_based_leaves_inherited_flags_to_make() {
        let plan = plan_for(HostOs::Linux, EnvFixture::linux("2.1").makeflags("-j8"));
        let seq = BuildStrategy::MakeBased.sequence(&plan, Path::new("cmake"));

        let script = &seq.steps[0].command.get_args()[1];
        assert!(script.ends_with("&& make _kaldifeat install"));
    }

    #[test]
    fn test_listing() {
        let plan = plan_for(HostOs::Linux, EnvFixture::linux("2.1"));
        let listing = BuildStrategy::MakeBased
            .sequence(&plan, Path::new("cmake"))
            .listing();

        let lines: Vec<&str> = listing.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "mkdir -p /tmp/build/temp");
        assert_eq!(lines[3], "make -j4 _kaldifeat install");
    }
}
