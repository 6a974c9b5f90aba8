//! Build executor.

use std::fmt;
use std::process::ExitStatus;
use std::time::Instant;

use anyhow::Result;
use serde::Serialize;

use crate::builder::errors::{composite_guidance, BuildError};
use crate::builder::strategy::{BuildSequence, BuildStep, Stage};
use crate::core::extension::Extension;
use crate::util::process::ProcessBuilder;
use crate::util::shell::{format_duration, Shell, Status};

/// Terminal status of an external command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RunStatus {
    /// Exit code, `None` when the process was killed by a signal.
    pub code: Option<i32>,
}

impl RunStatus {
    pub const SUCCESS: RunStatus = RunStatus { code: Some(0) };

    pub const fn code(code: i32) -> Self {
        RunStatus { code: Some(code) }
    }

    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

impl From<ExitStatus> for RunStatus {
    fn from(status: ExitStatus) -> Self {
        RunStatus {
            code: status.code(),
        }
    }
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.code {
            Some(code) => write!(f, "exit code {}", code),
            None => write!(f, "terminated by signal"),
        }
    }
}

/// Runs external commands to completion.
pub trait CommandRunner {
    /// Run `command` and wait for it to terminate.
    fn run(&mut self, command: &ProcessBuilder) -> Result<RunStatus>;
}

/// Runs commands as real child processes with inherited stdio.
#[derive(Debug, Default)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&mut self, command: &ProcessBuilder) -> Result<RunStatus> {
        Ok(command.status()?.into())
    }
}

/// Runs a [`BuildSequence`], stopping at the first failing step.
pub struct BuildExecutor<'a, R: CommandRunner> {
    runner: &'a mut R,
    shell: &'a Shell,
    extension: &'a Extension,
}

impl<'a, R: CommandRunner> BuildExecutor<'a, R> {
    /// Create a new build executor.
    pub fn new(runner: &'a mut R, shell: &'a Shell, extension: &'a Extension) -> Self {
        BuildExecutor {
            runner,
            shell,
            extension,
        }
    }

    /// Execute every step in order.
    ///
    /// A non-zero status becomes a [`BuildError`] naming the stage; nothing
    /// after it runs and nothing is cleaned up.
    pub fn execute(&mut self, sequence: &BuildSequence) -> Result<()> {
        let start = Instant::now();

        for step in &sequence.steps {
            self.run_step(step)?;
        }

        self.shell.status(
            Status::Finished,
            format!(
                "`{}` in {}",
                self.extension.name,
                format_duration(start.elapsed())
            ),
        );

        Ok(())
    }

    fn run_step(&mut self, step: &BuildStep) -> Result<()> {
        let (status, label) = match step.stage {
            Stage::Configure => (Status::Configuring, self.extension.name.clone()),
            Stage::Build => (Status::Building, self.extension.target.clone()),
            Stage::Install => (Status::Installing, self.extension.name.clone()),
            Stage::Composite => (Status::Building, self.extension.name.clone()),
        };
        self.shell.status(status, label);

        tracing::debug!(stage = %step.stage, "running {}", step.command);
        self.shell.verbose(step.command.display_command());

        let result = self.runner.run(&step.command)?;
        if result.success() {
            return Ok(());
        }

        tracing::debug!(stage = %step.stage, %result, "step failed");
        Err(self.failure(step.stage, result).into())
    }

    fn failure(&self, stage: Stage, status: RunStatus) -> BuildError {
        let extension = self.extension.name.clone();
        match stage {
            Stage::Configure => BuildError::ConfigureFailed { extension, status },
            Stage::Build => BuildError::BuildFailed { extension, status },
            Stage::Install => BuildError::InstallFailed { extension, status },
            Stage::Composite => BuildError::CompositeFailed {
                extension,
                status,
                guidance: composite_guidance(self.extension.issues_url.as_deref()),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::plan::BuildPlan;
    use crate::builder::strategy::BuildStrategy;
    use crate::core::extension::StagingPaths;
    use crate::core::platform::HostOs;
    use crate::test_support::{EnvFixture, MockRunner};
    use std::path::Path;

    fn sequence(ext: &Extension, host: HostOs) -> BuildSequence {
        let env = EnvFixture::linux("2.1").build().with_host(host);
        let plan = BuildPlan::derive(
            ext,
            &env,
            Path::new("/src/kaldifeat"),
            &StagingPaths::new("/tmp/build/temp", "/tmp/build/lib"),
        )
        .unwrap();
        BuildStrategy::for_host(host).sequence(&plan, Path::new("cmake"))
    }

    fn build_error(err: &anyhow::Error) -> &BuildError {
        err.downcast_ref::<BuildError>().expect("a BuildError")
    }

    #[test]
    fn test_project_based_success_runs_all_stages() {
        let ext = Extension::new("kaldifeat");
        let seq = sequence(&ext, HostOs::Windows);
        let mut runner = MockRunner::new();
        let shell = Shell::quiet();

        BuildExecutor::new(&mut runner, &shell, &ext).execute(&seq).unwrap();

        assert_eq!(runner.calls().len(), 3);
        assert!(runner.calls()[1].contains("--target _kaldifeat"));
        assert!(runner.calls()[2].contains("--target install"));
    }

    #[test]
    fn test_configure_failure_stops_sequence() {
        let ext = Extension::new("kaldifeat");
        let seq = sequence(&ext, HostOs::Windows);
        let mut runner = MockRunner::new();
        runner.fail_when_contains(" -S ", 1);
        let shell = Shell::quiet();

        let err = BuildExecutor::new(&mut runner, &shell, &ext)
            .execute(&seq)
            .unwrap_err();

        assert_eq!(runner.calls().len(), 1, "build and install must not run");
        assert!(matches!(build_error(&err), BuildError::ConfigureFailed { .. }));
        assert!(err.to_string().contains("failed to configure `kaldifeat`"));
    }

    #[test]
    fn test_build_failure_skips_install() {
        let ext = Extension::new("kaldifeat");
        let seq = sequence(&ext, HostOs::Windows);
        let mut runner = MockRunner::new();
        runner.fail_when_contains("--target _kaldifeat", 2);
        let shell = Shell::quiet();

        let err = BuildExecutor::new(&mut runner, &shell, &ext)
            .execute(&seq)
            .unwrap_err();

        assert_eq!(runner.calls().len(), 2);
        assert_eq!(build_error(&err).stage_name(), Some("build"));
    }

    #[test]
    fn test_install_failure_is_named() {
        let ext = Extension::new("kaldifeat");
        let seq = sequence(&ext, HostOs::Windows);
        let mut runner = MockRunner::new();
        runner.fail_when_contains("--target install", 1);
        let shell = Shell::quiet();

        let err = BuildExecutor::new(&mut runner, &shell, &ext)
            .execute(&seq)
            .unwrap_err();

        assert!(matches!(build_error(&err), BuildError::InstallFailed { .. }));
    }

    #[test]
    fn test_composite_failure_has_guidance() {
        let ext = Extension::new("kaldifeat")
            .with_issues_url("https://github.com/csukuangfj/kaldifeat/issues/new");
        let seq = sequence(&ext, HostOs::Linux);
        let shell = Shell::quiet();

        // Whichever inner command fails, the shell reports one status
        for failing in ["mkdir -p", "cmake ", "make -j4"] {
            let mut runner = MockRunner::new();
            runner.fail_when_contains(failing, 2);

            let err = BuildExecutor::new(&mut runner, &shell, &ext)
                .execute(&seq)
                .unwrap_err();

            assert_eq!(runner.calls().len(), 1);
            match build_error(&err) {
                BuildError::CompositeFailed { guidance, status, .. } => {
                    assert_eq!(*status, RunStatus::code(2));
                    assert!(guidance.contains("issues/new"));
                }
                other => panic!("unexpected error: {other:?}"),
            }
        }
    }

    #[test]
    fn test_spawn_error_propagates() {
        let ext = Extension::new("kaldifeat");
        let seq = sequence(&ext, HostOs::Windows);
        let mut runner = MockRunner::new();
        runner.spawn_error_when_contains("--target _kaldifeat");
        let shell = Shell::quiet();

        let err = BuildExecutor::new(&mut runner, &shell, &ext)
            .execute(&seq)
            .unwrap_err();

        assert!(err.downcast_ref::<BuildError>().is_none());
        assert_eq!(runner.calls().len(), 2);
    }

    #[test]
    fn test_run_status_display() {
        assert_eq!(RunStatus::code(3).to_string(), "exit code 3");
        assert_eq!(RunStatus { code: None }.to_string(), "terminated by signal");
        assert!(RunStatus::SUCCESS.success());
    }
}
