//! Test utilities and mocks for stevedore unit tests.
//!
//! # Example
//!
//! ```rust,ignore
//! use stevedore::test_support::{EnvFixture, MockRunner};
//!
//! #[test]
//! fn test_example() {
//!     let env = EnvFixture::linux("2.1.0").make_args("-j8").build();
//!
//!     let mut runner = MockRunner::new();
//!     runner.fail_when_contains("--target install", 1);
//!
//!     // Drive an executor with `runner`...
//! }
//! ```

pub mod fixtures;

use anyhow::{bail, Result};

use crate::builder::executor::{CommandRunner, RunStatus};
use crate::util::process::ProcessBuilder;

pub use fixtures::*;

/// What a matched command does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockOutcome {
    /// Terminate with this status.
    Exit(RunStatus),
    /// Fail to start at all.
    SpawnError,
}

/// Mock command runner.
///
/// Records every command it is asked to run, flattened to
/// `program arg arg ...`, and answers with the outcome of the first
/// expectation whose substring the command contains. Unmatched commands
/// succeed.
#[derive(Debug, Default)]
pub struct MockRunner {
    expectations: Vec<(String, MockOutcome)>,
    calls: Vec<String>,
}

impl MockRunner {
    /// Create a new mock runner where every command succeeds.
    pub fn new() -> Self {
        MockRunner::default()
    }

    /// Exit with `code` for commands containing `substring`.
    pub fn fail_when_contains(&mut self, substring: &str, code: i32) -> &mut Self {
        self.expectations
            .push((substring.to_string(), MockOutcome::Exit(RunStatus::code(code))));
        self
    }

    /// Refuse to start commands containing `substring`.
    pub fn spawn_error_when_contains(&mut self, substring: &str) -> &mut Self {
        self.expectations
            .push((substring.to_string(), MockOutcome::SpawnError));
        self
    }

    /// Get all commands that were run.
    pub fn calls(&self) -> &[String] {
        &self.calls
    }
}

impl CommandRunner for MockRunner {
    fn run(&mut self, command: &ProcessBuilder) -> Result<RunStatus> {
        let mut parts = vec![command.get_program().display().to_string()];
        parts.extend(command.get_args().iter().cloned());
        let full_cmd = parts.join(" ");

        self.calls.push(full_cmd.clone());

        let outcome = self
            .expectations
            .iter()
            .find(|(substring, _)| full_cmd.contains(substring.as_str()))
            .map(|(_, outcome)| *outcome);

        match outcome {
            Some(MockOutcome::Exit(status)) => Ok(status),
            Some(MockOutcome::SpawnError) => bail!("failed to spawn `{}`", full_cmd),
            None => Ok(RunStatus::SUCCESS),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_runner_records_calls() {
        let mut runner = MockRunner::new();
        runner.fail_when_contains("install", 4);

        let ok = runner
            .run(&ProcessBuilder::new("cmake").args(["--build", "."]))
            .unwrap();
        let failed = runner
            .run(&ProcessBuilder::new("cmake").args(["--target", "install"]))
            .unwrap();

        assert!(ok.success());
        assert_eq!(failed, RunStatus::code(4));
        assert_eq!(runner.calls(), ["cmake --build .", "cmake --target install"]);
    }

    #[test]
    fn test_first_expectation_wins() {
        let mut runner = MockRunner::new();
        runner.fail_when_contains("--target", 2).fail_when_contains("install", 5);

        let status = runner
            .run(&ProcessBuilder::new("cmake").args(["--target", "install"]))
            .unwrap();
        assert_eq!(status, RunStatus::code(2));
    }

    #[test]
    fn test_mock_runner_spawn_error() {
        let mut runner = MockRunner::new();
        runner.spawn_error_when_contains("make");

        assert!(runner.run(&ProcessBuilder::new("make")).is_err());
        assert_eq!(runner.calls().len(), 1);
    }
}
