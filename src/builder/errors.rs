//! Build error types.

use miette::Diagnostic as MietteDiagnostic;
use thiserror::Error;

use crate::builder::config::InvalidDefinition;
use crate::builder::executor::RunStatus;
use crate::core::runtime::VersionError;
use crate::util::diagnostic::{suggestions, Diagnostic};

/// A fatal error of one build invocation.
#[derive(Debug, Error, MietteDiagnostic)]
pub enum BuildError {
    #[error("{source}")]
    #[diagnostic(code(stevedore::plan::malformed_version))]
    MalformedVersion {
        source: VersionError,
        /// Variable that pins the version instead
        override_var: String,
    },

    #[error("{source}")]
    #[diagnostic(code(stevedore::plan::malformed_configuration))]
    MalformedConfiguration {
        source: InvalidDefinition,
        /// Variable the base configuration came from
        override_var: String,
    },

    #[error("no Python interpreter found to pass as `PYTHON_EXECUTABLE`")]
    #[diagnostic(code(stevedore::plan::no_interpreter))]
    InterpreterNotFound,

    #[error("failed to configure `{extension}` ({status})")]
    #[diagnostic(code(stevedore::build::configure_failed))]
    ConfigureFailed { extension: String, status: RunStatus },

    #[error("failed to build `{extension}` ({status})")]
    #[diagnostic(code(stevedore::build::build_failed))]
    BuildFailed { extension: String, status: RunStatus },

    #[error("failed to install `{extension}` ({status})")]
    #[diagnostic(code(stevedore::build::install_failed))]
    InstallFailed { extension: String, status: RunStatus },

    #[error("\nBuild {extension} failed ({status}). Please check the error message.\n{guidance}")]
    #[diagnostic(code(stevedore::build::failed))]
    CompositeFailed {
        extension: String,
        status: RunStatus,
        guidance: String,
    },
}

impl BuildError {
    /// Stage named by this error, if it came from an external command.
    pub fn stage_name(&self) -> Option<&'static str> {
        match self {
            BuildError::ConfigureFailed { .. } => Some("configure"),
            BuildError::BuildFailed { .. } => Some("build"),
            BuildError::InstallFailed { .. } => Some("install"),
            BuildError::CompositeFailed { .. } => Some("configure+build+install"),
            BuildError::MalformedVersion { .. }
            | BuildError::MalformedConfiguration { .. }
            | BuildError::InterpreterNotFound => None,
        }
    }

    /// Convert to a user-friendly diagnostic carrying the error code.
    pub fn to_diagnostic(&self) -> Diagnostic {
        let mut diag = Diagnostic::error(self.to_string());
        if let Some(code) = MietteDiagnostic::code(self) {
            diag = diag.with_code(code.to_string());
        }

        match self {
            BuildError::MalformedVersion { override_var, .. } => {
                diag.with_suggestion(suggestions::malformed_version(override_var))
            }

            BuildError::MalformedConfiguration { override_var, .. } => {
                diag.with_suggestion(suggestions::malformed_configuration(override_var))
            }

            BuildError::InterpreterNotFound => diag.with_suggestion(suggestions::NO_INTERPRETER),

            BuildError::ConfigureFailed { .. }
            | BuildError::BuildFailed { .. }
            | BuildError::InstallFailed { .. } => {
                if let Some(stage) = self.stage_name() {
                    diag = diag.with_context(format!("stage: {}", stage));
                }
                diag.with_suggestion(suggestions::BUILD_FAILED)
                    .with_suggestion(suggestions::PARTIAL_TREE)
            }

            // The guidance is already part of the message
            BuildError::CompositeFailed { .. } => diag,
        }
    }
}

/// Remediation text for a failed make-based build.
pub fn composite_guidance(issues_url: Option<&str>) -> String {
    match issues_url {
        Some(url) => format!(
            "You can ask for help by creating an issue on GitHub.\n\nClick:\n\t{}\n",
            url
        ),
        None => format!("{}.\n", suggestions::BUILD_FAILED),
    }
}
