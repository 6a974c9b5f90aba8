//! User-friendly diagnostic messages.
//!
//! Every fatal error is rendered with its root cause, the stage it happened
//! in when that is known, and what the user can do next.

use std::fmt;

/// Common suggestion messages for consistent error handling.
pub mod suggestions {
    /// Suggestion when the runtime library version cannot be parsed.
    pub fn malformed_version(override_var: &str) -> String {
        format!("Set `{override_var}` to a version like `2.1.0` to bypass detection")
    }

    /// Suggestion when the base CMake arguments hold a broken `-D`.
    pub fn malformed_configuration(override_var: &str) -> String {
        format!("Write every cache entry in `{override_var}` as `-D<KEY>=<VALUE>`")
    }

    /// Suggestion when no interpreter could be found.
    pub const NO_INTERPRETER: &str =
        "Pass `--python /path/to/python` or add `-DPYTHON_EXECUTABLE=...` to the CMake arguments";

    /// Suggestion when a build stage fails.
    pub const BUILD_FAILED: &str = "Run `stevedore build --verbose` to see every command";

    /// Suggestion after a failed build: the tree is left for inspection.
    pub const PARTIAL_TREE: &str =
        "The temporary build tree was left in place; fix the cause and re-run the full build";
}

/// A fatal error message with optional suggestions.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    /// Primary message
    pub message: String,
    /// Stable error code, e.g. `stevedore::build::configure_failed`
    pub code: Option<String>,
    /// Additional context lines
    pub context: Vec<String>,
    /// Suggested fixes
    pub suggestions: Vec<String>,
}

impl Diagnostic {
    /// Create a new error diagnostic.
    pub fn error(message: impl Into<String>) -> Self {
        Diagnostic {
            message: message.into(),
            code: None,
            context: Vec::new(),
            suggestions: Vec::new(),
        }
    }

    /// Attach an error code, shown as `error[code]`.
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    /// Add context to the diagnostic.
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context.push(context.into());
        self
    }

    /// Add a suggestion for fixing the issue.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestions.push(suggestion.into());
        self
    }

    /// Format the diagnostic for terminal output.
    pub fn format(&self, color: bool) -> String {
        let mut output = String::new();

        let label = if color {
            "\x1b[1;31merror\x1b[0m"
        } else {
            "error"
        };

        match self.code {
            Some(ref code) => output.push_str(&format!("{}[{}]: {}\n", label, code, self.message)),
            None => output.push_str(&format!("{}: {}\n", label, self.message)),
        }

        for ctx in &self.context {
            output.push_str(&format!("  -> {}\n", ctx));
        }

        if !self.suggestions.is_empty() {
            output.push('\n');
            let help_prefix = if color {
                "\x1b[1;32mhelp\x1b[0m"
            } else {
                "help"
            };
            output.push_str(&format!("{}: consider:\n", help_prefix));
            for (i, suggestion) in self.suggestions.iter().enumerate() {
                output.push_str(&format!("  {}. {}\n", i + 1, suggestion));
            }
        }

        output
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format(false))
    }
}

/// Print a diagnostic to stderr.
pub fn emit(diagnostic: &Diagnostic, color: bool) {
    eprint!("{}", diagnostic.format(color));
}
