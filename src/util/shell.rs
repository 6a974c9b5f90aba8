//! Status output for the terminal.
//!
//! All human-facing progress lines go through [`Shell`] so that verbosity and
//! colour are decided in one place. Diagnostics meant for developers go
//! through `tracing` instead.

use std::fmt::Display;
use std::io::{self, IsTerminal};
use std::time::Duration;

/// Output verbosity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verbosity {
    /// --quiet: errors only
    Quiet,
    /// Default: status messages
    #[default]
    Normal,
    /// --verbose: status messages plus command listings
    Verbose,
}

/// Color output mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorChoice {
    /// Detect TTY and use colors if available.
    #[default]
    Auto,
    /// Never use ANSI colors.
    Never,
}

/// Status types for output messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    // Success (green)
    Finished,
    Staged,

    // In-progress (cyan)
    Configuring,
    Building,
    Installing,
}

impl Status {
    /// Get the display text for this status.
    fn as_str(&self) -> &'static str {
        match self {
            Status::Finished => "Finished",
            Status::Staged => "Staged",
            Status::Configuring => "Configuring",
            Status::Building => "Building",
            Status::Installing => "Installing",
        }
    }

    /// Get the ANSI color code for this status.
    fn color_code(&self) -> &'static str {
        match self {
            Status::Finished | Status::Staged => "\x1b[1;32m",
            Status::Configuring | Status::Building | Status::Installing => "\x1b[1;36m",
        }
    }
}

/// Width statuses are right-aligned to.
const STATUS_WIDTH: usize = 12;

/// Central shell for all CLI output.
#[derive(Debug)]
pub struct Shell {
    verbosity: Verbosity,
    use_color: bool,
}

impl Shell {
    /// Create a new shell.
    pub fn new(verbosity: Verbosity, color: ColorChoice) -> Self {
        let use_color = match color {
            ColorChoice::Auto => io::stderr().is_terminal(),
            ColorChoice::Never => false,
        };

        Shell {
            verbosity,
            use_color,
        }
    }

    /// Create a shell from CLI flags. Quiet wins over verbose.
    pub fn from_flags(quiet: bool, verbose: bool, color: ColorChoice) -> Self {
        let verbosity = if quiet {
            Verbosity::Quiet
        } else if verbose {
            Verbosity::Verbose
        } else {
            Verbosity::Normal
        };

        Shell::new(verbosity, color)
    }

    /// A shell that prints nothing, for library callers and tests.
    pub fn quiet() -> Self {
        Shell::new(Verbosity::Quiet, ColorChoice::Never)
    }

    /// Check if shell is in quiet mode.
    pub fn is_quiet(&self) -> bool {
        self.verbosity == Verbosity::Quiet
    }

    /// Check if shell is in verbose mode.
    pub fn is_verbose(&self) -> bool {
        self.verbosity == Verbosity::Verbose
    }

    /// Check if colors are enabled.
    pub fn use_color(&self) -> bool {
        self.use_color
    }

    /// Print a status message.
    ///
    /// Format: `{status:>12} {message}`. Nothing prints in quiet mode.
    pub fn status(&self, status: Status, msg: impl Display) {
        if self.is_quiet() {
            return;
        }

        eprintln!("{} {}", self.format_status(status), msg);
    }

    /// Print a raw line, only in verbose mode.
    pub fn verbose(&self, msg: impl Display) {
        if self.is_verbose() {
            eprintln!("{}", msg);
        }
    }

    /// Format a status prefix with optional color.
    fn format_status(&self, status: Status) -> String {
        let text = status.as_str();

        if self.use_color {
            format!("{}{:>width$}\x1b[0m", status.color_code(), text, width = STATUS_WIDTH)
        } else {
            format!("{:>width$}", text, width = STATUS_WIDTH)
        }
    }
}

/// Format a duration in a human-readable way.
pub fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs_f64();
    if secs < 60.0 {
        format!("{:.2}s", secs)
    } else {
        let mins = secs / 60.0;
        format!("{:.1}m", mins)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(Duration::from_millis(500)), "0.50s");
        assert_eq!(format_duration(Duration::from_secs(2)), "2.00s");
        assert_eq!(format_duration(Duration::from_secs(90)), "1.5m");
    }

    #[test]
    fn test_status_formatting() {
        let shell = Shell::new(Verbosity::Normal, ColorChoice::Never);

        let formatted = shell.format_status(Status::Configuring);
        assert_eq!(formatted.trim(), "Configuring");
        assert_eq!(formatted.len(), 12);
    }

    #[test]
    fn test_from_flags() {
        let shell = Shell::from_flags(false, false, ColorChoice::Never);
        assert!(!shell.is_quiet());
        assert!(!shell.is_verbose());

        let shell = Shell::from_flags(false, true, ColorChoice::Never);
        assert!(shell.is_verbose());

        // Quiet wins
        let shell = Shell::from_flags(true, true, ColorChoice::Never);
        assert!(shell.is_quiet());
        assert!(!shell.is_verbose());
    }
}
