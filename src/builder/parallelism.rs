//! Build-tool parallelism flags.

use serde::Serialize;

use crate::util::process::split_args;

/// Flags used when nothing else asks for a job count.
pub const DEFAULT_JOBS_FLAGS: &str = "-j4";

/// Resolved parallelism for make-based builds.
///
/// Exactly one source wins, in this order: the explicit override, flags
/// inherited from a parent make, then [`DEFAULT_JOBS_FLAGS`]. Sources are
/// never combined.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "source", content = "flags", rename_all = "kebab-case")]
pub enum ParallelismSpec {
    /// From `<PREFIX>_MAKE_ARGS`.
    Explicit(String),
    /// From `MAKEFLAGS`.
    Inherited(String),
    /// Nothing was set.
    Default,
}

impl ParallelismSpec {
    /// Pick the winning source. Empty strings count as unset.
    pub fn resolve(explicit: Option<&str>, inherited: Option<&str>) -> Self {
        let present = |v: Option<&str>| v.map(str::trim).filter(|v| !v.is_empty()).map(str::to_string);

        if let Some(flags) = present(explicit) {
            ParallelismSpec::Explicit(flags)
        } else if let Some(flags) = present(inherited) {
            ParallelismSpec::Inherited(flags)
        } else {
            ParallelismSpec::Default
        }
    }

    pub fn is_default(&self) -> bool {
        matches!(self, ParallelismSpec::Default)
    }

    /// The flag string that won.
    pub fn flags(&self) -> &str {
        match self {
            ParallelismSpec::Explicit(flags) | ParallelismSpec::Inherited(flags) => flags,
            ParallelismSpec::Default => DEFAULT_JOBS_FLAGS,
        }
    }

    /// Arguments to put on the build tool's command line.
    ///
    /// Inherited flags are left off: make already reads `MAKEFLAGS` from the
    /// environment, and jobserver entries in it are not valid arguments.
    pub fn command_line_flags(&self) -> Vec<String> {
        match self {
            ParallelismSpec::Explicit(flags) => split_args(flags),
            ParallelismSpec::Inherited(_) => Vec::new(),
            ParallelismSpec::Default => vec![DEFAULT_JOBS_FLAGS.to_string()],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_when_unset() {
        let spec = ParallelismSpec::resolve(None, None);
        assert!(spec.is_default());
        assert_eq!(spec.flags(), "-j4");
        assert_eq!(spec.command_line_flags(), vec!["-j4"]);

        assert!(ParallelismSpec::resolve(Some(""), Some("  ")).is_default());
    }

    #[test]
    fn test_explicit_beats_inherited() {
        let spec = ParallelismSpec::resolve(Some("-j16 -k"), Some("-j8"));
        assert_eq!(spec, ParallelismSpec::Explicit("-j16 -k".to_string()));
        assert_eq!(spec.command_line_flags(), vec!["-j16", "-k"]);
    }

    #[test]
    fn test_inherited_beats_default() {
        let spec = ParallelismSpec::resolve(None, Some("-j8 --jobserver-auth=3,4"));
        assert_eq!(spec.flags(), "-j8 --jobserver-auth=3,4");
        assert!(spec.command_line_flags().is_empty());
    }

    #[test]
    fn test_serializes_with_source_tag() {
        let json = serde_json::to_value(ParallelismSpec::Explicit("-j".to_string())).unwrap();
        assert_eq!(json["source"], "explicit");
        assert_eq!(json["flags"], "-j");

        let json = serde_json::to_value(ParallelismSpec::Default).unwrap();
        assert_eq!(json["source"], "default");
    }
}
