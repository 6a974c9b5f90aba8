//! Runtime library version handling.
//!
//! The extension links against a runtime library (PyTorch by default) whose
//! headers require C++17 from 2.1 onwards. Parsing the version and deciding
//! which extra configure entries it implies are kept apart so each can be
//! tested on its own.

use std::fmt;

use thiserror::Error;

use crate::builder::config::CacheEntry;

/// C++ standard requested from runtime 2.1 onwards.
pub const CXX_STANDARD: &str = "17";

/// First runtime release whose headers need [`CXX_STANDARD`].
pub const CXX_STANDARD_SINCE: RuntimeVersion = RuntimeVersion { major: 2, minor: 1 };

/// Error parsing a runtime library version.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VersionError {
    #[error("malformed runtime library version `{raw}`: expected `<major>.<minor>`")]
    Malformed { raw: String },
}

/// The `(major, minor)` part of an installed runtime library version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RuntimeVersion {
    pub major: u32,
    pub minor: u32,
}

impl RuntimeVersion {
    pub const fn new(major: u32, minor: u32) -> Self {
        RuntimeVersion { major, minor }
    }

    /// Parse a version such as `2.1.0+cu118`.
    ///
    /// Build metadata after `+` is dropped; anything past the minor
    /// component is ignored.
    pub fn parse(raw: &str) -> Result<Self, VersionError> {
        let trimmed = raw.trim();
        let base = trimmed.split_once('+').map_or(trimmed, |(base, _)| base);

        let mut parts = base.split('.');
        let major = parts.next().and_then(|p| p.parse::<u32>().ok());
        let minor = parts.next().and_then(|p| p.parse::<u32>().ok());

        match (major, minor) {
            (Some(major), Some(minor)) => Ok(RuntimeVersion { major, minor }),
            _ => Err(VersionError::Malformed {
                raw: raw.to_string(),
            }),
        }
    }

    /// Whether this runtime needs the C++ standard pinned.
    pub fn requires_cxx_standard(&self) -> bool {
        *self >= CXX_STANDARD_SINCE
    }
}

impl fmt::Display for RuntimeVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

/// Extra configure entries implied by the runtime version.
///
/// Older runtimes get nothing and build with the toolchain's default standard.
pub fn version_gated_entries(version: RuntimeVersion) -> Vec<CacheEntry> {
    if version.requires_cxx_standard() {
        vec![CacheEntry::new("CMAKE_CXX_STANDARD", CXX_STANDARD)]
    } else {
        Vec::new()
    }
}
