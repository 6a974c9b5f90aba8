//! Host operating system detection.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Host operating system family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HostOs {
    Linux,
    MacOs,
    Windows,
    /// BSDs and other POSIX systems driven through make.
    OtherPosix,
}

impl HostOs {
    /// Detect the operating system this binary runs on.
    pub fn current() -> Self {
        Self::from_os_name(std::env::consts::OS)
    }

    /// Classify an OS name as reported by `std::env::consts::OS`.
    pub fn from_os_name(name: &str) -> Self {
        match name {
            "linux" | "android" => HostOs::Linux,
            "macos" | "ios" => HostOs::MacOs,
            "windows" => HostOs::Windows,
            _ => HostOs::OtherPosix,
        }
    }

    pub fn is_windows(&self) -> bool {
        matches!(self, HostOs::Windows)
    }

    pub fn is_macos(&self) -> bool {
        matches!(self, HostOs::MacOs)
    }

    /// Returns the OS name as used in logs and plans.
    pub const fn as_str(&self) -> &'static str {
        match self {
            HostOs::Linux => "linux",
            HostOs::MacOs => "macos",
            HostOs::Windows => "windows",
            HostOs::OtherPosix => "other-posix",
        }
    }
}

impl fmt::Display for HostOs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
