//! Packaging-purity decision.

use std::fmt;

use serde::Serialize;

use crate::core::environment::{is_public_distribution, VarSource};
use crate::core::extension::Extension;
use crate::core::platform::HostOs;

/// Whether the packaged artifact may be tagged as platform-independent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum PackagePurity {
    PlatformIndependent,
    PlatformSpecific,
}

impl PackagePurity {
    pub const fn as_str(&self) -> &'static str {
        match self {
            PackagePurity::PlatformIndependent => "platform-independent",
            PackagePurity::PlatformSpecific => "platform-specific",
        }
    }

    pub fn is_pure(&self) -> bool {
        *self == PackagePurity::PlatformIndependent
    }
}

impl fmt::Display for PackagePurity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Platform-independent only for public distribution off macOS.
///
/// Has no influence on the build sequence.
pub fn package_purity(public_distribution: bool, host: HostOs) -> PackagePurity {
    if public_distribution && !host.is_macos() {
        PackagePurity::PlatformIndependent
    } else {
        PackagePurity::PlatformSpecific
    }
}

/// Purity of `ext` on the current host, read from the environment.
pub fn purity_for(ext: &Extension, vars: &impl VarSource) -> PackagePurity {
    package_purity(is_public_distribution(ext, vars), HostOs::current())
}
