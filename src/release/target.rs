//! The build matrix domain: operating systems, architectures, targets
//!
//! The matrix is fixed at five targets; windows/arm64 is excluded. Every
//! deterministic name downstream stages rely on (bundle directories,
//! archive files, registry package names) derives from these types.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Os {
  Linux,
  Darwin,
  Windows,
}

impl Os {
  pub fn as_str(&self) -> &'static str {
    match self {
      Os::Linux => "linux",
      Os::Darwin => "darwin",
      Os::Windows => "windows",
    }
  }

  /// OS name as the package registry spells it
  pub fn registry_name(&self) -> &'static str {
    match self {
      Os::Windows => "win32",
      other => other.as_str(),
    }
  }
}

impl fmt::Display for Os {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.as_str())
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Arch {
  Arm64,
  X64,
}

impl Arch {
  pub fn as_str(&self) -> &'static str {
    match self {
      Arch::Arm64 => "arm64",
      Arch::X64 => "x64",
    }
  }

  /// Architecture name as the companion toolchain spells it
  pub fn goarch(&self) -> &'static str {
    match self {
      Arch::Arm64 => "arm64",
      Arch::X64 => "amd64",
    }
  }
}

impl fmt::Display for Arch {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.as_str())
  }
}

/// One (operating-system, architecture) pair the pipeline builds for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Target {
  pub os: Os,
  pub arch: Arch,
}

impl Target {
  pub const fn new(os: Os, arch: Arch) -> Self {
    Self { os, arch }
  }

  /// The fixed build matrix
  pub fn all() -> [Target; 5] {
    [
      Target::new(Os::Linux, Arch::Arm64),
      Target::new(Os::Linux, Arch::X64),
      Target::new(Os::Darwin, Arch::X64),
      Target::new(Os::Darwin, Arch::Arm64),
      Target::new(Os::Windows, Arch::X64),
    ]
  }

  /// Registry bundle name: `<package>-<os>-<arch>`
  pub fn bundle_name(&self, package: &str) -> String {
    format!("{}-{}-{}", package, self.os, self.arch)
  }

  /// Compilation target for the primary bundler
  pub fn bun_target(&self) -> String {
    format!("bun-{}-{}", self.os, self.arch)
  }
}

impl fmt::Display for Target {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}-{}", self.os, self.arch)
  }
}
