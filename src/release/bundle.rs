//! Artifact bundles and their registry descriptors
//!
//! A bundle is the built, runnable output for one target: a directory
//! holding `bin/<executable>` and a `package.json` descriptor. Bundles are
//! created by the build matrix and never mutated afterwards.

use crate::release::target::Target;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// The built output for one target
#[derive(Debug, Clone)]
pub struct ArtifactBundle {
  pub target: Target,
  /// Registry name: `<package>-<os>-<arch>`
  pub name: String,
  /// Bundle directory under dist/
  pub dir: PathBuf,
}

impl ArtifactBundle {
  pub fn bin_dir(&self) -> PathBuf {
    self.dir.join("bin")
  }

  pub fn descriptor_path(&self) -> PathBuf {
    self.dir.join("package.json")
  }
}

/// Per-target registry descriptor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BundleDescriptor {
  pub name: String,
  pub version: String,
  pub os: Vec<String>,
  pub cpu: Vec<String>,
}

impl BundleDescriptor {
  pub fn new(bundle: &ArtifactBundle, version: &str) -> Self {
    Self {
      name: bundle.name.clone(),
      version: version.to_string(),
      os: vec![bundle.target.os.registry_name().to_string()],
      cpu: vec![bundle.target.arch.as_str().to_string()],
    }
  }
}
