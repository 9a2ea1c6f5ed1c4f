//! shipline.toml configuration
//!
//! One file at the workspace root drives the whole pipeline. Only
//! `[package]` and `[forge]` are required; everything else has defaults
//! matching the conventional layout (companion component in a sibling
//! directory, npm-compatible registry CLI, two downstream families).

use crate::core::error::{ConfigError, ShipError, ShipResult};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_FILE: &str = "shipline.toml";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShiplineConfig {
  pub package: PackageConfig,
  pub forge: ForgeConfig,
  #[serde(default)]
  pub registry: RegistryConfig,
  #[serde(default)]
  pub build: BuildConfig,
  #[serde(default)]
  pub downstream: DownstreamConfig,
}

impl ShiplineConfig {
  pub fn exists(workspace_root: &Path) -> bool {
    workspace_root.join(CONFIG_FILE).exists()
  }

  pub fn load(workspace_root: &Path) -> ShipResult<Self> {
    let path = workspace_root.join(CONFIG_FILE);
    if !path.exists() {
      return Err(ShipError::Config(ConfigError::NotFound {
        workspace_root: workspace_root.to_path_buf(),
      }));
    }

    let content = fs::read_to_string(&path)?;
    let config: ShiplineConfig = toml_edit::de::from_str(&content)?;
    config.validate()?;
    Ok(config)
  }

  fn validate(&self) -> ShipResult<()> {
    if self.package.name.is_empty() {
      return Err(ShipError::Config(ConfigError::Invalid {
        reason: "package.name must not be empty".to_string(),
      }));
    }
    if !self.forge.repo.contains('/') {
      return Err(ShipError::Config(ConfigError::Invalid {
        reason: format!("forge.repo '{}' must be in owner/name form", self.forge.repo),
      }));
    }
    Ok(())
  }
}

/// The published product
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackageConfig {
  /// Registry package base name; per-target bundles are `<name>-<os>-<arch>`
  pub name: String,

  /// Executable name inside each bundle (defaults to the package name)
  #[serde(default)]
  pub executable: Option<String>,

  #[serde(default)]
  pub description: String,

  /// Project page embedded in downstream recipes (defaults to the forge URL)
  #[serde(default)]
  pub homepage: Option<String>,

  /// License identifiers embedded in downstream recipes
  #[serde(default = "default_license")]
  pub license: Vec<String>,
}

fn default_license() -> Vec<String> {
  vec!["MIT".to_string()]
}

impl PackageConfig {
  pub fn executable(&self) -> &str {
    self.executable.as_deref().unwrap_or(&self.name)
  }
}

/// The code-hosting platform the release lives on
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForgeConfig {
  /// Repository in owner/name form
  pub repo: String,

  /// REST API base; overridable for testing
  #[serde(default = "default_api_base")]
  pub api_base: String,
}

fn default_api_base() -> String {
  "https://api.github.com".to_string()
}

impl ForgeConfig {
  /// Browser-facing URL for the repository
  pub fn html_url(&self) -> String {
    format!("https://github.com/{}", self.repo)
  }

  /// Download URL for one release asset
  pub fn download_url(&self, tag: &str, asset: &str) -> String {
    format!("{}/releases/download/{}/{}", self.html_url(), tag, asset)
  }
}

/// Package registry publishing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistryConfig {
  /// CLI used to publish bundle directories
  #[serde(default = "default_registry_command")]
  pub command: String,

  #[serde(default = "default_access")]
  pub access: String,

  /// Launcher scripts copied into the umbrella package's bin/
  #[serde(default)]
  pub launcher_dir: Option<PathBuf>,

  /// Post-install script shipped with the umbrella package
  #[serde(default)]
  pub postinstall: Option<PathBuf>,
}

fn default_registry_command() -> String {
  "npm".to_string()
}

fn default_access() -> String {
  "public".to_string()
}

impl Default for RegistryConfig {
  fn default() -> Self {
    Self {
      command: default_registry_command(),
      access: default_access(),
      launcher_dir: None,
      postinstall: None,
    }
  }
}

/// External build steps for each target
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildConfig {
  /// Directory of the companion native component, relative to the workspace
  #[serde(default = "default_companion_dir")]
  pub companion_dir: PathBuf,

  /// Entry point of the companion component, relative to companion_dir
  #[serde(default = "default_companion_main")]
  pub companion_main: PathBuf,

  /// Link-time variable receiving the version string
  #[serde(default = "default_companion_define")]
  pub companion_define: String,

  /// File name of the intermediate companion binary inside the bundle
  #[serde(default = "default_companion_bin")]
  pub companion_bin: String,

  /// Entry point of the primary executable, relative to the workspace
  #[serde(default = "default_entrypoint")]
  pub entrypoint: PathBuf,

  /// Compile-time constant receiving the version string
  #[serde(default = "default_version_define")]
  pub version_define: String,
}

fn default_companion_dir() -> PathBuf {
  PathBuf::from("../companion")
}

fn default_companion_main() -> PathBuf {
  PathBuf::from("cmd/main.go")
}

fn default_companion_define() -> String {
  "main.Version".to_string()
}

fn default_companion_bin() -> String {
  "companion".to_string()
}

fn default_entrypoint() -> PathBuf {
  PathBuf::from("src/index.ts")
}

fn default_version_define() -> String {
  "APP_VERSION".to_string()
}

impl Default for BuildConfig {
  fn default() -> Self {
    Self {
      companion_dir: default_companion_dir(),
      companion_main: default_companion_main(),
      companion_define: default_companion_define(),
      companion_bin: default_companion_bin(),
      entrypoint: default_entrypoint(),
      version_define: default_version_define(),
    }
  }
}

/// Downstream package-manager channels; either family may be disabled
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DownstreamConfig {
  #[serde(default)]
  pub pkgbuild: Option<PkgbuildConfig>,

  #[serde(default)]
  pub formula: Option<FormulaConfig>,
}

/// Distro-recipe family (one remote repository per variant)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PkgbuildConfig {
  /// Recipe variants, each pushed to `<remote_base>/<variant>.git`
  pub variants: Vec<String>,

  /// Remote transport base; a local path here targets test repositories
  #[serde(default = "default_pkgbuild_remote_base")]
  pub remote_base: String,

  #[serde(default)]
  pub maintainers: Vec<String>,

  #[serde(default)]
  pub depends: Vec<String>,

  #[serde(default)]
  pub provides: Vec<String>,

  #[serde(default)]
  pub conflicts: Vec<String>,
}

fn default_pkgbuild_remote_base() -> String {
  "ssh://aur@aur.archlinux.org".to_string()
}

impl PkgbuildConfig {
  pub fn remote_for(&self, variant: &str) -> String {
    format!("{}/{}.git", self.remote_base.trim_end_matches('/'), variant)
  }
}

/// Formula-recipe family (single remote repository)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormulaConfig {
  /// Tap repository in owner/name form, cloned over authenticated https
  pub repo: String,

  /// Recipe file name inside the tap (defaults to `<package>.rb`)
  #[serde(default)]
  pub file: Option<String>,

  /// Full remote override; used by tests to point at a local repository
  #[serde(default)]
  pub remote_override: Option<String>,
}

impl FormulaConfig {
  pub fn file_name(&self, package: &str) -> String {
    self.file.clone().unwrap_or_else(|| format!("{}.rb", package))
  }
}
