//! Registry publishing
//!
//! Bundles publish one at a time under the channel's distribution tag;
//! the first failure halts everything that follows, including the
//! umbrella package. The umbrella descriptor is a pure fold over the
//! bundles that actually published, so its optional-dependency map can
//! never reference an unpublished package.

use crate::core::config::ShiplineConfig;
use crate::core::error::{ShipError, ShipResult};
use crate::core::process::{CommandRunner, NETWORK_TIMEOUT, ProcessCommand};
use crate::release::bundle::ArtifactBundle;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Evidence that one bundle was accepted by the registry
#[derive(Debug, Clone)]
pub struct PublishedBundle {
  pub name: String,
  pub version: String,
}

/// Umbrella registry descriptor: no executable of its own, every
/// per-target bundle declared as an optional dependency
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UmbrellaDescriptor {
  pub name: String,
  #[serde(skip_serializing_if = "BTreeMap::is_empty", default)]
  pub bin: BTreeMap<String, String>,
  #[serde(skip_serializing_if = "Option::is_none", default)]
  pub scripts: Option<UmbrellaScripts>,
  pub version: String,
  #[serde(rename = "optionalDependencies")]
  pub optional_dependencies: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UmbrellaScripts {
  pub postinstall: String,
}

/// Build the umbrella descriptor from the published set
///
/// The optional-dependency map contains exactly one entry per published
/// bundle — never a superset or subset.
pub fn umbrella_descriptor(config: &ShiplineConfig, version: &str, published: &[PublishedBundle]) -> UmbrellaDescriptor {
  let optional_dependencies: BTreeMap<String, String> = published
    .iter()
    .map(|p| (p.name.clone(), p.version.clone()))
    .collect();

  let mut bin = BTreeMap::new();
  if config.registry.launcher_dir.is_some() {
    bin.insert(
      config.package.name.clone(),
      format!("./bin/{}", config.package.executable()),
    );
  }

  let scripts = config.registry.postinstall.as_ref().and_then(|p| p.file_name()).map(|f| UmbrellaScripts {
    postinstall: format!("node ./{}", f.to_string_lossy()),
  });

  UmbrellaDescriptor {
    name: config.package.name.clone(),
    bin,
    scripts,
    version: version.to_string(),
    optional_dependencies,
  }
}

pub struct RegistryPublisher<'a> {
  config: &'a ShiplineConfig,
  runner: &'a dyn CommandRunner,
  workspace: &'a Path,
  tag: &'a str,
  dry: bool,
}

impl<'a> RegistryPublisher<'a> {
  pub fn new(
    config: &'a ShiplineConfig,
    runner: &'a dyn CommandRunner,
    workspace: &'a Path,
    tag: &'a str,
    dry: bool,
  ) -> Self {
    Self {
      config,
      runner,
      workspace,
      tag,
      dry,
    }
  }

  /// Publish every bundle in order, halting on the first failure
  pub fn publish_all(&self, bundles: &[ArtifactBundle], version: &str) -> ShipResult<Vec<PublishedBundle>> {
    let mut published = Vec::with_capacity(bundles.len());
    for bundle in bundles {
      println!("📦 publishing {} @{}", bundle.name, self.tag);
      self.publish_dir(&bundle.dir, &bundle.name)?;
      published.push(PublishedBundle {
        name: bundle.name.clone(),
        version: version.to_string(),
      });
    }
    Ok(published)
  }

  /// Assemble and publish the umbrella package after all bundles
  pub fn publish_umbrella(&self, version: &str, published: &[PublishedBundle]) -> ShipResult<()> {
    let name = &self.config.package.name;
    let dir = self.workspace.join("dist").join(name);
    fs::create_dir_all(&dir)?;

    if let Some(launcher) = &self.config.registry.launcher_dir {
      copy_dir(&self.workspace.join(launcher), &dir.join("bin"))?;
    }
    if let Some(postinstall) = &self.config.registry.postinstall {
      let source = self.workspace.join(postinstall);
      let file_name = source
        .file_name()
        .ok_or_else(|| ShipError::message(format!("registry.postinstall has no file name: {}", source.display())))?
        .to_owned();
      fs::copy(&source, dir.join(file_name))?;
    }

    let descriptor = umbrella_descriptor(self.config, version, published);
    fs::write(
      dir.join("package.json"),
      format!("{}\n", serde_json::to_string_pretty(&descriptor)?),
    )?;

    println!("📦 publishing {} @{}", name, self.tag);
    self.publish_dir(&dir, name)
  }

  fn publish_dir(&self, dir: &Path, bundle: &str) -> ShipResult<()> {
    if self.dry {
      println!("   🔍 dry-run: skipping registry publish");
      return Ok(());
    }

    let registry = &self.config.registry;
    let cmd = ProcessCommand::new(registry.command.as_str())
      .args(["publish", "--access"])
      .arg(registry.access.as_str())
      .arg("--tag")
      .arg(self.tag)
      .cwd(dir)
      .timeout(NETWORK_TIMEOUT);

    self.runner.run_checked(&cmd).map_err(|e| ShipError::PublishFailed {
      bundle: bundle.to_string(),
      detail: e.to_string(),
    })?;
    Ok(())
  }
}

fn copy_dir(source: &Path, dest: &Path) -> ShipResult<()> {
  fs::create_dir_all(dest)?;
  for entry in fs::read_dir(source)? {
    let entry = entry?;
    let target: PathBuf = dest.join(entry.file_name());
    if entry.file_type()?.is_dir() {
      copy_dir(&entry.path(), &target)?;
    } else {
      fs::copy(entry.path(), target)?;
    }
  }
  Ok(())
}
