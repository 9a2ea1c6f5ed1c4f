//! The publishing pipeline
//!
//! Strictly ordered stages with a fan-out per target in the build matrix
//! and a fan-out/fan-in from archives into the forge release and the
//! downstream families. Failure policy per stage:
//!
//! - version, build, registry publish, notes, forge release: halt on error
//!   (hard data dependencies; nothing downstream may run on partial state)
//! - downstream families: isolated, collected, reported together
//!
//! The snapshot channel stops after the umbrella publish; it never creates
//! a forge release or touches downstream repositories.

use crate::core::config::ShiplineConfig;
use crate::core::error::ShipResult;
use crate::core::process::CommandRunner;
use crate::core::vcs::Git;
use crate::release::archive::{Archive, archive_bundle};
use crate::release::downstream::{self, DownstreamInputs};
use crate::release::github;
use crate::release::matrix::BuildMatrix;
use crate::release::notes::{ForgeClient, generate_notes};
use crate::release::registry::RegistryPublisher;
use crate::release::version::{Channel, Release, resolve_version};
use rayon::prelude::*;
use std::fs;
use std::path::PathBuf;

pub struct Pipeline<'a> {
  pub config: &'a ShiplineConfig,
  pub runner: &'a dyn CommandRunner,
  pub forge: &'a dyn ForgeClient,
  pub workspace: PathBuf,
  pub dry: bool,
}

impl Pipeline<'_> {
  pub fn run(&self, channel: Channel) -> ShipResult<Release> {
    // Version is resolved exactly once; every later stage shares it.
    let git = Git::new(self.runner, &self.workspace);
    let version = resolve_version(&git, channel)?;
    let release = Release {
      version,
      channel,
    };
    println!(
      "🚀 publishing {} ({} channel{})",
      release.version,
      if channel.is_snapshot() { "snapshot" } else { "stable" },
      if self.dry { ", dry-run" } else { "" }
    );

    self.reset_dist()?;

    // Fan-out: five independent target builds, all-or-nothing.
    let matrix = BuildMatrix::new(self.config, self.runner, &self.workspace, &release.version);
    let bundles = matrix.build_all()?;

    // Join point: umbrella publishes only after every bundle published.
    let publisher = RegistryPublisher::new(
      self.config,
      self.runner,
      &self.workspace,
      channel.registry_tag(),
      self.dry,
    );
    let published = publisher.publish_all(&bundles, &release.version)?;
    publisher.publish_umbrella(&release.version, &published)?;

    if channel.is_snapshot() {
      println!("✅ snapshot {} published", release.version);
      return Ok(release);
    }

    // Fan-out: archives and digests, one per bundle.
    let dist = self.workspace.join("dist");
    let archives: Vec<Archive> = bundles
      .par_iter()
      .map(|bundle| archive_bundle(bundle, &dist))
      .collect::<ShipResult<Vec<_>>>()?;

    let notes = generate_notes(self.forge)?;

    github::create_release(
      self.runner,
      &self.workspace,
      &release.version,
      &notes,
      &archives,
      self.dry,
    )?;

    downstream::run_all(&DownstreamInputs {
      config: self.config,
      runner: self.runner,
      workspace: &self.workspace,
      version: &release.version,
      archives: &archives,
      dry: self.dry,
    })?;

    println!("✅ release v{} complete", release.version);
    Ok(release)
  }

  /// Wipe dist/ exactly once at pipeline start
  fn reset_dist(&self) -> ShipResult<()> {
    let dist = self.workspace.join("dist");
    if dist.exists() {
      fs::remove_dir_all(&dist)?;
    }
    fs::create_dir_all(&dist)?;
    Ok(())
  }
}
