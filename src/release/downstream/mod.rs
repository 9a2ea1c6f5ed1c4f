//! Downstream package-manager manifest generation
//!
//! Two independent distribution channels: the distro-recipe family (one
//! remote repository per variant) and the formula family (one tap
//! repository). They depend only on the finalized version and the archive
//! digests, so they run concurrently, and a failure in one never blocks
//! the other — failures are collected and reported together at the end of
//! the pipeline.

pub mod formula;
pub mod pkgbuild;
pub mod repo;

use crate::core::config::ShiplineConfig;
use crate::core::error::{DownstreamFailure, ShipError, ShipResult};
use crate::core::process::CommandRunner;
use crate::release::archive::Archive;
use crate::release::downstream::formula::{FormulaContext, FormulaSource, class_name, formula_remote};
use crate::release::downstream::pkgbuild::PkgbuildContext;
use crate::release::downstream::repo::DownstreamRepo;
use crate::release::target::{Arch, Os};
use std::path::Path;

pub struct DownstreamInputs<'a> {
  pub config: &'a ShiplineConfig,
  pub runner: &'a dyn CommandRunner,
  pub workspace: &'a Path,
  pub version: &'a str,
  pub archives: &'a [Archive],
  pub dry: bool,
}

/// Run both families; aggregate failures into one report
pub fn run_all(inputs: &DownstreamInputs) -> ShipResult<()> {
  let (pkgbuild_failures, formula_failures) =
    rayon::join(|| run_pkgbuild_family(inputs), || run_formula_family(inputs));

  let mut failures = pkgbuild_failures;
  failures.extend(formula_failures);

  if failures.is_empty() {
    Ok(())
  } else {
    Err(ShipError::DownstreamFailed { failures })
  }
}

/// Distro-recipe family: one repository per variant, isolated failures
fn run_pkgbuild_family(inputs: &DownstreamInputs) -> Vec<DownstreamFailure> {
  let Some(family) = &inputs.config.downstream.pkgbuild else {
    return Vec::new();
  };

  let mut failures = Vec::new();
  for variant in &family.variants {
    println!("📜 updating distro recipe {}", variant);
    if let Err(e) = publish_variant(inputs, family, variant) {
      failures.push(DownstreamFailure {
        repository: family.remote_for(variant),
        reason: e.to_string(),
      });
    }
  }
  failures
}

fn publish_variant(
  inputs: &DownstreamInputs,
  family: &crate::core::config::PkgbuildConfig,
  variant: &str,
) -> ShipResult<()> {
  let arm64_digest = digest_for(inputs.archives, Os::Linux, Arch::Arm64)?;
  let x64_digest = digest_for(inputs.archives, Os::Linux, Arch::X64)?;

  let context = PkgbuildContext::new(inputs.config, family, variant, inputs.version, arm64_digest, x64_digest);

  let clone_dir = inputs.workspace.join("dist").join(format!("aur-{}", variant));
  let repo = DownstreamRepo::clone(inputs.runner, &family.remote_for(variant), clone_dir)?;
  repo.write_file("PKGBUILD", &context.render_pkgbuild())?;
  repo.write_file(".SRCINFO", &context.render_srcinfo())?;
  repo.commit_and_push(&["PKGBUILD", ".SRCINFO"], inputs.version, inputs.dry)
}

/// Formula family: a single tap repository
fn run_formula_family(inputs: &DownstreamInputs) -> Vec<DownstreamFailure> {
  let Some(family) = &inputs.config.downstream.formula else {
    return Vec::new();
  };

  println!("🍺 updating formula {}", family.repo);
  if let Err(e) = publish_formula(inputs, family) {
    return vec![DownstreamFailure {
      repository: family.repo.clone(),
      reason: e.to_string(),
    }];
  }
  Vec::new()
}

fn publish_formula(inputs: &DownstreamInputs, family: &crate::core::config::FormulaConfig) -> ShipResult<()> {
  let package = &inputs.config.package;
  let tag = format!("v{}", inputs.version);
  let source = |os: Os, arch: Arch| -> ShipResult<FormulaSource> {
    let asset = format!("{}-{}-{}.zip", package.name, os, arch);
    Ok(FormulaSource {
      url: inputs.config.forge.download_url(&tag, &asset),
      digest: digest_for(inputs.archives, os, arch)?.to_string(),
    })
  };

  let context = FormulaContext {
    class_name: class_name(&package.name),
    desc: package.description.clone(),
    homepage: package.homepage.clone().unwrap_or_else(|| inputs.config.forge.html_url()),
    version: inputs.version.to_string(),
    executable: package.executable().to_string(),
    mac_x64: source(Os::Darwin, Arch::X64)?,
    mac_arm64: source(Os::Darwin, Arch::Arm64)?,
    linux_x64: source(Os::Linux, Arch::X64)?,
    linux_arm64: source(Os::Linux, Arch::Arm64)?,
  };

  let token = std::env::var("GITHUB_TOKEN").ok();
  let remote = formula_remote(&family.repo, family.remote_override.as_deref(), token.as_deref(), inputs.dry)?;

  let clone_dir = inputs.workspace.join("dist").join("formula-tap");
  let repo = DownstreamRepo::clone(inputs.runner, &remote, clone_dir)?;
  let file = family.file_name(&package.name);
  repo.write_file(&file, &context.render())?;
  repo.commit_and_push(&[&file], inputs.version, inputs.dry)
}

/// Digest for one target's archive; every built target must have one
fn digest_for(archives: &[Archive], os: Os, arch: Arch) -> ShipResult<&str> {
  archives
    .iter()
    .find(|a| a.target.os == os && a.target.arch == arch)
    .map(|a| a.digest.as_str())
    .ok_or_else(|| ShipError::message(format!("no archive digest for {}-{}", os, arch)))
}
