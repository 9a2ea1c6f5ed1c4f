//! Build matrix runner
//!
//! For each target, two external build steps run in sequence: the
//! companion native component is cross-compiled with the version embedded
//! via a link-time define, then the primary executable is compiled and
//! bundled with the companion merged in, after which the intermediate
//! companion binary is deleted. Targets build in parallel; a failure for
//! any one target aborts the whole run so the registry never sees a
//! partial artifact set.

use crate::core::config::ShiplineConfig;
use crate::core::error::{ShipError, ShipResult};
use crate::core::process::{CommandRunner, ProcessCommand};
use crate::release::bundle::{ArtifactBundle, BundleDescriptor};
use crate::release::target::Target;
use crate::ui::progress::MultiProgress;
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};

pub struct BuildMatrix<'a> {
  config: &'a ShiplineConfig,
  runner: &'a dyn CommandRunner,
  workspace: &'a Path,
  version: &'a str,
}

impl<'a> BuildMatrix<'a> {
  pub fn new(config: &'a ShiplineConfig, runner: &'a dyn CommandRunner, workspace: &'a Path, version: &'a str) -> Self {
    Self {
      config,
      runner,
      workspace,
      version,
    }
  }

  /// Build every target in the matrix, all-targets-or-none
  pub fn build_all(&self) -> ShipResult<Vec<ArtifactBundle>> {
    let targets = Target::all();
    let progress = MultiProgress::new();
    let bar = progress.add_bar(targets.len(), format!("building {} targets", targets.len()));

    let results: Vec<ShipResult<ArtifactBundle>> = targets
      .par_iter()
      .map(|target| {
        let bundle = self.build_target(*target);
        progress.inc(&bar);
        bundle
      })
      .collect();

    let mut bundles = Vec::with_capacity(results.len());
    for result in results {
      bundles.push(result?);
    }
    Ok(bundles)
  }

  /// Build one target: companion, primary bundle, descriptor
  pub fn build_target(&self, target: Target) -> ShipResult<ArtifactBundle> {
    let name = target.bundle_name(&self.config.package.name);
    let dir = self.dist_dir().join(&name);
    let bin_dir = dir.join("bin");
    fs::create_dir_all(&bin_dir)?;

    let companion_path = bin_dir.join(&self.config.build.companion_bin);

    self
      .runner
      .run_checked(&self.companion_command(target, &companion_path))
      .map_err(|e| ShipError::BuildFailed {
        target: target.to_string(),
        detail: e.to_string(),
      })?;

    self
      .runner
      .run_checked(&self.bundle_command(target, &name, &companion_path))
      .map_err(|e| ShipError::BuildFailed {
        target: target.to_string(),
        detail: e.to_string(),
      })?;

    // The companion is merged into the final single-file artifact; drop
    // the intermediate.
    if companion_path.exists() {
      fs::remove_file(&companion_path)?;
    }

    let bundle = ArtifactBundle { target, name, dir };
    let descriptor = BundleDescriptor::new(&bundle, self.version);
    fs::write(
      bundle.descriptor_path(),
      format!("{}\n", serde_json::to_string_pretty(&descriptor)?),
    )?;

    Ok(bundle)
  }

  /// Cross-compile the companion native component for one target
  fn companion_command(&self, target: Target, out: &Path) -> ProcessCommand {
    let build = &self.config.build;
    ProcessCommand::new("go")
      .args(["build", "-ldflags"])
      .arg(format!("-s -w -X {}={}", build.companion_define, self.version))
      .arg("-o")
      .arg(out.to_string_lossy())
      .arg(build.companion_main.to_string_lossy())
      .cwd(self.workspace.join(&build.companion_dir))
      .env("CGO_ENABLED", "0")
      .env("GOOS", target.os.as_str())
      .env("GOARCH", target.arch.goarch())
  }

  /// Compile and bundle the primary executable, merging the companion
  fn bundle_command(&self, target: Target, name: &str, companion: &Path) -> ProcessCommand {
    let build = &self.config.build;
    let outfile = PathBuf::from("dist")
      .join(name)
      .join("bin")
      .join(self.config.package.executable());
    ProcessCommand::new("bun")
      .args(["build", "--compile", "--minify"])
      .arg(format!("--define={}='{}'", build.version_define, self.version))
      .arg(format!("--target={}", target.bun_target()))
      .arg(format!("--outfile={}", outfile.display()))
      .arg(build.entrypoint.to_string_lossy())
      .arg(companion.to_string_lossy())
      .cwd(self.workspace)
  }

  fn dist_dir(&self) -> PathBuf {
    self.workspace.join("dist")
  }
}
