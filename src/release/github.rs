//! Forge release creation via the gh CLI
//!
//! Exactly one tagged release per pipeline run, with every archive
//! attached as a binary asset. Re-running for an existing tag is a
//! platform-level duplicate, surfaced as its own error rather than an
//! overwrite.

use crate::core::error::{ShipError, ShipResult};
use crate::core::process::{CommandRunner, NETWORK_TIMEOUT, ProcessCommand};
use crate::release::archive::Archive;
use std::path::Path;

/// Create release `v<version>` with notes and archive assets
pub fn create_release(
  runner: &dyn CommandRunner,
  workspace: &Path,
  version: &str,
  notes: &str,
  archives: &[Archive],
  dry: bool,
) -> ShipResult<()> {
  let tag = format!("v{}", version);

  if dry {
    println!("   🔍 dry-run: skipping forge release {}", tag);
    return Ok(());
  }

  let mut cmd = ProcessCommand::new("gh")
    .args(["release", "create"])
    .arg(tag.as_str())
    .arg("--title")
    .arg(tag.as_str())
    .arg("--notes")
    .arg(notes)
    .cwd(workspace)
    .timeout(NETWORK_TIMEOUT);
  for archive in archives {
    cmd = cmd.arg(archive.path.to_string_lossy());
  }

  let output = runner.run(&cmd)?;
  if !output.success() {
    if output.stderr.to_lowercase().contains("already exists") {
      return Err(ShipError::ReleaseAlreadyExists { tag });
    }
    return Err(ShipError::message(format!(
      "Forge release creation failed for {}:\n{}",
      tag,
      output.stderr.trim_end()
    )));
  }

  println!("   🏷️  created release {} with {} assets", tag, archives.len());
  Ok(())
}
