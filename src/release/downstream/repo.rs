//! Shared shape for downstream repository updates
//!
//! Every downstream family follows clone → render → commit → push. The
//! commit always happens, even in dry mode, so the generated manifest
//! remains inspectable in the local clone; only the push is suppressed.

use crate::core::error::ShipResult;
use crate::core::process::CommandRunner;
use crate::core::vcs::Git;
use std::fs;
use std::path::PathBuf;

pub struct DownstreamRepo<'a> {
  runner: &'a dyn CommandRunner,
  pub dir: PathBuf,
}

impl<'a> DownstreamRepo<'a> {
  /// Clone `remote` into `dir`, replacing any clone from a previous run
  pub fn clone(runner: &'a dyn CommandRunner, remote: &str, dir: PathBuf) -> ShipResult<Self> {
    Git::clone_repo(runner, remote, &dir)?;
    Ok(Self { runner, dir })
  }

  pub fn write_file(&self, name: &str, contents: &str) -> ShipResult<()> {
    fs::write(self.dir.join(name), contents)?;
    Ok(())
  }

  /// Commit the rendered files; push unless dry
  pub fn commit_and_push(&self, files: &[&str], version: &str, dry: bool) -> ShipResult<()> {
    let git = Git::new(self.runner, &self.dir);
    git.add(files)?;
    git.commit(&format!("Update to v{}", version))?;
    if dry {
      println!("   🔍 dry-run: skipping push from {}", self.dir.display());
      return Ok(());
    }
    git.push()
  }
}
