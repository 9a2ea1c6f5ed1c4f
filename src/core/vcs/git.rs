//! System git wrapper
//!
//! Uses the system git binary through the [`CommandRunner`] seam with an
//! isolated environment. The pipeline needs only a narrow slice of git:
//! tag lookup for version resolution, and clone/commit/push for the
//! downstream manifest repositories.

use crate::core::error::ShipResult;
use crate::core::process::{CommandRunner, NETWORK_TIMEOUT, ProcessCommand};
use std::path::{Path, PathBuf};

const COMMIT_IDENTITY_NAME: &str = "shipline";
const COMMIT_IDENTITY_EMAIL: &str = "shipline@localhost";

pub struct Git<'a> {
  runner: &'a dyn CommandRunner,
  repo: PathBuf,
}

impl<'a> Git<'a> {
  pub fn new(runner: &'a dyn CommandRunner, repo: impl Into<PathBuf>) -> Self {
    Self {
      runner,
      repo: repo.into(),
    }
  }

  /// Clone a remote into `dest`, replacing any stale checkout
  pub fn clone_repo(runner: &'a dyn CommandRunner, remote: &str, dest: &Path) -> ShipResult<Git<'a>> {
    if dest.exists() {
      std::fs::remove_dir_all(dest)?;
    }
    let cmd = git_base(None)
      .args(["clone", remote])
      .arg(dest.to_string_lossy())
      .timeout(NETWORK_TIMEOUT);
    runner.run_checked(&cmd)?;
    Ok(Git::new(runner, dest))
  }

  /// Most recent tag reachable from HEAD, or None when the repo has no tags
  pub fn latest_tag(&self) -> ShipResult<Option<String>> {
    let output = self.runner.run(&self.cmd(["describe", "--tags", "--abbrev=0"]))?;
    if !output.success() {
      return Ok(None);
    }
    Ok(Some(output.stdout_trimmed().to_string()))
  }

  /// Current HEAD commit SHA
  pub fn head_commit(&self) -> ShipResult<String> {
    let output = self.runner.run_checked(&self.cmd(["rev-parse", "HEAD"]))?;
    Ok(output.stdout_trimmed().to_string())
  }

  pub fn add(&self, paths: &[&str]) -> ShipResult<()> {
    let mut cmd = self.cmd(["add"]);
    for path in paths {
      cmd = cmd.arg(*path);
    }
    self.runner.run_checked(&cmd)?;
    Ok(())
  }

  /// Commit with a fixed pipeline identity; host git config is not consulted
  pub fn commit(&self, message: &str) -> ShipResult<()> {
    let cmd = self
      .cmd(["commit", "-m", message])
      .env("GIT_AUTHOR_NAME", COMMIT_IDENTITY_NAME)
      .env("GIT_AUTHOR_EMAIL", COMMIT_IDENTITY_EMAIL)
      .env("GIT_COMMITTER_NAME", COMMIT_IDENTITY_NAME)
      .env("GIT_COMMITTER_EMAIL", COMMIT_IDENTITY_EMAIL);
    self.runner.run_checked(&cmd)?;
    Ok(())
  }

  pub fn push(&self) -> ShipResult<()> {
    let cmd = self.cmd(["push"]).timeout(NETWORK_TIMEOUT);
    self.runner.run_checked(&cmd)?;
    Ok(())
  }

  fn cmd<const N: usize>(&self, args: [&str; N]) -> ProcessCommand {
    git_base(Some(&self.repo)).args(args)
  }
}

/// Safe git invocation: isolated environment, pinned configuration
fn git_base(repo: Option<&Path>) -> ProcessCommand {
  let mut cmd = ProcessCommand::new("git").env_clear();
  if let Some(repo) = repo {
    cmd = cmd.arg("-C").arg(repo.to_string_lossy());
  }
  cmd
    .args(["-c", "protocol.version=2"])
    .args(["-c", "advice.detachedHead=false"])
    .args(["-c", "core.quotePath=false"])
}
