//! Version resolution against real git repositories

use crate::helpers::TestWorkspace;
use shipline::core::error::ShipError;
use shipline::core::process::SystemRunner;
use shipline::core::vcs::Git;
use shipline::release::version::{Channel, resolve_version};

#[test]
fn test_stable_version_from_tag() {
  let ws = TestWorkspace::new().unwrap();
  ws.tag("v1.2.3").unwrap();

  let git = Git::new(&SystemRunner, &ws.path);
  let version = resolve_version(&git, Channel::Stable).unwrap();
  assert_eq!(version, "1.2.3");
}

#[test]
fn test_stable_version_is_stable_for_fixed_repo_state() {
  let ws = TestWorkspace::new().unwrap();
  ws.tag("v2.0.0").unwrap();

  let git = Git::new(&SystemRunner, &ws.path);
  let first = resolve_version(&git, Channel::Stable).unwrap();
  let second = resolve_version(&git, Channel::Stable).unwrap();
  assert_eq!(first, second);
}

#[test]
fn test_missing_tag_aborts_before_any_build() {
  let ws = TestWorkspace::new().unwrap();

  let git = Git::new(&SystemRunner, &ws.path);
  let err = resolve_version(&git, Channel::Stable).unwrap_err();
  assert!(matches!(err, ShipError::VersionUnresolved { .. }));
}

#[test]
fn test_non_semver_tag_is_rejected() {
  let ws = TestWorkspace::new().unwrap();
  ws.tag("nightly-build").unwrap();

  let git = Git::new(&SystemRunner, &ws.path);
  let err = resolve_version(&git, Channel::Stable).unwrap_err();
  assert!(matches!(err, ShipError::VersionUnresolved { .. }));
}

#[test]
fn test_snapshot_version_needs_no_tag() {
  let ws = TestWorkspace::new().unwrap();

  let git = Git::new(&SystemRunner, &ws.path);
  let version = resolve_version(&git, Channel::Snapshot).unwrap();
  assert!(version.starts_with("0.0.0-"));
  let stamp = version.strip_prefix("0.0.0-").unwrap();
  assert_eq!(stamp.len(), 12);
  assert!(stamp.chars().all(|c| c.is_ascii_digit()));
}
