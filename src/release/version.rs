//! Version resolution for the two release channels
//!
//! Stable releases derive their version from the most recent reachable
//! tag; snapshots synthesize one from the current UTC minute. The version
//! is resolved exactly once per run and shared by every bundle, the
//! umbrella package, the forge release, and both downstream families.

use crate::core::error::{ShipError, ShipResult};
use crate::core::vcs::Git;
use chrono::{DateTime, Utc};

/// Publishing channel, selecting version scheme and downstream stages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
  Stable,
  Snapshot,
}

impl Channel {
  /// Registry distribution tag for this channel
  pub fn registry_tag(&self) -> &'static str {
    match self {
      Channel::Stable => "latest",
      Channel::Snapshot => "snapshot",
    }
  }

  pub fn is_snapshot(&self) -> bool {
    matches!(self, Channel::Snapshot)
  }
}

/// A resolved release; immutable once created
#[derive(Debug, Clone)]
pub struct Release {
  pub version: String,
  pub channel: Channel,
}

/// Synthetic snapshot version: `0.0.0-` + UTC minute with separators stripped
///
/// Minute precision means two snapshot builds within the same minute
/// collide. Known limitation carried from the reference behavior; sub-minute
/// precision is deliberately not added.
pub fn snapshot_version(at: DateTime<Utc>) -> String {
  format!("0.0.0-{}", at.format("%Y%m%d%H%M"))
}

/// Resolve the release version for a channel
///
/// Stable mode fails with `VersionUnresolved` before anything is built:
/// a run without a tag must not leave a partial build matrix behind.
pub fn resolve_version(git: &Git, channel: Channel) -> ShipResult<String> {
  match channel {
    Channel::Snapshot => Ok(snapshot_version(Utc::now())),
    Channel::Stable => {
      let tag = git.latest_tag()?.ok_or_else(|| ShipError::VersionUnresolved {
        detail: "no tag reachable from HEAD".to_string(),
      })?;
      let version = tag.strip_prefix('v').unwrap_or(&tag).to_string();
      semver::Version::parse(&version).map_err(|e| ShipError::VersionUnresolved {
        detail: format!("tag '{}' is not a semantic version: {}", tag, e),
      })?;
      Ok(version)
    }
  }
}

/// Version with any pre-release suffix after the first hyphen dropped
///
/// Downstream recipe formats (pkgver, formula version) only accept the
/// numeric core.
pub fn numeric_version(version: &str) -> &str {
  version.split('-').next().unwrap_or(version)
}
