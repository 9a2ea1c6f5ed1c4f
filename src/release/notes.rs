//! Release notes from the forge comparison API
//!
//! The previous release tag and the commit range come from the forge's
//! read-only REST endpoints. Commit order is whatever the comparison API
//! returns — it is preserved, never resorted. Lines matching the category
//! denylist are dropped.

use crate::core::config::ForgeConfig;
use crate::core::error::{ShipError, ShipResult};
use serde::Deserialize;
use std::sync::OnceLock;
use std::time::Duration;

/// First-line categories excluded from user-facing notes
pub const NOTES_DENYLIST: [&str; 6] = ["ignore:", "chore:", "ci:", "wip:", "docs:", "doc:"];

/// Request deadline for forge API lookups
const API_TIMEOUT: Duration = Duration::from_secs(30);

/// Read-only forge lookups used by the notes stage
///
/// Production uses [`HttpForge`]; tests substitute a stub.
pub trait ForgeClient: Send + Sync {
  /// Tag name of the most recently published release
  fn latest_release_tag(&self) -> ShipResult<String>;

  /// Ordered commit summaries (first lines) in `base...head`
  fn compare(&self, base: &str, head: &str) -> ShipResult<Vec<String>>;
}

#[derive(Deserialize)]
struct LatestRelease {
  tag_name: String,
}

#[derive(Deserialize)]
struct Comparison {
  #[serde(default)]
  commits: Vec<ComparisonCommit>,
}

#[derive(Deserialize)]
struct ComparisonCommit {
  commit: CommitDetail,
}

#[derive(Deserialize)]
struct CommitDetail {
  message: String,
}

/// ureq-backed forge client
pub struct HttpForge {
  api_base: String,
  repo: String,
}

impl HttpForge {
  pub fn new(forge: &ForgeConfig) -> Self {
    Self {
      api_base: forge.api_base.trim_end_matches('/').to_string(),
      repo: forge.repo.clone(),
    }
  }

  fn get(&self, path: &str) -> ShipResult<String> {
    let url = format!("{}/repos/{}/{}", self.api_base, self.repo, path);
    let response = agent()
      .get(&url)
      .header("User-Agent", "shipline")
      .header("Accept", "application/vnd.github+json")
      .call()
      .map_err(|e| ShipError::NotesUnavailable {
        detail: format!("GET {}: {}", url, e),
      })?;
    response
      .into_body()
      .read_to_string()
      .map_err(|e| ShipError::NotesUnavailable {
        detail: format!("GET {}: {}", url, e),
      })
  }
}

impl ForgeClient for HttpForge {
  fn latest_release_tag(&self) -> ShipResult<String> {
    let body = self.get("releases/latest")?;
    let latest: LatestRelease = serde_json::from_str(&body).map_err(|e| ShipError::NotesUnavailable {
      detail: format!("latest release response: {}", e),
    })?;
    Ok(latest.tag_name)
  }

  fn compare(&self, base: &str, head: &str) -> ShipResult<Vec<String>> {
    let body = self.get(&format!("compare/{}...{}", base, head))?;
    let comparison: Comparison = serde_json::from_str(&body).map_err(|e| ShipError::NotesUnavailable {
      detail: format!("comparison response: {}", e),
    })?;
    Ok(
      comparison
        .commits
        .iter()
        .map(|c| c.commit.message.lines().next().unwrap_or("").to_string())
        .collect(),
    )
  }
}

/// Shared agent with a global request timeout
fn agent() -> &'static ureq::Agent {
  static AGENT: OnceLock<ureq::Agent> = OnceLock::new();
  AGENT.get_or_init(|| {
    let config = ureq::Agent::config_builder()
      .timeout_global(Some(API_TIMEOUT))
      .build();
    ureq::Agent::new_with_config(config)
  })
}

/// Drop lines whose lowercase form contains a denylisted category marker
pub fn filter_notes<S: AsRef<str>>(lines: &[S]) -> Vec<String> {
  lines
    .iter()
    .map(|line| line.as_ref())
    .filter(|line| {
      let lower = line.to_lowercase();
      !NOTES_DENYLIST.iter().any(|marker| lower.contains(marker))
    })
    .map(str::to_string)
    .collect()
}

/// Generate the notes body for the pending release
pub fn generate_notes(forge: &dyn ForgeClient) -> ShipResult<String> {
  let previous = forge.latest_release_tag()?;
  let lines = forge.compare(&previous, "HEAD")?;
  let kept = filter_notes(&lines);
  Ok(
    kept
      .iter()
      .map(|line| format!("- {}", line))
      .collect::<Vec<_>>()
      .join("\n"),
  )
}
