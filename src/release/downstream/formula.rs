//! Formula-recipe rendering
//!
//! One Ruby formula covers the four non-Windows targets with conditional
//! branches per CPU vendor and bitness. The tap repository is cloned over
//! authenticated https; the credential comes from the environment and its
//! absence fails only this family, and only outside dry mode.

use crate::core::error::{ShipError, ShipResult};
use crate::release::version::numeric_version;

/// Per-target source for one formula branch
#[derive(Debug, Clone)]
pub struct FormulaSource {
  pub url: String,
  pub digest: String,
}

/// Everything the formula needs substituted
#[derive(Debug, Clone)]
pub struct FormulaContext {
  pub class_name: String,
  pub desc: String,
  pub homepage: String,
  /// Numeric-only version (pre-release suffix dropped)
  pub version: String,
  pub executable: String,
  pub mac_x64: FormulaSource,
  pub mac_arm64: FormulaSource,
  pub linux_x64: FormulaSource,
  pub linux_arm64: FormulaSource,
}

impl FormulaContext {
  pub fn render(&self) -> String {
    let mut lines = Vec::new();
    lines.push("# typed: false".to_string());
    lines.push("# frozen_string_literal: true".to_string());
    lines.push(String::new());
    lines.push(format!("class {} < Formula", self.class_name));
    lines.push(format!("  desc \"{}\"", self.desc));
    lines.push(format!("  homepage \"{}\"", self.homepage));
    lines.push(format!("  version \"{}\"", numeric_version(&self.version)));
    lines.push(String::new());
    lines.push("  on_macos do".to_string());
    self.push_branch(&mut lines, "Hardware::CPU.intel?", &self.mac_x64);
    self.push_branch(&mut lines, "Hardware::CPU.arm?", &self.mac_arm64);
    lines.push("  end".to_string());
    lines.push(String::new());
    lines.push("  on_linux do".to_string());
    self.push_branch(
      &mut lines,
      "Hardware::CPU.intel? and Hardware::CPU.is_64_bit?",
      &self.linux_x64,
    );
    self.push_branch(
      &mut lines,
      "Hardware::CPU.arm? and Hardware::CPU.is_64_bit?",
      &self.linux_arm64,
    );
    lines.push("  end".to_string());
    lines.push("end".to_string());
    lines.push(String::new());
    lines.join("\n")
  }

  fn push_branch(&self, lines: &mut Vec<String>, condition: &str, source: &FormulaSource) {
    lines.push(format!("    if {}", condition));
    lines.push(format!("      url \"{}\"", source.url));
    lines.push(format!("      sha256 \"{}\"", source.digest));
    lines.push(String::new());
    lines.push("      def install".to_string());
    lines.push(format!("        bin.install \"{}\"", self.executable));
    lines.push("      end".to_string());
    lines.push("    end".to_string());
  }
}

/// Ruby class name for the formula: `acme-tool` → `AcmeTool`
pub fn class_name(package: &str) -> String {
  package
    .split(|c: char| !c.is_ascii_alphanumeric())
    .filter(|part| !part.is_empty())
    .map(|part| {
      let mut chars = part.chars();
      match chars.next() {
        Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
        None => String::new(),
      }
    })
    .collect()
}

/// Resolve the tap remote: explicit override, else authenticated https
///
/// A missing credential is fatal for this family outside dry mode; dry
/// runs clone anonymously since nothing will be pushed.
pub fn formula_remote(repo: &str, remote_override: Option<&str>, token: Option<&str>, dry: bool) -> ShipResult<String> {
  if let Some(remote) = remote_override {
    return Ok(remote.to_string());
  }
  match token {
    Some(token) => Ok(format!("https://{}@github.com/{}.git", token, repo)),
    None if dry => Ok(format!("https://github.com/{}.git", repo)),
    None => Err(ShipError::message(format!(
      "GITHUB_TOKEN is not set; cannot push to {}",
      repo
    ))),
  }
}
