//! Distro-recipe rendering (PKGBUILD + .SRCINFO)
//!
//! Both files render from one typed substitution record, so the version,
//! URLs and digests can never drift apart between them. This family
//! targets Linux distributions exclusively: only the linux-arm64 and
//! linux-x64 archives appear as sources.

use crate::core::config::{PkgbuildConfig, ShiplineConfig};
use crate::release::version::numeric_version;

/// Everything a recipe variant needs substituted
#[derive(Debug, Clone)]
pub struct PkgbuildContext<'a> {
  pub pkgname: &'a str,
  /// Numeric-only version (pre-release suffix dropped)
  pub pkgver: String,
  pub pkgdesc: &'a str,
  pub url: String,
  pub executable: &'a str,
  pub license: &'a [String],
  pub maintainers: &'a [String],
  pub depends: &'a [String],
  pub provides: &'a [String],
  pub conflicts: &'a [String],
  pub arm64_url: String,
  pub arm64_digest: &'a str,
  pub x64_url: String,
  pub x64_digest: &'a str,
}

impl<'a> PkgbuildContext<'a> {
  pub fn new(
    config: &'a ShiplineConfig,
    family: &'a PkgbuildConfig,
    variant: &'a str,
    version: &str,
    arm64_digest: &'a str,
    x64_digest: &'a str,
  ) -> Self {
    let tag = format!("v{}", version);
    let package = &config.package;
    Self {
      pkgname: variant,
      pkgver: numeric_version(version).to_string(),
      pkgdesc: &package.description,
      url: package.homepage.clone().unwrap_or_else(|| config.forge.html_url()),
      executable: package.executable(),
      license: &package.license,
      maintainers: &family.maintainers,
      depends: &family.depends,
      provides: &family.provides,
      conflicts: &family.conflicts,
      arm64_url: config.forge.download_url(&tag, &format!("{}-linux-arm64.zip", package.name)),
      arm64_digest,
      x64_url: config.forge.download_url(&tag, &format!("{}-linux-x64.zip", package.name)),
      x64_digest,
    }
  }

  pub fn render_pkgbuild(&self) -> String {
    let mut lines = Vec::new();
    for maintainer in self.maintainers {
      lines.push(format!("# Maintainer: {}", maintainer));
    }
    lines.push(format!("pkgname='{}'", self.pkgname));
    lines.push(format!("pkgver={}", self.pkgver));
    lines.push("pkgrel=1".to_string());
    lines.push(format!("pkgdesc='{}'", self.pkgdesc));
    lines.push(format!("url='{}'", self.url));
    lines.push("options=('!debug' '!strip')".to_string());
    lines.push("arch=('aarch64' 'x86_64')".to_string());
    lines.push(format!("license=({})", quoted(self.license)));
    if !self.provides.is_empty() {
      lines.push(format!("provides=({})", quoted(self.provides)));
    }
    if !self.conflicts.is_empty() {
      lines.push(format!("conflicts=({})", quoted(self.conflicts)));
    }
    if !self.depends.is_empty() {
      lines.push(format!("depends=({})", quoted(self.depends)));
    }
    lines.push(String::new());
    lines.push(format!(
      "source_aarch64=(\"${{pkgname}}_${{pkgver}}_aarch64.zip::{}\")",
      self.arm64_url
    ));
    lines.push(format!("sha256sums_aarch64=('{}')", self.arm64_digest));
    lines.push(String::new());
    lines.push(format!(
      "source_x86_64=(\"${{pkgname}}_${{pkgver}}_x86_64.zip::{}\")",
      self.x64_url
    ));
    lines.push(format!("sha256sums_x86_64=('{}')", self.x64_digest));
    lines.push(String::new());
    lines.push("package() {".to_string());
    lines.push(format!(
      "  install -Dm755 ./{} \"${{pkgdir}}/usr/bin/{}\"",
      self.executable, self.executable
    ));
    lines.push("}".to_string());
    lines.push(String::new());
    lines.join("\n")
  }

  /// .SRCINFO rendered from the same record (no makepkg on the build host)
  pub fn render_srcinfo(&self) -> String {
    let mut lines = Vec::new();
    lines.push(format!("pkgbase = {}", self.pkgname));
    lines.push(format!("\tpkgdesc = {}", self.pkgdesc));
    lines.push(format!("\tpkgver = {}", self.pkgver));
    lines.push("\tpkgrel = 1".to_string());
    lines.push(format!("\turl = {}", self.url));
    lines.push("\tarch = aarch64".to_string());
    lines.push("\tarch = x86_64".to_string());
    for license in self.license {
      lines.push(format!("\tlicense = {}", license));
    }
    for provide in self.provides {
      lines.push(format!("\tprovides = {}", provide));
    }
    for conflict in self.conflicts {
      lines.push(format!("\tconflicts = {}", conflict));
    }
    for depend in self.depends {
      lines.push(format!("\tdepends = {}", depend));
    }
    lines.push(format!(
      "\tsource_aarch64 = {}_{}_aarch64.zip::{}",
      self.pkgname, self.pkgver, self.arm64_url
    ));
    lines.push(format!("\tsha256sums_aarch64 = {}", self.arm64_digest));
    lines.push(format!(
      "\tsource_x86_64 = {}_{}_x86_64.zip::{}",
      self.pkgname, self.pkgver, self.x64_url
    ));
    lines.push(format!("\tsha256sums_x86_64 = {}", self.x64_digest));
    lines.push(String::new());
    lines.push(format!("pkgname = {}", self.pkgname));
    lines.push(String::new());
    lines.join("\n")
  }
}

fn quoted(values: &[String]) -> String {
  values
    .iter()
    .map(|v| format!("'{}'", v))
    .collect::<Vec<_>>()
    .join(" ")
}
