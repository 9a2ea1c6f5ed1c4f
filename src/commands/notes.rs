//! Notes command implementation

use crate::core::config::ShiplineConfig;
use crate::core::error::ShipResult;
use crate::release::notes::{ForgeClient, HttpForge, filter_notes};
use std::env;

/// Print the release notes that a stable publish would attach
pub fn run_notes(from: Option<String>) -> ShipResult<()> {
  let workspace = env::current_dir()?;
  let config = ShiplineConfig::load(&workspace)?;
  let forge = HttpForge::new(&config.forge);

  let base = match from {
    Some(tag) => tag,
    None => forge.latest_release_tag()?,
  };

  let lines = forge.compare(&base, "HEAD")?;
  let kept = filter_notes(&lines);

  if kept.is_empty() {
    println!("No user-facing changes since {}", base);
    return Ok(());
  }

  println!("Changes since {}:", base);
  for line in kept {
    println!("- {}", line);
  }
  Ok(())
}
