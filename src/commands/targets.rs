//! Targets command implementation

use crate::core::config::ShiplineConfig;
use crate::core::error::ShipResult;
use crate::release::target::Target;
use std::env;

/// List the fixed build matrix and the bundle names it produces
pub fn run_targets() -> ShipResult<()> {
  let workspace = env::current_dir()?;
  let package = if ShiplineConfig::exists(&workspace) {
    Some(ShiplineConfig::load(&workspace)?.package.name)
  } else {
    None
  };

  for target in Target::all() {
    match &package {
      Some(name) => println!("{}  →  {}", target, target.bundle_name(name)),
      None => println!("{}", target),
    }
  }
  Ok(())
}
