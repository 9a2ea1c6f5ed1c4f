//! Publish command implementation

use crate::core::config::ShiplineConfig;
use crate::core::error::ShipResult;
use crate::core::process::SystemRunner;
use crate::release::notes::HttpForge;
use crate::release::pipeline::Pipeline;
use crate::release::version::Channel;
use std::env;

/// Run the release publishing pipeline
pub fn run_publish(dry: bool, snapshot: bool) -> ShipResult<()> {
  let workspace = env::current_dir()?;
  let config = ShiplineConfig::load(&workspace)?;

  let channel = if snapshot { Channel::Snapshot } else { Channel::Stable };
  let runner = SystemRunner;
  let forge = HttpForge::new(&config.forge);

  let pipeline = Pipeline {
    config: &config,
    runner: &runner,
    forge: &forge,
    workspace,
    dry,
  };

  pipeline.run(channel)?;
  Ok(())
}
