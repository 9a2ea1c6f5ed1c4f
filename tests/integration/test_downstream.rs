//! Downstream family isolation and repository flow

use crate::helpers::{StubForge, StubRunner, TestWorkspace, last_commit_subject, test_config};
use shipline::core::error::ShipError;
use shipline::release::pipeline::Pipeline;
use shipline::release::version::Channel;

#[test]
fn test_failed_family_does_not_block_sibling() {
  let ws = TestWorkspace::new().unwrap();
  ws.tag("v1.2.3").unwrap();
  // No distro-recipe remotes exist, so both variant clones fail; the
  // formula tap is real and must still be updated.
  let missing = ws.sibling("missing-remotes").unwrap();
  let tap = ws.seeded_bare_repo("tap").unwrap();

  let config = test_config(Some(&missing.to_string_lossy()), Some(&tap.to_string_lossy()));
  let runner = StubRunner::new();
  let forge = StubForge::new();

  let pipeline = Pipeline {
    config: &config,
    runner: &runner,
    forge: &forge,
    workspace: ws.path.clone(),
    dry: false,
  };
  let err = pipeline.run(Channel::Stable).unwrap_err();

  match err {
    ShipError::DownstreamFailed { failures } => {
      assert_eq!(failures.len(), 2);
      assert!(failures.iter().all(|f| f.repository.contains("missing-remotes")));
    }
    other => panic!("expected DownstreamFailed, got {:?}", other),
  }

  // The sibling family completed and pushed despite the failures.
  assert_eq!(last_commit_subject(&tap).unwrap(), "Update to v1.2.3");
}

#[test]
fn test_downstream_failure_exit_code_is_nonzero() {
  let ws = TestWorkspace::new().unwrap();
  ws.tag("v1.2.3").unwrap();
  let missing = ws.sibling("missing-remotes").unwrap();

  let config = test_config(Some(&missing.to_string_lossy()), None);
  let runner = StubRunner::new();
  let forge = StubForge::new();

  let pipeline = Pipeline {
    config: &config,
    runner: &runner,
    forge: &forge,
    workspace: ws.path.clone(),
    dry: false,
  };
  let err = pipeline.run(Channel::Stable).unwrap_err();
  assert!(err.exit_code().as_i32() != 0);

  // Earlier stages already completed: the forge release was created.
  assert_eq!(runner.calls_for("gh").len(), 1);
}

#[test]
fn test_both_variants_get_their_own_repository() {
  let ws = TestWorkspace::new().unwrap();
  ws.tag("v1.2.3").unwrap();
  ws.seeded_bare_repo("acme").unwrap();
  ws.seeded_bare_repo("acme-bin").unwrap();

  let config = test_config(Some(&ws.root().to_string_lossy()), None);
  let runner = StubRunner::new();
  let forge = StubForge::new();

  let pipeline = Pipeline {
    config: &config,
    runner: &runner,
    forge: &forge,
    workspace: ws.path.clone(),
    dry: false,
  };
  pipeline.run(Channel::Stable).unwrap();

  // Each variant rendered into its own clone with its own pkgname.
  let main_recipe = ws.read_file("dist/aur-acme/PKGBUILD").unwrap();
  let bin_recipe = ws.read_file("dist/aur-acme-bin/PKGBUILD").unwrap();
  assert!(main_recipe.contains("pkgname='acme'"));
  assert!(bin_recipe.contains("pkgname='acme-bin'"));

  // Identical substitution record otherwise: same version, same digests.
  assert!(main_recipe.contains("pkgver=1.2.3"));
  assert!(bin_recipe.contains("pkgver=1.2.3"));
}

#[test]
fn test_recipes_only_reference_linux_archives() {
  let ws = TestWorkspace::new().unwrap();
  ws.tag("v1.2.3").unwrap();
  ws.seeded_bare_repo("acme").unwrap();
  ws.seeded_bare_repo("acme-bin").unwrap();

  let config = test_config(Some(&ws.root().to_string_lossy()), None);
  let runner = StubRunner::new();
  let forge = StubForge::new();

  let pipeline = Pipeline {
    config: &config,
    runner: &runner,
    forge: &forge,
    workspace: ws.path.clone(),
    dry: false,
  };
  pipeline.run(Channel::Stable).unwrap();

  let recipe = ws.read_file("dist/aur-acme/PKGBUILD").unwrap();
  assert!(recipe.contains("acme-linux-arm64.zip"));
  assert!(recipe.contains("acme-linux-x64.zip"));
  assert!(!recipe.contains("darwin"));
  assert!(!recipe.contains("windows"));
}
