//! End-to-end pipeline scenarios with a stubbed toolchain
//!
//! git runs for real against temp repositories; go/bun/npm/gh are stubbed
//! behind the CommandRunner seam.

use crate::helpers::{StubForge, StubRunner, TestWorkspace, last_commit_subject, test_config};
use shipline::core::error::ShipError;
use shipline::release::archive::digest_file;
use shipline::release::pipeline::Pipeline;
use shipline::release::version::Channel;

#[test]
fn test_stable_release_end_to_end() {
  let ws = TestWorkspace::new().unwrap();
  ws.tag("v1.2.3").unwrap();
  ws.seeded_bare_repo("acme").unwrap();
  ws.seeded_bare_repo("acme-bin").unwrap();
  let tap = ws.seeded_bare_repo("tap").unwrap();

  let config = test_config(
    Some(&ws.root().to_string_lossy()),
    Some(&tap.to_string_lossy()),
  );
  let runner = StubRunner::new();
  let forge = StubForge::new();

  let pipeline = Pipeline {
    config: &config,
    runner: &runner,
    forge: &forge,
    workspace: ws.path.clone(),
    dry: false,
  };
  let release = pipeline.run(Channel::Stable).unwrap();
  assert_eq!(release.version, "1.2.3");

  // One bundle per target, deterministically named.
  for name in [
    "acme-linux-arm64",
    "acme-linux-x64",
    "acme-darwin-x64",
    "acme-darwin-arm64",
    "acme-windows-x64",
  ] {
    assert!(ws.file_exists(&format!("dist/{}/package.json", name)), "missing {}", name);
    assert!(ws.file_exists(&format!("dist/{}.zip", name)), "missing {}.zip", name);
  }

  // Umbrella published last, with exactly the published set as optional deps.
  let publishes = runner.calls_for("npm");
  assert_eq!(publishes.len(), 6);
  assert!(publishes[5].cwd.as_ref().unwrap().ends_with("dist/acme"));
  assert!(publishes.iter().all(|c| c.args.contains(&"latest".to_string())));

  let umbrella: serde_json::Value = serde_json::from_str(&ws.read_file("dist/acme/package.json").unwrap()).unwrap();
  let deps = umbrella["optionalDependencies"].as_object().unwrap();
  assert_eq!(deps.len(), 5);
  assert!(deps.keys().all(|k| k.starts_with("acme-")));
  assert!(deps.values().all(|v| v == "1.2.3"));
  assert_eq!(umbrella["version"], "1.2.3");

  // Forge release v1.2.3 with all five archives attached.
  let gh = runner.calls_for("gh");
  assert_eq!(gh.len(), 1);
  assert!(gh[0].args.contains(&"v1.2.3".to_string()));
  let attached = gh[0].args.iter().filter(|a| a.ends_with(".zip")).count();
  assert_eq!(attached, 5);

  // Notes filtered and ordered.
  let notes_idx = gh[0].args.iter().position(|a| a == "--notes").unwrap();
  assert_eq!(gh[0].args[notes_idx + 1], "- feat: add x\n- fix: bug");

  // Downstream recipes rendered with the numeric version and real digests.
  let pkgbuild = ws.read_file("dist/aur-acme/PKGBUILD").unwrap();
  assert!(pkgbuild.contains("pkgver=1.2.3"));
  let arm64_digest = digest_file(&ws.path.join("dist/acme-linux-arm64.zip")).unwrap();
  assert!(pkgbuild.contains(&arm64_digest));
  assert!(ws.file_exists("dist/aur-acme/.SRCINFO"));

  let formula = ws.read_file("dist/formula-tap/acme.rb").unwrap();
  assert!(formula.contains("version \"1.2.3\""));
  let mac_arm64_digest = digest_file(&ws.path.join("dist/acme-darwin-arm64.zip")).unwrap();
  assert!(formula.contains(&mac_arm64_digest));

  // Both families pushed to their remotes.
  assert_eq!(last_commit_subject(&ws.root().join("acme.git")).unwrap(), "Update to v1.2.3");
  assert_eq!(last_commit_subject(&ws.root().join("acme-bin.git")).unwrap(), "Update to v1.2.3");
  assert_eq!(last_commit_subject(&tap).unwrap(), "Update to v1.2.3");
}

#[test]
fn test_snapshot_publishes_registry_only() {
  let ws = TestWorkspace::new().unwrap();
  let config = test_config(None, None);
  let runner = StubRunner::new();
  let forge = StubForge::offline();

  let pipeline = Pipeline {
    config: &config,
    runner: &runner,
    forge: &forge,
    workspace: ws.path.clone(),
    dry: false,
  };
  let release = pipeline.run(Channel::Snapshot).unwrap();

  assert!(release.version.starts_with("0.0.0-"));
  assert_eq!(release.version.len(), "0.0.0-".len() + 12);

  // Registry tag is snapshot; umbrella still publishes last.
  let publishes = runner.calls_for("npm");
  assert_eq!(publishes.len(), 6);
  assert!(publishes.iter().all(|c| c.args.contains(&"snapshot".to_string())));

  // No forge release, no archives, no downstream clones.
  assert!(runner.calls_for("gh").is_empty());
  assert!(runner.git_calls_with("clone").is_empty());
  let zips = std::fs::read_dir(ws.path.join("dist"))
    .unwrap()
    .filter_map(|e| e.ok())
    .filter(|e| e.path().extension().is_some_and(|ext| ext == "zip"))
    .count();
  assert_eq!(zips, 0);
}

#[test]
fn test_dry_run_mutates_nothing_remote() {
  let ws = TestWorkspace::new().unwrap();
  ws.tag("v1.2.3").unwrap();
  ws.seeded_bare_repo("acme").unwrap();
  ws.seeded_bare_repo("acme-bin").unwrap();
  let tap = ws.seeded_bare_repo("tap").unwrap();

  let config = test_config(
    Some(&ws.root().to_string_lossy()),
    Some(&tap.to_string_lossy()),
  );
  let runner = StubRunner::new();
  let forge = StubForge::new();

  let pipeline = Pipeline {
    config: &config,
    runner: &runner,
    forge: &forge,
    workspace: ws.path.clone(),
    dry: true,
  };
  pipeline.run(Channel::Stable).unwrap();

  // No registry publish, no forge release, no push.
  assert!(runner.calls_for("npm").is_empty());
  assert!(runner.calls_for("gh").is_empty());
  assert!(runner.git_calls_with("push").is_empty());

  // Local artifacts still produced: archives, digests, rendered manifests.
  assert!(ws.file_exists("dist/acme-linux-x64.zip"));
  assert!(ws.file_exists("dist/acme/package.json"));
  assert!(ws.read_file("dist/aur-acme/PKGBUILD").unwrap().contains("pkgver=1.2.3"));
  assert!(ws.read_file("dist/formula-tap/acme.rb").unwrap().contains("version \"1.2.3\""));

  // The commit exists in the local clone so the manifest is inspectable,
  // but the remote never saw it.
  assert_eq!(
    last_commit_subject(&ws.path.join("dist/aur-acme")).unwrap(),
    "Update to v1.2.3"
  );
  assert_eq!(last_commit_subject(&tap).unwrap(), "seed");
}

#[test]
fn test_build_failure_publishes_nothing() {
  let ws = TestWorkspace::new().unwrap();
  ws.tag("v1.2.3").unwrap();

  let config = test_config(None, None);
  let runner = StubRunner::failing(&["go"]);
  let forge = StubForge::new();

  let pipeline = Pipeline {
    config: &config,
    runner: &runner,
    forge: &forge,
    workspace: ws.path.clone(),
    dry: false,
  };
  let err = pipeline.run(Channel::Stable).unwrap_err();

  assert!(matches!(err, ShipError::BuildFailed { .. }));
  assert!(err.exit_code().as_i32() != 0);
  assert!(runner.calls_for("npm").is_empty());
  assert!(runner.calls_for("gh").is_empty());
}

#[test]
fn test_publish_failure_halts_before_umbrella() {
  let ws = TestWorkspace::new().unwrap();
  ws.tag("v1.2.3").unwrap();

  let config = test_config(None, None);
  let runner = StubRunner::failing(&["npm"]);
  let forge = StubForge::new();

  let pipeline = Pipeline {
    config: &config,
    runner: &runner,
    forge: &forge,
    workspace: ws.path.clone(),
    dry: false,
  };
  let err = pipeline.run(Channel::Stable).unwrap_err();

  assert!(matches!(err, ShipError::PublishFailed { .. }));
  // First bundle publish failed; nothing further was attempted.
  assert_eq!(runner.calls_for("npm").len(), 1);
  assert!(runner.calls_for("gh").is_empty());
  assert!(!ws.file_exists("dist/acme/package.json"));
}

#[test]
fn test_notes_failure_is_fatal_on_stable_channel() {
  let ws = TestWorkspace::new().unwrap();
  ws.tag("v1.2.3").unwrap();
  ws.seeded_bare_repo("acme").unwrap();
  ws.seeded_bare_repo("acme-bin").unwrap();

  let config = test_config(Some(&ws.root().to_string_lossy()), None);
  let runner = StubRunner::new();
  let forge = StubForge::offline();

  let pipeline = Pipeline {
    config: &config,
    runner: &runner,
    forge: &forge,
    workspace: ws.path.clone(),
    dry: false,
  };
  let err = pipeline.run(Channel::Stable).unwrap_err();

  assert!(matches!(err, ShipError::NotesUnavailable { .. }));
  // Release creation and downstream stages never ran.
  assert!(runner.calls_for("gh").is_empty());
  assert!(runner.git_calls_with("clone").is_empty());
}

#[test]
fn test_duplicate_release_surfaces_platform_error() {
  let ws = TestWorkspace::new().unwrap();
  ws.tag("v1.2.3").unwrap();

  let config = test_config(None, None);
  let runner = StubRunner::failing(&["gh"]);
  // The stub failure message does not mention duplicates, so this surfaces
  // as a generic forge failure; the dedicated duplicate mapping is covered
  // by unit tests.
  let forge = StubForge::new();

  let pipeline = Pipeline {
    config: &config,
    runner: &runner,
    forge: &forge,
    workspace: ws.path.clone(),
    dry: false,
  };
  let err = pipeline.run(Channel::Stable).unwrap_err();
  assert!(err.to_string().contains("release"));
}
