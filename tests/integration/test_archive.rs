//! Archive determinism over real files

use shipline::release::archive::{archive_bundle, digest_file};
use shipline::release::bundle::ArtifactBundle;
use shipline::release::target::{Arch, Os, Target};
use std::fs;
use std::path::Path;

fn fixture_bundle(root: &Path, payload: &[u8]) -> ArtifactBundle {
  let target = Target::new(Os::Linux, Arch::X64);
  let dir = root.join("acme-linux-x64");
  fs::create_dir_all(dir.join("bin")).unwrap();
  fs::write(dir.join("bin").join("acme"), payload).unwrap();
  ArtifactBundle {
    target,
    name: "acme-linux-x64".to_string(),
    dir,
  }
}

#[test]
fn test_same_bytes_same_archive_same_digest() {
  let root = tempfile::tempdir().unwrap();
  let bundle = fixture_bundle(root.path(), b"deterministic payload");

  let dist_a = root.path().join("a");
  let dist_b = root.path().join("b");
  fs::create_dir_all(&dist_a).unwrap();
  fs::create_dir_all(&dist_b).unwrap();

  let first = archive_bundle(&bundle, &dist_a).unwrap();
  let second = archive_bundle(&bundle, &dist_b).unwrap();

  assert_eq!(fs::read(&first.path).unwrap(), fs::read(&second.path).unwrap());
  assert_eq!(first.digest, second.digest);
}

#[test]
fn test_digest_matches_archive_bytes_on_disk() {
  let root = tempfile::tempdir().unwrap();
  let bundle = fixture_bundle(root.path(), b"payload");
  let dist = root.path().join("dist");
  fs::create_dir_all(&dist).unwrap();

  let archive = archive_bundle(&bundle, &dist).unwrap();
  assert_eq!(archive.digest, digest_file(&archive.path).unwrap());
}

#[test]
fn test_rebuilt_archive_with_new_content_changes_digest() {
  let root = tempfile::tempdir().unwrap();
  let dist = root.path().join("dist");
  fs::create_dir_all(&dist).unwrap();

  let bundle = fixture_bundle(root.path(), b"version one");
  let first = archive_bundle(&bundle, &dist).unwrap();

  fs::write(bundle.bin_dir().join("acme"), b"version two").unwrap();
  let second = archive_bundle(&bundle, &dist).unwrap();

  assert_ne!(first.digest, second.digest);
}
