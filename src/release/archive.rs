//! Archiving and checksum computation
//!
//! Each bundle's bin/ directory compresses into `dist/<bundle>.zip`, then
//! a streaming SHA-256 digest is taken over the archive bytes. Entries are
//! written in sorted order with fixed metadata so identical input bytes
//! always produce byte-identical archives — digests embedded in downstream
//! manifests must match the published archives exactly.

use crate::core::error::{ShipError, ShipResult};
use crate::release::bundle::ArtifactBundle;
use crate::release::target::Target;
use sha2::{Digest, Sha256};
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use zip::CompressionMethod;
use zip::write::SimpleFileOptions;

/// A compressed bundle with its content digest
#[derive(Debug, Clone)]
pub struct Archive {
  pub target: Target,
  pub bundle_name: String,
  pub path: PathBuf,
  /// Hex-encoded SHA-256 of the archive bytes
  pub digest: String,
}

impl Archive {
  /// File name under the forge release: `<bundle>.zip`
  pub fn asset_name(&self) -> String {
    format!("{}.zip", self.bundle_name)
  }
}

/// Compress one bundle and digest the result
pub fn archive_bundle(bundle: &ArtifactBundle, dist: &Path) -> ShipResult<Archive> {
  let path = dist.join(format!("{}.zip", bundle.name));
  write_zip(&bundle.bin_dir(), &path)?;
  let digest = digest_file(&path)?;
  Ok(Archive {
    target: bundle.target,
    bundle_name: bundle.name.clone(),
    path,
    digest,
  })
}

/// Write the files of `source` into a deterministic zip at `dest`
fn write_zip(source: &Path, dest: &Path) -> ShipResult<()> {
  let file = fs::File::create(dest)?;
  let mut writer = zip::ZipWriter::new(file);

  // Fixed timestamp and options: same input bytes, same archive bytes.
  let options = SimpleFileOptions::default()
    .compression_method(CompressionMethod::Deflated)
    .unix_permissions(0o755)
    .last_modified_time(zip::DateTime::default());

  let mut entries: Vec<PathBuf> = fs::read_dir(source)?
    .filter_map(|entry| entry.ok())
    .map(|entry| entry.path())
    .filter(|path| path.is_file())
    .collect();
  entries.sort();

  if entries.is_empty() {
    return Err(ShipError::message(format!(
      "nothing to archive in {}",
      source.display()
    )));
  }

  for path in entries {
    let name = path
      .file_name()
      .and_then(|n| n.to_str())
      .ok_or_else(|| ShipError::message(format!("non-UTF-8 file name in {}", source.display())))?;
    writer.start_file(name, options)?;
    let mut reader = fs::File::open(&path)?;
    std::io::copy(&mut reader, &mut writer)?;
  }

  writer.finish()?;
  Ok(())
}

/// Streaming SHA-256 over a file, hex-encoded lowercase
pub fn digest_file(path: &Path) -> ShipResult<String> {
  let mut file = fs::File::open(path)?;
  let mut hasher = Sha256::new();
  let mut buffer = [0u8; 8192];
  loop {
    let read = file.read(&mut buffer)?;
    if read == 0 {
      break;
    }
    hasher.update(&buffer[..read]);
  }
  Ok(format!("{:x}", hasher.finalize()))
}
