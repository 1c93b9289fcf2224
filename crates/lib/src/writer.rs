//! Idempotent, atomic file persistence.
//!
//! Rendered manifests are compared against what's on disk and written only
//! when they differ. Writes go to a temp file in the target directory which is
//! then renamed over the destination, so a failed write never leaves a
//! truncated file behind.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;
use tracing::{debug, info};

/// Errors from reading or writing the manifest file.
#[derive(Debug, Error)]
pub enum WriteError {
  #[error("failed to read {}: {source}", path.display())]
  Read { path: PathBuf, source: io::Error },

  #[error("failed to write {}: {source}", path.display())]
  Write { path: PathBuf, source: io::Error },
}

/// What [`save_if_different`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SaveOutcome {
  /// The file didn't exist and was created.
  Created,
  /// The file existed with different content and was replaced.
  Updated,
  /// The file already held exactly this content; nothing was written.
  Unchanged,
}

impl SaveOutcome {
  pub fn wrote(self) -> bool {
    !matches!(self, SaveOutcome::Unchanged)
  }
}

/// Full SHA-256 of `bytes` as lowercase hex.
pub fn content_hash(bytes: &[u8]) -> String {
  hex::encode(Sha256::digest(bytes))
}

/// Write `rendered` to `path` unless the file already holds identical bytes.
///
/// # Errors
///
/// Returns [`WriteError::Read`] if the existing file can't be read (a missing
/// file is not an error) and [`WriteError::Write`] if the new content can't be
/// persisted. In both cases the previous file is left as it was.
pub fn save_if_different(path: &Path, rendered: &[u8]) -> Result<SaveOutcome, WriteError> {
  let outcome = match fs::read(path) {
    Ok(current) if current == rendered => {
      debug!(path = %path.display(), "manifest unchanged");
      return Ok(SaveOutcome::Unchanged);
    }
    Ok(_) => SaveOutcome::Updated,
    Err(e) if e.kind() == io::ErrorKind::NotFound => SaveOutcome::Created,
    Err(source) => {
      return Err(WriteError::Read {
        path: path.to_path_buf(),
        source,
      });
    }
  };

  write_atomic(path, rendered).map_err(|source| WriteError::Write {
    path: path.to_path_buf(),
    source,
  })?;

  info!(
    path = %path.display(),
    outcome = ?outcome,
    hash = %content_hash(rendered),
    "wrote manifest"
  );
  Ok(outcome)
}

/// Replace `path` with `bytes` via temp file and rename.
///
/// The temp file is created next to `path` so the rename stays on one
/// filesystem. If anything fails before the rename, the temp file is removed
/// and `path` is untouched. An existing file keeps its permissions; a new one
/// gets 0644 on Unix.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> io::Result<()> {
  let dir = match path.parent() {
    Some(parent) if !parent.as_os_str().is_empty() => parent,
    _ => Path::new("."),
  };

  let mut temp = tempfile::NamedTempFile::new_in(dir)?;
  temp.write_all(bytes)?;
  match fs::metadata(path) {
    Ok(existing) => temp.as_file().set_permissions(existing.permissions())?,
    Err(e) if e.kind() == io::ErrorKind::NotFound => set_new_file_permissions(temp.as_file())?,
    Err(e) => return Err(e),
  }
  temp.as_file().sync_all()?;
  temp.persist(path).map_err(|e| e.error)?;
  Ok(())
}

#[cfg(unix)]
fn set_new_file_permissions(file: &fs::File) -> io::Result<()> {
  use std::os::unix::fs::PermissionsExt;

  file.set_permissions(fs::Permissions::from_mode(0o644))
}

#[cfg(not(unix))]
fn set_new_file_permissions(_file: &fs::File) -> io::Result<()> {
  Ok(())
}
