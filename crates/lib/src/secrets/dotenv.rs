use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::{IgnoreList, SecretsSink};
use crate::ordered::OrderedMap;
use crate::writer::write_atomic;

/// A `KEY=value` secrets file.
///
/// Every upsert re-reads the file, so edits made by hand between calls are
/// kept. Existing keys stay where they are and new keys are appended. When an
/// [`IgnoreList`] is attached, the file's base name is added to it after each
/// upsert.
#[derive(Debug, Clone)]
pub struct DotenvStore {
  path: PathBuf,
  ignore: Option<IgnoreList>,
}

impl DotenvStore {
  /// A store that doesn't touch any ignore file.
  pub fn new(path: impl Into<PathBuf>) -> Self {
    Self {
      path: path.into(),
      ignore: None,
    }
  }

  /// A store that keeps itself listed in `ignore`.
  pub fn with_ignore(path: impl Into<PathBuf>, ignore: IgnoreList) -> Self {
    Self {
      path: path.into(),
      ignore: Some(ignore),
    }
  }

  pub fn path(&self) -> &Path {
    &self.path
  }

  /// Load the current entries.
  ///
  /// A missing file reads as empty. Lines are trimmed and split on the first
  /// `=`; lines without one are skipped.
  pub fn load(&self) -> io::Result<OrderedMap<String, String>> {
    let content = match fs::read_to_string(&self.path) {
      Ok(content) => content,
      Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(OrderedMap::new()),
      Err(e) => return Err(e),
    };

    Ok(
      content
        .lines()
        .filter_map(|line| line.trim().split_once('='))
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .collect(),
    )
  }

  fn save(&self, entries: &OrderedMap<String, String>) -> io::Result<()> {
    let mut content = String::new();
    for (key, value) in entries.iter() {
      content.push_str(key);
      content.push('=');
      content.push_str(value);
      content.push('\n');
    }
    write_atomic(&self.path, content.as_bytes())
  }

  fn ignore_entry(&self) -> Option<String> {
    self
      .path
      .file_name()
      .map(|name| name.to_string_lossy().into_owned())
  }
}

impl SecretsSink for DotenvStore {
  fn upsert(&mut self, key: &str, value: &str) -> io::Result<()> {
    let mut entries = self.load()?;

    if entries.get(key).map(String::as_str) == Some(value) {
      debug!(path = %self.path.display(), key, "secret unchanged");
    } else {
      entries.insert(key.to_string(), value.to_string());
      self.save(&entries)?;
      debug!(path = %self.path.display(), key, "stored secret");
    }

    if let (Some(ignore), Some(entry)) = (&self.ignore, self.ignore_entry()) {
      ignore.ensure_entry(&entry)?;
    }

    Ok(())
  }
}
