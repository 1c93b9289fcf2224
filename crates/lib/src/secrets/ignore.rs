use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::writer::write_atomic;

/// An ignore file (e.g. `.gitignore`) that entries can be added to.
#[derive(Debug, Clone)]
pub struct IgnoreList {
  path: PathBuf,
}

impl IgnoreList {
  pub fn new(path: impl Into<PathBuf>) -> Self {
    Self { path: path.into() }
  }

  pub fn path(&self) -> &Path {
    &self.path
  }

  /// Make sure `entry` appears as a line of the ignore file.
  ///
  /// Lines are compared with surrounding whitespace trimmed, so CRLF files
  /// match too. Existing lines are kept verbatim. When the entry is missing,
  /// trailing blank lines are dropped, the entry is appended and the file
  /// ends with a single newline. A missing file is created.
  ///
  /// Returns `true` if the file was written.
  pub fn ensure_entry(&self, entry: &str) -> io::Result<bool> {
    let content = match fs::read_to_string(&self.path) {
      Ok(content) => content,
      Err(e) if e.kind() == io::ErrorKind::NotFound => String::new(),
      Err(e) => return Err(e),
    };

    let mut lines: Vec<&str> = if content.is_empty() {
      Vec::new()
    } else {
      content.split('\n').collect()
    };

    if lines.iter().any(|line| line.trim() == entry) {
      debug!(path = %self.path.display(), entry, "ignore entry already present");
      return Ok(false);
    }

    while lines.last().is_some_and(|line| line.trim().is_empty()) {
      lines.pop();
    }
    lines.push(entry);

    let mut updated = lines.join("\n");
    updated.push('\n');
    write_atomic(&self.path, updated.as_bytes())?;

    info!(path = %self.path.display(), entry, "added ignore entry");
    Ok(true)
  }
}
