//! Output file locations.
//!
//! By default everything lives in the working directory:
//! `docker-compose.yml`, `.env` and `.gitignore`. Each can be overridden with
//! an environment variable; relative overrides are resolved against the
//! project root.

use std::path::{Path, PathBuf};

use crate::consts::{
  DEFAULT_IGNORE_FILE, DEFAULT_MANIFEST_FILE, DEFAULT_SECRETS_FILE, IGNORE_PATH_ENV, MANIFEST_PATH_ENV,
  SECRETS_PATH_ENV,
};
use crate::secrets::{DotenvStore, IgnoreList};

/// Where the manifest, secrets file and ignore file are written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectPaths {
  pub manifest: PathBuf,
  pub secrets: PathBuf,
  pub ignore: PathBuf,
}

impl Default for ProjectPaths {
  fn default() -> Self {
    Self {
      manifest: PathBuf::from(DEFAULT_MANIFEST_FILE),
      secrets: PathBuf::from(DEFAULT_SECRETS_FILE),
      ignore: PathBuf::from(DEFAULT_IGNORE_FILE),
    }
  }
}

impl ProjectPaths {
  /// Default file names under `root`.
  pub fn in_dir(root: impl AsRef<Path>) -> Self {
    let root = root.as_ref();
    Self {
      manifest: root.join(DEFAULT_MANIFEST_FILE),
      secrets: root.join(DEFAULT_SECRETS_FILE),
      ignore: root.join(DEFAULT_IGNORE_FILE),
    }
  }

  /// Like [`ProjectPaths::in_dir`], honoring `COMPOSEGEN_MANIFEST`,
  /// `COMPOSEGEN_ENV_FILE` and `COMPOSEGEN_IGNORE_FILE`.
  pub fn from_env(root: impl AsRef<Path>) -> Self {
    let root = root.as_ref();
    let resolve = |var: &str, default: &str| match std::env::var_os(var) {
      Some(value) if !value.is_empty() => root.join(value),
      _ => root.join(default),
    };

    Self {
      manifest: resolve(MANIFEST_PATH_ENV, DEFAULT_MANIFEST_FILE),
      secrets: resolve(SECRETS_PATH_ENV, DEFAULT_SECRETS_FILE),
      ignore: resolve(IGNORE_PATH_ENV, DEFAULT_IGNORE_FILE),
    }
  }

  /// Secrets store for these paths, keeping itself listed in the ignore file.
  pub fn dotenv_store(&self) -> DotenvStore {
    DotenvStore::with_ignore(&self.secrets, IgnoreList::new(&self.ignore))
  }
}
