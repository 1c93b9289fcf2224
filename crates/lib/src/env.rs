//! Environment variable resolution with secret separation.
//!
//! A service variable has two values:
//! - the public value, written into the manifest
//! - the private value, handed to a [`SecretsSink`]
//!
//! An explicit value is used for both. Otherwise the variable is looked up in
//! the process environment; the manifest then gets a `${KEY}` placeholder for
//! the runtime to substitute and the actual value goes to the sink only.

use std::io;
use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, warn};

use crate::secrets::SecretsSink;

/// Why a variable couldn't be resolved.
#[derive(Debug, Clone, Error)]
pub enum ResolveError {
  #[error("environment variable {key} not found")]
  MissingEnvironmentVariable { key: String },

  #[error("failed to store secret {key}: {source}")]
  Secrets { key: String, source: Arc<io::Error> },
}

impl ResolveError {
  pub fn key(&self) -> &str {
    match self {
      ResolveError::MissingEnvironmentVariable { key } | ResolveError::Secrets { key, .. } => key,
    }
  }
}

/// The two faces of one resolved variable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved {
  /// Value written into the manifest.
  pub public: String,
  /// Value written to the secrets sink.
  pub private: String,
}

/// Format the manifest placeholder for `key`.
pub fn placeholder(key: &str) -> String {
  format!("${{{}}}", key)
}

/// Resolves variables and records their private values.
#[derive(Debug)]
pub struct SecretAwareEnvironment<S> {
  sink: S,
}

impl<S: SecretsSink> SecretAwareEnvironment<S> {
  pub fn new(sink: S) -> Self {
    Self { sink }
  }

  pub fn sink(&self) -> &S {
    &self.sink
  }

  pub fn into_sink(self) -> S {
    self.sink
  }

  /// Resolve `key`, preferring `explicit` over the process environment.
  ///
  /// A non-empty private value is upserted into the sink before returning,
  /// including values given explicitly.
  ///
  /// # Errors
  ///
  /// [`ResolveError::MissingEnvironmentVariable`] if there's no explicit value
  /// and the process environment doesn't define `key`; nothing is written to
  /// the sink in that case. [`ResolveError::Secrets`] if the sink fails.
  pub fn resolve(&mut self, key: &str, explicit: Option<&str>) -> Result<Resolved, ResolveError> {
    let resolved = match explicit {
      Some(value) => Resolved {
        public: value.to_string(),
        private: value.to_string(),
      },
      None => {
        let Some(value) = std::env::var_os(key) else {
          warn!(key, "environment variable not found");
          return Err(ResolveError::MissingEnvironmentVariable { key: key.to_string() });
        };
        Resolved {
          public: placeholder(key),
          private: value.to_string_lossy().into_owned(),
        }
      }
    };

    if !resolved.private.is_empty() {
      self
        .sink
        .upsert(key, &resolved.private)
        .map_err(|source| ResolveError::Secrets {
          key: key.to_string(),
          source: Arc::new(source),
        })?;
      debug!(key, "recorded private value");
    }

    Ok(resolved)
  }
}
