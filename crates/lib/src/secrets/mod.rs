//! Destinations for private environment values.
//!
//! Resolving an environment variable for a service produces a private value
//! that must never reach the manifest. It is handed to a [`SecretsSink`]
//! instead:
//! - [`DotenvStore`]: a `KEY=value` file next to the manifest, registered in an
//!   ignore file so it stays out of version control
//! - [`MemorySecrets`]: keeps values in memory, for tests and dry runs

mod dotenv;
mod ignore;

use std::io;

use crate::ordered::OrderedMap;

pub use dotenv::DotenvStore;
pub use ignore::IgnoreList;

/// Receives private values as environment variables are resolved.
pub trait SecretsSink {
  /// Add `key` or overwrite its current value.
  fn upsert(&mut self, key: &str, value: &str) -> io::Result<()>;
}

impl<S: SecretsSink + ?Sized> SecretsSink for &mut S {
  fn upsert(&mut self, key: &str, value: &str) -> io::Result<()> {
    (**self).upsert(key, value)
  }
}

impl<S: SecretsSink + ?Sized> SecretsSink for Box<S> {
  fn upsert(&mut self, key: &str, value: &str) -> io::Result<()> {
    (**self).upsert(key, value)
  }
}

/// In-memory sink preserving first-upsert order.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct MemorySecrets {
  values: OrderedMap<String, String>,
}

impl MemorySecrets {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn get(&self, key: &str) -> Option<&str> {
    self.values.get(key).map(String::as_str)
  }

  pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
    self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
  }

  pub fn len(&self) -> usize {
    self.values.len()
  }

  pub fn is_empty(&self) -> bool {
    self.values.is_empty()
  }
}

impl SecretsSink for MemorySecrets {
  fn upsert(&mut self, key: &str, value: &str) -> io::Result<()> {
    self.values.insert(key.to_string(), value.to_string());
    Ok(())
  }
}
