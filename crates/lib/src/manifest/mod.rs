//! The manifest document.
//!
//! A [`ManifestDocument`] holds services in declaration order plus the
//! volumes and networks they reference. Shared resources are derived once,
//! when the document is created, in order of first appearance.
//!
//! Validation is deferred: a document can hold services with pending errors
//! and only refuses to render or save.

mod render;

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::{DEFAULT_NETWORK_DRIVER, DEFAULT_VOLUME_DRIVER};
use crate::ordered::OrderedMap;
use crate::service::{Service, ServiceError, Volume};
use crate::writer::{SaveOutcome, WriteError, save_if_different};

pub use render::{AggregateError, quote, render};

/// Errors from [`ManifestDocument::save_if_different`].
#[derive(Debug, Error)]
pub enum ComposeError {
  #[error(transparent)]
  Render(#[from] AggregateError),

  #[error(transparent)]
  Write(#[from] WriteError),
}

/// A document-level volume or network entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SharedResource {
  pub name: String,
  pub driver: Option<String>,
}

/// A complete manifest.
#[derive(Debug, Clone)]
pub struct ManifestDocument {
  version: String,
  services: Vec<Service>,
  volumes: Vec<SharedResource>,
  networks: Vec<SharedResource>,
}

impl ManifestDocument {
  /// Collect `services` in the given order and derive shared resources.
  ///
  /// Named volumes (bind mounts excluded) and networks are registered once
  /// each, in the order they first appear across services. The first
  /// appearance decides the driver; unset drivers default to `local` for
  /// volumes and `bridge` for networks.
  pub fn new(version: impl Into<String>, services: Vec<Service>) -> Self {
    let mut volumes: OrderedMap<String, Option<String>> = OrderedMap::new();
    let mut networks: OrderedMap<String, Option<String>> = OrderedMap::new();

    for service in &services {
      for volume in service.volumes() {
        let Volume::Named(named) = volume else {
          continue;
        };
        if !volumes.contains_key(&named.name) {
          let driver = named.driver.clone().unwrap_or_else(|| DEFAULT_VOLUME_DRIVER.to_string());
          volumes.insert(named.name.clone(), Some(driver));
        }
      }
      for network in service.networks() {
        if !networks.contains_key(&network.name) {
          let driver = network.driver.clone().unwrap_or_else(|| DEFAULT_NETWORK_DRIVER.to_string());
          networks.insert(network.name.clone(), Some(driver));
        }
      }
    }

    Self {
      version: version.into(),
      services,
      volumes: into_resources(volumes),
      networks: into_resources(networks),
    }
  }

  pub fn version(&self) -> &str {
    &self.version
  }

  pub fn services(&self) -> &[Service] {
    &self.services
  }

  /// Named volumes referenced by any service.
  pub fn volumes(&self) -> &[SharedResource] {
    &self.volumes
  }

  /// Networks referenced by any service.
  pub fn networks(&self) -> &[SharedResource] {
    &self.networks
  }

  /// Every error recorded on the services, in declaration order.
  pub fn pending_errors(&self) -> impl Iterator<Item = &ServiceError> {
    self.services.iter().flat_map(|service| service.errors())
  }

  /// Render the canonical manifest text.
  pub fn render(&self) -> Result<String, AggregateError> {
    render(self)
  }

  /// Render and write to `path` if the file doesn't already hold the same text.
  ///
  /// # Errors
  ///
  /// [`ComposeError::Render`] if any service has pending errors; the file is
  /// not touched. [`ComposeError::Write`] if reading or writing fails.
  pub fn save_if_different(&self, path: impl AsRef<Path>) -> Result<SaveOutcome, ComposeError> {
    let rendered = self.render()?;
    Ok(save_if_different(path.as_ref(), rendered.as_bytes())?)
  }
}

fn into_resources(map: OrderedMap<String, Option<String>>) -> Vec<SharedResource> {
  map
    .iter()
    .map(|(name, driver)| SharedResource {
      name: name.clone(),
      driver: driver.clone(),
    })
    .collect()
}
