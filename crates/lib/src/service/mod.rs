//! Service definitions.
//!
//! A [`Service`] is assembled with chained calls. None of them fail: problems
//! such as a missing environment variable are recorded on the service and the
//! chain carries on. They surface together when the manifest is rendered.

mod types;

use std::fmt::Display;

use thiserror::Error;

use crate::env::{ResolveError, SecretAwareEnvironment};
use crate::ordered::OrderedMap;
use crate::secrets::SecretsSink;

pub use types::{HealthCheck, NamedVolume, Network, Volume, is_valid_name};

/// A problem recorded while building a service or found when rendering it.
#[derive(Debug, Clone, Error)]
pub enum ServiceError {
  #[error("service {service}: {source}")]
  Environment {
    service: String,
    #[source]
    source: ResolveError,
  },

  #[error("service {service}: bind mount {binding:?} needs both a source and a target")]
  InvalidBindMount { service: String, binding: String },

  #[error("service {service}: invalid {kind} name {name:?}")]
  InvalidName {
    service: String,
    kind: &'static str,
    name: String,
  },

  #[error("container name {name} is used by more than one service")]
  DuplicateContainerName { name: String },
}

impl ServiceError {
  /// The variable name, for errors raised by environment resolution.
  pub fn variable(&self) -> Option<&str> {
    match self {
      ServiceError::Environment { source, .. } => Some(source.key()),
      _ => None,
    }
  }
}

/// One container's definition.
#[derive(Debug, Clone)]
pub struct Service {
  name: String,
  container_name: String,
  image: Option<String>,
  ports: Vec<String>,
  environment: OrderedMap<String, String>,
  volumes: Vec<Volume>,
  depends_on: Vec<String>,
  command: Option<String>,
  networks: Vec<Network>,
  restart: Option<String>,
  healthcheck: Option<HealthCheck>,
  errors: Vec<ServiceError>,
}

impl Service {
  /// Create a service; its container name starts out equal to `name`.
  pub fn new(name: impl Into<String>) -> Self {
    let name = name.into();
    Self {
      container_name: name.clone(),
      name,
      image: None,
      ports: Vec::new(),
      environment: OrderedMap::new(),
      volumes: Vec::new(),
      depends_on: Vec::new(),
      command: None,
      networks: Vec::new(),
      restart: None,
      healthcheck: None,
      errors: Vec::new(),
    }
  }

  pub fn image(mut self, image: impl Into<String>) -> Self {
    self.image = Some(image.into());
    self
  }

  pub fn container_name(mut self, container_name: impl Into<String>) -> Self {
    self.container_name = container_name.into();
    self
  }

  /// Append a `host:container` port mapping. Duplicates are kept.
  pub fn port(mut self, host: impl Display, container: impl Display) -> Self {
    self.ports.push(format!("{}:{}", host, container));
    self
  }

  /// Add an environment variable.
  ///
  /// With `value` the literal is used in the manifest. Without it the
  /// variable is read from the process environment and the manifest gets a
  /// `${KEY}` placeholder. Either way a non-empty value is recorded in the
  /// environment's secrets sink.
  ///
  /// If the variable can't be resolved the error is recorded on the service
  /// and `key` is left out of its environment.
  pub fn environment<S: SecretsSink>(
    mut self,
    env: &mut SecretAwareEnvironment<S>,
    key: &str,
    value: Option<&str>,
  ) -> Self {
    match env.resolve(key, value) {
      Ok(resolved) => {
        self.environment.insert(key.to_string(), resolved.public);
      }
      Err(source) => self.errors.push(ServiceError::Environment {
        service: self.name.clone(),
        source,
      }),
    }
    self
  }

  /// Append a volume. Bind mounts need both paths and named volumes a valid
  /// name; otherwise the problem is recorded and the volume dropped.
  pub fn volume(mut self, volume: impl Into<Volume>) -> Self {
    let volume = volume.into();
    let problem = match &volume {
      Volume::Bind { source, target } if source.is_empty() || target.is_empty() => {
        Some(ServiceError::InvalidBindMount {
          service: self.name.clone(),
          binding: volume.binding(),
        })
      }
      Volume::Named(named) if !is_valid_name(&named.name) => Some(ServiceError::InvalidName {
        service: self.name.clone(),
        kind: "volume",
        name: named.name.clone(),
      }),
      _ => None,
    };
    match problem {
      Some(error) => self.errors.push(error),
      None => self.volumes.push(volume),
    }
    self
  }

  /// Record dependencies on `services`, in order. Neither duplicates nor
  /// cycles are checked.
  pub fn depends_on(mut self, services: &[&Service]) -> Self {
    self
      .depends_on
      .extend(services.iter().map(|service| service.name.clone()));
    self
  }

  pub fn command(mut self, command: impl Into<String>) -> Self {
    self.command = Some(command.into());
    self
  }

  pub fn network(mut self, network: impl Into<Network>) -> Self {
    let network = network.into();
    if is_valid_name(&network.name) {
      self.networks.push(network);
    } else {
      self.errors.push(ServiceError::InvalidName {
        service: self.name.clone(),
        kind: "network",
        name: network.name,
      });
    }
    self
  }

  pub fn restart(mut self, policy: impl Into<String>) -> Self {
    self.restart = Some(policy.into());
    self
  }

  pub fn healthcheck(mut self, healthcheck: HealthCheck) -> Self {
    self.healthcheck = Some(healthcheck);
    self
  }

  pub fn name(&self) -> &str {
    &self.name
  }

  /// Key of this service in the manifest. Falls back to `name` if the
  /// container name was set to an empty string.
  pub fn manifest_key(&self) -> &str {
    if self.container_name.is_empty() {
      &self.name
    } else {
      &self.container_name
    }
  }

  pub fn image_ref(&self) -> Option<&str> {
    self.image.as_deref()
  }

  pub fn ports(&self) -> &[String] {
    &self.ports
  }

  /// Variable name to public value, in the order variables were first added.
  pub fn environment_vars(&self) -> &OrderedMap<String, String> {
    &self.environment
  }

  pub fn volumes(&self) -> &[Volume] {
    &self.volumes
  }

  pub fn dependencies(&self) -> &[String] {
    &self.depends_on
  }

  pub fn command_line(&self) -> Option<&str> {
    self.command.as_deref()
  }

  pub fn networks(&self) -> &[Network] {
    &self.networks
  }

  pub fn restart_policy(&self) -> Option<&str> {
    self.restart.as_deref()
  }

  pub fn health(&self) -> Option<&HealthCheck> {
    self.healthcheck.as_ref()
  }

  /// Problems recorded so far. Empty means the service can be rendered.
  pub fn errors(&self) -> &[ServiceError] {
    &self.errors
  }
}
