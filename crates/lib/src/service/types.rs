//! Value types embedded in a service definition.

use serde::{Deserialize, Serialize};

/// Whether `name` can key a service, volume or network entry:
/// `[a-zA-Z0-9][a-zA-Z0-9_.-]*`.
pub fn is_valid_name(name: &str) -> bool {
  let mut chars = name.chars();
  chars.next().is_some_and(|c| c.is_ascii_alphanumeric())
    && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
}

/// Container health probe.
///
/// `interval` and `timeout` are duration strings passed through verbatim
/// (e.g. `"30s"`). Empty strings and zero retries are left out of the manifest.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthCheck {
  pub test: Vec<String>,
  pub interval: String,
  pub timeout: String,
  pub retries: u32,
}

impl HealthCheck {
  pub fn new<I, T>(test: I) -> Self
  where
    I: IntoIterator<Item = T>,
    T: Into<String>,
  {
    Self {
      test: test.into_iter().map(Into::into).collect(),
      ..Self::default()
    }
  }

  pub fn interval(mut self, interval: impl Into<String>) -> Self {
    self.interval = interval.into();
    self
  }

  pub fn timeout(mut self, timeout: impl Into<String>) -> Self {
    self.timeout = timeout.into();
    self
  }

  pub fn retries(mut self, retries: u32) -> Self {
    self.retries = retries;
    self
  }
}

/// A volume reference registered at document level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedVolume {
  pub name: String,
  /// Mount point inside the container. Without one the manifest lists the
  /// bare name.
  pub target: Option<String>,
  /// Driver for the document-level entry; `local` when unset.
  pub driver: Option<String>,
}

impl NamedVolume {
  pub fn new(name: impl Into<String>) -> Self {
    Self {
      name: name.into(),
      target: None,
      driver: None,
    }
  }

  pub fn target(mut self, target: impl Into<String>) -> Self {
    self.target = Some(target.into());
    self
  }

  pub fn driver(mut self, driver: impl Into<String>) -> Self {
    self.driver = Some(driver.into());
    self
  }
}

/// A volume binding of a service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Volume {
  /// Host path mounted into the container, rendered `source:target`.
  Bind { source: String, target: String },
  /// Named volume, also registered in the document's `volumes:` section.
  Named(NamedVolume),
}

impl Volume {
  pub fn bind(source: impl Into<String>, target: impl Into<String>) -> Self {
    Volume::Bind {
      source: source.into(),
      target: target.into(),
    }
  }

  /// Start a named volume; finish it with [`NamedVolume::target`] or
  /// [`NamedVolume::driver`] as needed.
  pub fn named(name: impl Into<String>) -> NamedVolume {
    NamedVolume::new(name)
  }

  /// The service-level entry, e.g. `./data:/data` or `db_data`.
  pub fn binding(&self) -> String {
    match self {
      Volume::Bind { source, target } => format!("{}:{}", source, target),
      Volume::Named(named) => match &named.target {
        Some(target) => format!("{}:{}", named.name, target),
        None => named.name.clone(),
      },
    }
  }
}

impl From<NamedVolume> for Volume {
  fn from(named: NamedVolume) -> Self {
    Volume::Named(named)
  }
}

/// A network a service attaches to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Network {
  pub name: String,
  /// Driver for the document-level entry; `bridge` when unset.
  pub driver: Option<String>,
}

impl Network {
  pub fn new(name: impl Into<String>) -> Self {
    Self {
      name: name.into(),
      driver: None,
    }
  }

  pub fn driver(mut self, driver: impl Into<String>) -> Self {
    self.driver = Some(driver.into());
    self
  }
}

impl From<&str> for Network {
  fn from(name: &str) -> Self {
    Network::new(name)
  }
}

impl From<String> for Network {
  fn from(name: String) -> Self {
    Network::new(name)
  }
}
