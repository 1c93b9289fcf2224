//! Canonical manifest text.
//!
//! Output is fully determined by the document: two-space indentation, fields
//! in a fixed order, every scalar double-quoted, empty fields left out. Saving
//! relies on this to detect unchanged manifests byte for byte.
//!
//! Section keys are written bare, so service, volume and network names must
//! match `[a-zA-Z0-9][a-zA-Z0-9_.-]*`. Volume bindings are bare unless they
//! contain characters YAML would misread.
//!
//! ```text
//! version: "3.8"
//! services:
//!   api:
//!     image: "api:latest"
//!     container_name: "api"
//!     ports:
//!       - "8080:8080"
//!     environment:
//!       "DB_PASSWORD": "${DB_PASSWORD}"
//! ```

use std::collections::HashSet;
use std::fmt;

use super::{ManifestDocument, SharedResource};
use crate::service::{HealthCheck, Service, ServiceError, is_valid_name};

/// Every error that kept a document from rendering.
#[derive(Debug, Clone)]
pub struct AggregateError {
  errors: Vec<ServiceError>,
}

impl AggregateError {
  pub fn errors(&self) -> &[ServiceError] {
    &self.errors
  }

  pub fn len(&self) -> usize {
    self.errors.len()
  }

  pub fn is_empty(&self) -> bool {
    self.errors.is_empty()
  }
}

impl fmt::Display for AggregateError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "manifest has {} error(s):", self.errors.len())?;
    for error in &self.errors {
      write!(f, "\n  - {}", error)?;
    }
    Ok(())
  }
}

impl std::error::Error for AggregateError {}

/// Render `document`, or fail with every pending error at once.
///
/// Nothing is produced if any service carries errors, has a container name
/// that can't be a manifest key, or shares its container name with another.
pub fn render(document: &ManifestDocument) -> Result<String, AggregateError> {
  let mut errors: Vec<ServiceError> = document.pending_errors().cloned().collect();

  for service in document.services() {
    let key = service.manifest_key();
    if !is_valid_name(key) {
      errors.push(ServiceError::InvalidName {
        service: service.name().to_string(),
        kind: "container",
        name: key.to_string(),
      });
    }
  }

  let mut seen = HashSet::new();
  let mut reported = HashSet::new();
  for service in document.services() {
    let key = service.manifest_key();
    if !seen.insert(key) && reported.insert(key) {
      errors.push(ServiceError::DuplicateContainerName { name: key.to_string() });
    }
  }

  if !errors.is_empty() {
    return Err(AggregateError { errors });
  }

  let mut out = Emitter::default();
  out.line(0, format!("version: {}", quote(document.version())));

  if !document.services().is_empty() {
    out.line(0, "services:");
    for service in document.services() {
      render_service(&mut out, service);
    }
  }

  render_resources(&mut out, "volumes", document.volumes());
  render_resources(&mut out, "networks", document.networks());

  Ok(out.finish())
}

fn render_service(out: &mut Emitter, service: &Service) {
  let key = service.manifest_key();
  out.line(1, format!("{}:", key));

  if let Some(image) = non_empty(service.image_ref()) {
    out.line(2, format!("image: {}", quote(image)));
  }
  out.line(2, format!("container_name: {}", quote(key)));

  out.list(2, "ports", service.ports().iter().map(|port| quote(port)));

  let environment = service.environment_vars();
  if !environment.is_empty() {
    out.line(2, "environment:");
    for (name, value) in environment.iter() {
      out.line(3, format!("{}: {}", quote(name), quote(value)));
    }
  }

  out.list(2, "volumes", service.volumes().iter().map(|volume| bare_or_quoted(volume.binding())));
  out.list(2, "depends_on", service.dependencies().iter().map(|dep| quote(dep)));

  if let Some(command) = non_empty(service.command_line()) {
    out.line(2, format!("command: {}", quote(command)));
  }

  out.list(2, "networks", service.networks().iter().map(|network| quote(&network.name)));

  if let Some(policy) = non_empty(service.restart_policy()) {
    out.line(2, format!("restart: {}", quote(policy)));
  }

  if let Some(check) = service.health().filter(|check| !is_blank(check)) {
    out.line(2, "healthcheck:");
    out.list(3, "test", check.test.iter().map(|token| quote(token)));
    if !check.interval.is_empty() {
      out.line(3, format!("interval: {}", quote(&check.interval)));
    }
    if !check.timeout.is_empty() {
      out.line(3, format!("timeout: {}", quote(&check.timeout)));
    }
    if check.retries > 0 {
      out.line(3, format!("retries: {}", check.retries));
    }
  }
}

fn render_resources(out: &mut Emitter, section: &str, resources: &[SharedResource]) {
  if resources.is_empty() {
    return;
  }
  out.line(0, format!("{}:", section));
  for resource in resources {
    out.line(1, format!("{}:", resource.name));
    if let Some(driver) = non_empty(resource.driver.as_deref()) {
      out.line(2, format!("driver: {}", quote(driver)));
    }
  }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
  value.filter(|v| !v.is_empty())
}

fn is_blank(check: &HealthCheck) -> bool {
  check.test.is_empty() && check.interval.is_empty() && check.timeout.is_empty() && check.retries == 0
}

/// Leave `value` bare when YAML reads it back as the same plain string.
fn bare_or_quoted(value: String) -> String {
  let mut chars = value.chars();
  let plain = chars
    .next()
    .is_some_and(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '/' | '_' | '~'))
    && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '/' | '_' | '~' | '-' | ':' | '@' | '+'))
    && !value.ends_with(':');
  if plain { value } else { quote(&value) }
}

/// Double-quote `value`, escaping backslashes, quotes and control characters.
pub fn quote(value: &str) -> String {
  let mut quoted = String::with_capacity(value.len() + 2);
  quoted.push('"');
  for c in value.chars() {
    match c {
      '"' => quoted.push_str("\\\""),
      '\\' => quoted.push_str("\\\\"),
      '\n' => quoted.push_str("\\n"),
      '\r' => quoted.push_str("\\r"),
      '\t' => quoted.push_str("\\t"),
      c if c.is_control() => quoted.push_str(&format!("\\x{:02x}", c as u32)),
      c => quoted.push(c),
    }
  }
  quoted.push('"');
  quoted
}

/// Line-oriented text builder with fixed two-space indentation.
#[derive(Default)]
struct Emitter {
  buf: String,
}

impl Emitter {
  fn line(&mut self, depth: usize, text: impl AsRef<str>) {
    for _ in 0..depth {
      self.buf.push_str("  ");
    }
    self.buf.push_str(text.as_ref());
    self.buf.push('\n');
  }

  /// Emit `key:` followed by one `- item` per entry; nothing at all if empty.
  fn list<I>(&mut self, depth: usize, key: &str, items: I)
  where
    I: IntoIterator<Item = String>,
  {
    let mut items = items.into_iter().peekable();
    if items.peek().is_none() {
      return;
    }
    self.line(depth, format!("{}:", key));
    for item in items {
      self.line(depth + 1, format!("- {}", item));
    }
  }

  fn finish(self) -> String {
    self.buf
  }
}
