//! composegen-lib: programmatic builder for docker-compose manifests
//!
//! This crate provides the types used to assemble and persist a manifest:
//! - `Service`: one container's definition, built with chained calls
//! - `SecretAwareEnvironment`: splits variables into manifest placeholders and
//!   private values kept in a secrets file
//! - `ManifestDocument`: the ordered set of services plus derived volumes and networks
//! - `writer`: persists rendered text only when it changed
//!
//! # Example
//!
//! ```no_run
//! use composegen_lib::env::SecretAwareEnvironment;
//! use composegen_lib::manifest::ManifestDocument;
//! use composegen_lib::paths::ProjectPaths;
//! use composegen_lib::service::{Service, Volume};
//!
//! let paths = ProjectPaths::default();
//! let mut env = SecretAwareEnvironment::new(paths.dotenv_store());
//!
//! let db = Service::new("db")
//!   .image("postgres:16")
//!   .environment(&mut env, "POSTGRES_PASSWORD", None)
//!   .volume(Volume::named("db_data").target("/var/lib/postgresql/data"));
//! let api = Service::new("api")
//!   .image("ghcr.io/acme/api:latest")
//!   .port("8080", "8080")
//!   .environment(&mut env, "DB_HOST", Some("db"))
//!   .depends_on(&[&db]);
//!
//! let document = ManifestDocument::new("3.8", vec![db, api]);
//! document.save_if_different(&paths.manifest).unwrap();
//! ```

pub mod consts;
pub mod env;
pub mod manifest;
pub mod ordered;
pub mod paths;
pub mod secrets;
pub mod service;
pub mod writer;
