use composegen_lib::env::SecretAwareEnvironment;
use composegen_lib::manifest::{ComposeError, ManifestDocument};
use composegen_lib::secrets::MemorySecrets;
use composegen_lib::service::{HealthCheck, Service, ServiceError, Volume};
use composegen_lib::writer::SaveOutcome;
use serde_yaml::Value;
use serial_test::serial;

use super::common::TestProject;

fn sample_document(env: &mut SecretAwareEnvironment<MemorySecrets>) -> ManifestDocument {
  let api = Service::new("api")
    .port("8080", "8080")
    .environment(env, "DB_HOST", Some("db"))
    .environment(env, "DB_PORT", Some("5432"))
    .image("golang:1.22");
  let db = Service::new("db")
    .environment(env, "POSTGRES_PASSWORD", Some("secretpassword"))
    .environment(env, "POSTGRES_DB", Some("myapp"))
    .image("postgres:16")
    .volume(Volume::named("db_data").target("/var/lib/postgresql/data"))
    .healthcheck(HealthCheck::new(["CMD", "pg_isready"]).interval("10s").retries(5));

  ManifestDocument::new("3.8", vec![api, db])
}

#[test]
fn saved_manifest_parses_with_expected_structure() {
  let project = TestProject::new();
  let mut env = SecretAwareEnvironment::new(MemorySecrets::new());

  sample_document(&mut env).save_if_different(&project.paths.manifest).unwrap();

  let yaml = project.manifest_yaml();
  assert_eq!(yaml["version"].as_str(), Some("3.8"));

  let services = yaml["services"].as_mapping().unwrap();
  assert_eq!(services.len(), 2);

  let api = &yaml["services"]["api"];
  let ports: Vec<_> = api["ports"].as_sequence().unwrap().iter().map(|p| p.as_str().unwrap()).collect();
  assert_eq!(ports, vec!["8080:8080"]);
  assert_eq!(api["environment"]["DB_HOST"].as_str(), Some("db"));
  assert_eq!(api["environment"]["DB_PORT"].as_str(), Some("5432"));

  let db = &yaml["services"]["db"];
  assert_eq!(db["healthcheck"]["retries"].as_u64(), Some(5));
  assert_eq!(db["volumes"][0].as_str(), Some("db_data:/var/lib/postgresql/data"));
  assert_eq!(yaml["volumes"]["db_data"]["driver"].as_str(), Some("local"));

  for (name, service) in services {
    for (field, value) in service.as_mapping().unwrap() {
      let empty = match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Sequence(seq) => seq.is_empty(),
        Value::Mapping(map) => map.is_empty(),
        _ => false,
      };
      assert!(!empty, "service {:?} has empty field {:?}", name, field);
    }
  }
}

#[test]
fn second_save_is_a_no_op() {
  let project = TestProject::new();
  let mut env = SecretAwareEnvironment::new(MemorySecrets::new());
  let document = sample_document(&mut env);

  let first = document.save_if_different(&project.paths.manifest).unwrap();
  let content = project.read(&project.paths.manifest);
  let second = document.save_if_different(&project.paths.manifest).unwrap();

  assert_eq!(first, SaveOutcome::Created);
  assert_eq!(second, SaveOutcome::Unchanged);
  assert_eq!(project.read(&project.paths.manifest), content);
}

#[test]
fn independent_builds_render_identically() {
  let mut env_a = SecretAwareEnvironment::new(MemorySecrets::new());
  let mut env_b = SecretAwareEnvironment::new(MemorySecrets::new());

  let a = sample_document(&mut env_a).render().unwrap();
  let b = sample_document(&mut env_b).render().unwrap();

  assert_eq!(a, b);
  assert_eq!(env_a.sink(), env_b.sink());
}

#[test]
fn changed_document_updates_file() {
  let project = TestProject::new();
  let mut env = SecretAwareEnvironment::new(MemorySecrets::new());
  sample_document(&mut env).save_if_different(&project.paths.manifest).unwrap();

  let changed = ManifestDocument::new("3.8", vec![Service::new("api").image("golang:1.23")]);
  let outcome = changed.save_if_different(&project.paths.manifest).unwrap();

  assert_eq!(outcome, SaveOutcome::Updated);
  assert!(project.read(&project.paths.manifest).contains("golang:1.23"));
}

#[test]
#[serial]
fn missing_variable_blocks_save() {
  let project = TestProject::new();
  std::fs::write(&project.paths.manifest, "previous\n").unwrap();

  temp_env::with_var_unset("UNSET_VAR", || {
    let mut env = SecretAwareEnvironment::new(MemorySecrets::new());
    let service = Service::new("api")
      .image("api:latest")
      .environment(&mut env, "UNSET_VAR", None);
    assert_eq!(service.errors().len(), 1);

    let result = ManifestDocument::new("3.8", vec![service]).save_if_different(&project.paths.manifest);

    match result {
      Err(ComposeError::Render(err)) => {
        assert_eq!(err.len(), 1);
        assert_eq!(err.errors()[0].variable(), Some("UNSET_VAR"));
      }
      other => panic!("expected render failure, got {:?}", other),
    }
  });

  assert_eq!(project.read(&project.paths.manifest), "previous\n");
}

#[test]
fn shared_named_volume_appears_once() {
  let project = TestProject::new();
  let services = vec![
    Service::new("db").volume(Volume::named("db_data").target("/var/lib/postgresql/data")),
    Service::new("backup").volume(Volume::named("db_data").target("/source")),
  ];

  ManifestDocument::new("3.8", services)
    .save_if_different(&project.paths.manifest)
    .unwrap();

  let yaml = project.manifest_yaml();
  let volumes = yaml["volumes"].as_mapping().unwrap();
  assert_eq!(volumes.len(), 1);
  assert_eq!(yaml["volumes"]["db_data"]["driver"].as_str(), Some("local"));
  assert_eq!(project.read(&project.paths.manifest).matches("  db_data:\n").count(), 1);
}

#[test]
fn unusable_names_block_save() {
  let project = TestProject::new();
  let service = Service::new("api")
    .image("x")
    .container_name("web #1")
    .volume(Volume::named(""))
    .network("front: end");

  let result = ManifestDocument::new("3.8", vec![service]).save_if_different(&project.paths.manifest);

  match result {
    Err(ComposeError::Render(err)) => {
      let kinds: Vec<_> = err
        .errors()
        .iter()
        .filter_map(|error| match error {
          ServiceError::InvalidName { kind, .. } => Some(*kind),
          _ => None,
        })
        .collect();
      assert_eq!(kinds, vec!["volume", "network", "container"]);
    }
    other => panic!("expected render failure, got {:?}", other),
  }
  assert!(!project.paths.manifest.exists());
}

#[test]
fn bind_paths_with_yaml_syntax_round_trip() {
  let project = TestProject::new();
  let service = Service::new("web")
    .image("nginx")
    .volume(Volume::bind("./site: #draft", "/usr/share/nginx/html"))
    .network("front-end");

  ManifestDocument::new("3.8", vec![service])
    .save_if_different(&project.paths.manifest)
    .unwrap();

  let yaml = project.manifest_yaml();
  assert_eq!(
    yaml["services"]["web"]["volumes"][0].as_str(),
    Some("./site: #draft:/usr/share/nginx/html")
  );
  assert_eq!(yaml["networks"]["front-end"]["driver"].as_str(), Some("bridge"));
}
