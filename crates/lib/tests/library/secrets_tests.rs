use composegen_lib::env::SecretAwareEnvironment;
use composegen_lib::manifest::ManifestDocument;
use composegen_lib::service::Service;
use serial_test::serial;

use super::common::TestProject;

#[test]
#[serial]
fn secrets_stay_out_of_the_manifest() {
  let project = TestProject::new();

  temp_env::with_var("DB_PASSWORD", Some("secret123"), || {
    let mut env = SecretAwareEnvironment::new(project.paths.dotenv_store());
    let db = Service::new("db")
      .image("postgres:16")
      .environment(&mut env, "DB_PASSWORD", None)
      .environment(&mut env, "DB_NAME", Some("app"));

    ManifestDocument::new("3.8", vec![db])
      .save_if_different(&project.paths.manifest)
      .unwrap();
  });

  let manifest = project.read(&project.paths.manifest);
  assert!(manifest.contains("      \"DB_PASSWORD\": \"${DB_PASSWORD}\"\n"));
  assert!(manifest.contains("      \"DB_NAME\": \"app\"\n"));
  assert!(!manifest.contains("secret123"));

  let yaml = project.manifest_yaml();
  assert_eq!(
    yaml["services"]["db"]["environment"]["DB_PASSWORD"].as_str(),
    Some("${DB_PASSWORD}")
  );

  assert_eq!(
    project.read(&project.paths.secrets),
    "DB_PASSWORD=secret123\nDB_NAME=app\n"
  );
  assert_eq!(project.read(&project.paths.ignore), ".env\n");
}

#[test]
#[serial]
fn secrets_are_written_even_when_render_fails() {
  let project = TestProject::new();

  temp_env::with_var_unset("NOT_SET", || {
    let mut env = SecretAwareEnvironment::new(project.paths.dotenv_store());
    let api = Service::new("api")
      .environment(&mut env, "API_KEY", Some("k-123"))
      .environment(&mut env, "NOT_SET", None);

    let result = ManifestDocument::new("3.8", vec![api]).save_if_different(&project.paths.manifest);
    assert!(result.is_err());
  });

  assert!(!project.paths.manifest.exists());
  assert_eq!(project.read(&project.paths.secrets), "API_KEY=k-123\n");
}

#[test]
fn rebuilding_keeps_ignore_file_clean() {
  let project = TestProject::new();
  std::fs::write(&project.paths.ignore, "target/\n\n").unwrap();

  for _ in 0..2 {
    let mut env = SecretAwareEnvironment::new(project.paths.dotenv_store());
    let api = Service::new("api")
      .environment(&mut env, "A", Some("1"))
      .environment(&mut env, "B", Some("2"));
    ManifestDocument::new("3.8", vec![api])
      .save_if_different(&project.paths.manifest)
      .unwrap();
  }

  assert_eq!(project.read(&project.paths.ignore), "target/\n.env\n");
  assert_eq!(project.read(&project.paths.secrets), "A=1\nB=2\n");
}

#[test]
fn existing_secret_values_are_updated_in_place() {
  let project = TestProject::new();
  std::fs::write(&project.paths.secrets, "FIRST=1\nTOKEN=old\nLAST=3\n").unwrap();

  let mut env = SecretAwareEnvironment::new(project.paths.dotenv_store());
  let _ = Service::new("api").environment(&mut env, "TOKEN", Some("new"));

  assert_eq!(project.read(&project.paths.secrets), "FIRST=1\nTOKEN=new\nLAST=3\n");
}
