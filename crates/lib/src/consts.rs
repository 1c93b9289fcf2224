/// Manifest file written when no path is configured.
pub const DEFAULT_MANIFEST_FILE: &str = "docker-compose.yml";

/// Secrets file receiving private environment values.
pub const DEFAULT_SECRETS_FILE: &str = ".env";

/// Ignore file that must list the secrets file.
pub const DEFAULT_IGNORE_FILE: &str = ".gitignore";

/// Driver registered for named volumes that don't specify one.
pub const DEFAULT_VOLUME_DRIVER: &str = "local";

/// Driver registered for networks that don't specify one.
pub const DEFAULT_NETWORK_DRIVER: &str = "bridge";

/// Overrides the manifest location.
pub const MANIFEST_PATH_ENV: &str = "COMPOSEGEN_MANIFEST";

/// Overrides the secrets file location.
pub const SECRETS_PATH_ENV: &str = "COMPOSEGEN_ENV_FILE";

/// Overrides the ignore file location.
pub const IGNORE_PATH_ENV: &str = "COMPOSEGEN_IGNORE_FILE";
