// Constants shared across the content admin crates.

/// The default configuration file name, looked up in the working directory.
pub const DEFAULT_CONFIG_FILE_NAME: &str = "admin.toml";

/// Environment variable prefix for configuration overrides (`CA__WEB__PORT`).
pub const ENV_PREFIX: &str = "CA";

pub const BEARER_TOKEN: &str = "Bearer";

/// Header carrying the shared secret on the change-ingest webhook.
pub const WEBHOOK_SECRET_HEADER: &str = "x-webhook-secret";

/// Object storage bucket used when none is configured.
pub const DEFAULT_BUCKET: &str = "storage";

/// Path segment between the service base URL and a public object path.
pub const PUBLIC_OBJECT_PREFIX: &str = "/storage/v1/object/public";

/// Rendered in place of an unset event date or time.
pub const NOT_CONFIRMED: &str = "not confirmed";

/// Upper bound for an uploaded image.
pub const MAX_IMAGE_BYTES: usize = 10 * 1024 * 1024;
