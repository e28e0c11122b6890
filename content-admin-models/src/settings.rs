use crate::constants::{DEFAULT_BUCKET, ENV_PREFIX};
use config::{Config, File};
use content_admin_error::AdminResult;
use serde::{self, Deserialize};
use std::{ops::Deref, sync::Arc};
use sysinfo::System;

#[derive(Debug, Clone)]
pub struct Settings(Arc<Inner>);

impl Deref for Settings {
    type Target = Inner;
    fn deref(&self) -> &Self::Target {
        self.0.as_ref()
    }
}

impl Settings {
    pub fn new(config_path: String) -> AdminResult<Self> {
        let builder = Config::builder()
            .add_source(File::with_name(config_path.as_str()).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("web.cors.origins"),
            );
        let inner: Inner = builder.build()?.try_deserialize()?;
        Ok(Self(Arc::new(inner)))
    }

    /// Wrap an already-built settings tree.
    pub fn from_inner(inner: Inner) -> Self {
        Self(Arc::new(inner))
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Inner {
    #[serde(default)]
    pub general: General,
    #[serde(default)]
    pub web: Web,
    #[serde(default)]
    pub backend: Backend,
    #[serde(default)]
    pub realtime: Realtime,
}

#[derive(Debug, Clone, Deserialize)]
pub struct General {
    /// Directory for the daily rolling log files.
    #[serde(default = "General::log_dir_default")]
    pub log_dir: String,
}

impl Default for General {
    fn default() -> Self {
        General {
            log_dir: General::log_dir_default(),
        }
    }
}

impl General {
    fn log_dir_default() -> String {
        "logs".into()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Web {
    #[serde(default = "Web::router_prefix_default")]
    pub router_prefix: String,
    #[serde(default = "Web::host_default")]
    pub host: String,
    #[serde(default = "Web::port_default")]
    pub port: u16,
    #[serde(default = "Web::workers_default")]
    pub workers: i32,
    /// Bearer token required on the admin API. When unset the API is open,
    /// which is only appropriate behind an authenticating proxy.
    #[serde(default)]
    pub admin_token: Option<String>,
    #[serde(default)]
    pub cors: Cors,
}

impl Default for Web {
    fn default() -> Self {
        Web {
            router_prefix: Web::router_prefix_default(),
            host: Web::host_default(),
            port: Web::port_default(),
            workers: Web::workers_default(),
            admin_token: None,
            cors: Default::default(),
        }
    }
}

impl Web {
    fn router_prefix_default() -> String {
        "/api".into()
    }

    fn host_default() -> String {
        "0.0.0.0".into()
    }

    fn port_default() -> u16 {
        5680
    }

    fn workers_default() -> i32 {
        0
    }

    /// Get actual number of workers based on configuration
    pub fn get_worker_count(&self) -> usize {
        match self.workers {
            0 => System::new_all().cpus().len().max(1),
            n if n > 0 => n as usize,
            n => std::cmp::max(
                1,
                (System::new_all().cpus().len() as i32 / n.abs()) as usize,
            ),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Cors {
    #[serde(default)]
    pub mode: CorsMode,
    #[serde(default)]
    pub origins: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CorsMode {
    #[default]
    AllowAll,
    Whitelist,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackendKind {
    /// The managed service over its REST and storage APIs.
    #[default]
    Rest,
    /// Process-local tables and objects; nothing survives a restart.
    Memory,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Backend {
    #[serde(default)]
    pub kind: BackendKind,
    /// Public base URL of the managed service. Not validated: an empty or
    /// wrong value yields broken public image URLs.
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "Backend::bucket_default")]
    pub bucket: String,
    #[serde(default = "Backend::schema_default")]
    pub schema: String,
    #[serde(default = "Backend::request_timeout_ms_default")]
    pub request_timeout_ms: u64,
}

impl Default for Backend {
    fn default() -> Self {
        Backend {
            kind: BackendKind::default(),
            url: String::new(),
            api_key: String::new(),
            bucket: Backend::bucket_default(),
            schema: Backend::schema_default(),
            request_timeout_ms: Backend::request_timeout_ms_default(),
        }
    }
}

impl Backend {
    fn bucket_default() -> String {
        DEFAULT_BUCKET.into()
    }

    fn schema_default() -> String {
        "public".into()
    }

    fn request_timeout_ms_default() -> u64 {
        10_000
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Realtime {
    /// Buffer size of each per-table broadcast channel.
    #[serde(default = "Realtime::channel_capacity_default")]
    pub channel_capacity: usize,
    /// Shared secret expected in the `x-webhook-secret` header of change
    /// notifications. Unset means notifications are accepted unauthenticated.
    #[serde(default)]
    pub webhook_secret: Option<String>,
}

impl Default for Realtime {
    fn default() -> Self {
        Realtime {
            channel_capacity: Realtime::channel_capacity_default(),
            webhook_secret: None,
        }
    }
}

impl Realtime {
    fn channel_capacity_default() -> usize {
        1024
    }
}
