#![allow(dead_code)]

use content_admin_backend::{BackendClient, ChangeHub, MemoryBackend};
use content_admin_models::settings::{BackendKind, Inner, Settings};
use content_admin_web::AppState;
use std::sync::{Arc, Once};
use tracing::Level;

pub const PREFIX: &str = "/api";
pub const BASE_URL: &str = "https://abc.example.co";
pub const TOKEN: &str = "s3cret-admin-token";
pub const WEBHOOK_SECRET: &str = "hook-secret";
pub const BOUNDARY: &str = "----content-admin-test-boundary";

static INIT_TRACING: Once = Once::new();

pub fn init_tracing() {
    INIT_TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_max_level(Level::DEBUG)
            .with_target(false)
            .without_time()
            .try_init();
    });
}

pub struct TestState {
    pub backend: Arc<MemoryBackend>,
    pub hub: ChangeHub,
    pub state: Arc<AppState>,
}

pub fn test_state(admin_token: Option<&str>, webhook_secret: Option<&str>) -> TestState {
    init_tracing();
    let mut inner = Inner::default();
    inner.backend.kind = BackendKind::Memory;
    inner.backend.url = BASE_URL.into();
    inner.web.admin_token = admin_token.map(str::to_string);
    inner.realtime.webhook_secret = webhook_secret.map(str::to_string);
    let settings = Settings::from_inner(inner);

    let backend = Arc::new(MemoryBackend::new());
    let client = Arc::new(BackendClient::memory(
        backend.clone(),
        BASE_URL,
        settings.backend.bucket.clone(),
    ));
    let hub = ChangeHub::default();
    let state = Arc::new(AppState::new(settings, client, hub.clone()));
    TestState {
        backend,
        hub,
        state,
    }
}

pub enum Part<'a> {
    Text(&'a str, String),
    File {
        name: &'a str,
        file_name: &'a str,
        content_type: &'a str,
        bytes: &'a [u8],
    },
}

/// `multipart/form-data` body plus its content-type header value.
pub fn multipart(parts: &[Part<'_>]) -> (String, Vec<u8>) {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        match part {
            Part::Text(name, value) => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes(),
                );
                body.extend_from_slice(value.as_bytes());
            }
            Part::File {
                name,
                file_name,
                content_type,
                bytes,
            } => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\nContent-Type: {content_type}\r\n\r\n"
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(bytes);
            }
        }
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    (format!("multipart/form-data; boundary={BOUNDARY}"), body)
}
