//! Process-wide wiring for the content admin service.
//!
//! [`AdminContext`] owns the settings, the single [`BackendClient`] and the
//! [`ChangeHub`], and hands them out to whatever needs them. Nothing here is
//! global: the binary builds one context and passes it down.

mod logger;

pub use logger::Logger;

use content_admin_backend::{BackendClient, ChangeHub};
use content_admin_core::ListView;
use content_admin_error::AdminResult;
use content_admin_models::{settings::Settings, Record};
use std::sync::Arc;
#[cfg(windows)]
use tokio::signal::ctrl_c;
#[cfg(unix)]
use tokio::signal::unix::{signal, SignalKind};
use tokio_util::sync::CancellationToken;
use tracing::{info, span, Level};

pub struct AdminContext {
    settings: Settings,
    client: Arc<BackendClient>,
    hub: ChangeHub,
    logger: Option<Logger>,
    shutdown_token: CancellationToken,
}

impl AdminContext {
    /// Load settings from `config`, start logging and connect the backend.
    pub fn init(config: String) -> AdminResult<Self> {
        let mut logger = Logger::new(if cfg!(debug_assertions) {
            Some(Level::DEBUG)
        } else {
            Some(Level::INFO)
        });

        let settings = Settings::new(config)?;
        logger.initialize(&settings.general.log_dir)?;

        let span = span!(Level::INFO, "init-admin");
        let _guard = span.enter();

        let mut ctx = Self::from_settings(settings)?;
        ctx.logger = Some(logger);
        Ok(ctx)
    }

    /// Build a context without touching the global logger.
    pub fn from_settings(settings: Settings) -> AdminResult<Self> {
        let client = Arc::new(BackendClient::from_settings(&settings.backend)?);
        info!(
            kind = ?settings.backend.kind,
            url = %settings.backend.url,
            bucket = %settings.backend.bucket,
            "Backend client initialized"
        );
        let hub = ChangeHub::new(settings.realtime.channel_capacity);
        Ok(Self::from_parts(settings, client, hub))
    }

    pub fn from_parts(settings: Settings, client: Arc<BackendClient>, hub: ChangeHub) -> Self {
        Self {
            settings,
            client,
            hub,
            logger: None,
            shutdown_token: CancellationToken::new(),
        }
    }

    #[inline]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    #[inline]
    pub fn client(&self) -> Arc<BackendClient> {
        Arc::clone(&self.client)
    }

    #[inline]
    pub fn hub(&self) -> ChangeHub {
        self.hub.clone()
    }

    /// A fresh, unmounted list view over `R`'s table.
    pub fn list_view<R: Record>(&self) -> ListView<R> {
        ListView::new(self.client(), self.hub())
    }

    pub fn change_log_level(&self, level: Level) {
        if let Some(logger) = &self.logger {
            logger.set_level(level);
        }
    }

    #[inline]
    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown_token.clone()
    }

    /// Ask everything waiting in [`Self::wait_for_shutdown`] to return.
    pub fn shutdown(&self) {
        self.shutdown_token.cancel();
    }

    /// Resolve on SIGTERM/SIGINT (ctrl-c on Windows) or on [`Self::shutdown`].
    pub async fn wait_for_shutdown(&self) -> AdminResult<()> {
        let shutdown_token = self.shutdown_token.clone();

        #[cfg(unix)]
        {
            let mut sigterm = signal(SignalKind::terminate())?;
            let mut sigint = signal(SignalKind::interrupt())?;

            tokio::select! {
                _ = sigterm.recv() => {
                    info!("Received SIGTERM signal");
                }
                _ = sigint.recv() => {
                    info!("Received SIGINT signal");
                }
                _ = shutdown_token.cancelled() => {}
            }
        }

        #[cfg(windows)]
        {
            tokio::select! {
                _ = ctrl_c() => {
                    info!("Received ctrl-c signal");
                }
                _ = shutdown_token.cancelled() => {}
            }
        }

        self.shutdown_token.cancel();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use content_admin_models::{entities::prelude::Event, settings::Inner};

    fn memory_settings() -> Settings {
        let mut inner = Inner::default();
        inner.backend.kind = content_admin_models::settings::BackendKind::Memory;
        inner.backend.url = "https://abc.example.co".into();
        Settings::from_inner(inner)
    }

    #[tokio::test]
    async fn test_shutdown_releases_waiters() {
        let ctx = AdminContext::from_settings(memory_settings()).unwrap();
        ctx.shutdown();
        ctx.wait_for_shutdown().await.unwrap();
        assert!(ctx.shutdown_token().is_cancelled());
    }

    #[tokio::test]
    async fn test_list_views_share_one_client() {
        let ctx = AdminContext::from_settings(memory_settings()).unwrap();
        let mut view = ctx.list_view::<Event>();
        view.mount().await.unwrap();
        assert!(view.rows().is_empty());
        assert_eq!(
            ctx.client().public_url("events/a.png"),
            "https://abc.example.co/storage/v1/object/public/storage/events/a.png"
        );
    }
}
