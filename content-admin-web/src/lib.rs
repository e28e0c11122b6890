//! HTTP surface of the content admin service.
mod api;
mod middleware;

use actix_web::{
    dev::{Server, ServerHandle},
    middleware::{Logger, NormalizePath},
    web::{self, Data},
    App, HttpServer,
};
use content_admin_backend::{BackendClient, ChangeHub};
use content_admin_common::AdminContext;
use content_admin_core::ImageUploader;
use content_admin_error::{AdminError, AdminResult};
use content_admin_models::{settings::Settings, Record};
use content_admin_repository::Repository;
use middleware::cors::middleware;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{error, info, instrument};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    settings: Settings,
    client: Arc<BackendClient>,
    hub: ChangeHub,
}

impl AppState {
    pub fn new(settings: Settings, client: Arc<BackendClient>, hub: ChangeHub) -> Self {
        Self {
            settings,
            client,
            hub,
        }
    }

    pub fn from_context(ctx: &AdminContext) -> Self {
        Self::new(ctx.settings().clone(), ctx.client(), ctx.hub())
    }

    #[inline]
    pub(crate) fn settings(&self) -> &Settings {
        &self.settings
    }

    #[inline]
    pub(crate) fn hub(&self) -> &ChangeHub {
        &self.hub
    }

    pub(crate) fn repository<R: Record>(&self) -> Repository<R> {
        Repository::new(Arc::clone(&self.client))
    }

    pub(crate) fn uploader(&self) -> ImageUploader {
        ImageUploader::new(Arc::clone(&self.client))
    }
}

/// Register every route under `router_prefix`.
///
/// The caller provides `Data<Arc<AppState>>`.
pub fn configure_app(cfg: &mut web::ServiceConfig, router_prefix: &str) {
    cfg.service(web::scope(router_prefix).configure(api::configure_routes));
}

/// The running HTTP server.
#[derive(Clone)]
pub struct AdminWebServer {
    server: Arc<Mutex<Option<ServerHandle>>>,
}

impl AdminWebServer {
    fn create_server(state: AppState) -> AdminResult<Server> {
        let settings = state.settings().clone();
        let addr = format!("{}:{}", settings.web.host, settings.web.port);
        let router_prefix = settings.web.router_prefix.clone();
        let worker_count = settings.web.get_worker_count();
        let cors_config = settings.web.cors.clone();
        let state = Arc::new(state);

        let server = HttpServer::new(move || {
            App::new()
                .app_data(Data::new(Arc::clone(&state)))
                .wrap(middleware(&cors_config))
                .wrap(Logger::default())
                .wrap(NormalizePath::trim())
                .configure(|cfg| configure_app(cfg, &router_prefix))
        })
        .workers(worker_count)
        .bind(&addr)
        .map_err(|e| {
            AdminError::InitializationError(format!("Failed to bind HTTP server to {addr}: {e}"))
        })?;

        info!(%addr, workers = worker_count, "HTTP server bound");
        Ok(server.run())
    }

    /// Bind and start serving in the background.
    #[instrument(name = "start-web-server", skip_all)]
    pub fn start(ctx: &AdminContext) -> AdminResult<Self> {
        let server = Self::create_server(AppState::from_context(ctx))?;
        let handle = server.handle();

        tokio::spawn(async move {
            if let Err(e) = server.await {
                error!(error = %e, "Web server failed");
            }
        });

        Ok(Self {
            server: Arc::new(Mutex::new(Some(handle))),
        })
    }

    /// Stop accepting connections and let in-flight requests finish.
    #[instrument(name = "stop-web-server", skip_all)]
    pub async fn stop(&self) {
        info!("Stopping web server...");
        if let Some(handle) = self.server.lock().await.take() {
            handle.stop(true).await;
        }
        info!("Web server stopped");
    }
}
