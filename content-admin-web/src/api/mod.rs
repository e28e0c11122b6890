//! Router module for handling all API routes

pub mod public;
pub mod v1;

use actix_web::web;

/// Configure all routes below the router prefix.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.configure(public::configure_public_routes)
        .service(web::scope(v1::ROUTER_PREFIX).configure(v1::configure_v1_routes));
}
