//! V1 API routes
mod changes;
mod entity;
mod form;
mod ws;

use crate::middleware::auth::Authentication;
use actix_web::web;
use content_admin_models::{
    entities::prelude::{BlogPost, Event, NewsItem, SponsoredEvent, TeamMember},
    EntityKind,
};

pub(super) const ROUTER_PREFIX: &str = "/v1";

pub fn configure_v1_routes(cfg: &mut web::ServiceConfig) {
    cfg.configure(configure_public_routes)
        .configure(configure_protected_routes);
}

/// The change webhook authenticates with its own shared secret.
fn configure_public_routes(cfg: &mut web::ServiceConfig) {
    cfg.route(changes::ROUTER_PREFIX, web::post().to(changes::ingest));
}

fn configure_protected_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("")
            .wrap(Authentication)
            .service(scope(EntityKind::Events).configure(entity::configure_routes::<Event>))
            .service(scope(EntityKind::News).configure(entity::configure_routes::<NewsItem>))
            .service(scope(EntityKind::Blogs).configure(entity::configure_routes::<BlogPost>))
            .service(
                scope(EntityKind::Sponsoreds)
                    .configure(entity::configure_routes::<SponsoredEvent>),
            )
            .service(
                scope(EntityKind::TeamMembers).configure(entity::configure_routes::<TeamMember>),
            ),
    );
}

fn scope(kind: EntityKind) -> actix_web::Scope {
    web::scope(&format!("/{}", kind.resource()))
}
