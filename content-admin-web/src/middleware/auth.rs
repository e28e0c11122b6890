//! Bearer-token authentication for the admin API.
//!
//! When `web.admin_token` is configured every protected request must carry
//! it, either as `Authorization: Bearer <token>` or, for WebSocket upgrades
//! from browsers that cannot set headers, as the `access_token` query
//! parameter. Without a configured token the API is open.

use crate::AppState;
use actix_service::{Service, Transform};
use actix_web::{
    body::{EitherBody, MessageBody},
    dev::{ServiceRequest, ServiceResponse},
    http::{header::AUTHORIZATION, Method},
    web, Error, HttpResponse,
};
use content_admin_models::{constants::BEARER_TOKEN, web::WebResponse};
use futures::{
    future::{ok, LocalBoxFuture, Ready},
    FutureExt,
};
use std::{
    collections::HashMap,
    rc::Rc,
    sync::Arc,
    task::{Context, Poll},
};
use tracing::warn;

const ACCESS_TOKEN_PARAM: &str = "access_token";

pub struct Authentication;

impl<S, B> Transform<S, ServiceRequest> for Authentication
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: MessageBody,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = AuthenticationMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ok(AuthenticationMiddleware {
            service: Rc::new(service),
        })
    }
}

pub struct AuthenticationMiddleware<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for AuthenticationMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: MessageBody,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = S::Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let srv = Rc::clone(&self.service);
        async move {
            if Method::OPTIONS == req.method() {
                return srv.call(req).await.map(|res| res.map_into_left_body());
            }

            let expected = req
                .app_data::<web::Data<Arc<AppState>>>()
                .and_then(|state| state.settings().web.admin_token.clone())
                .filter(|token| !token.is_empty());

            if let Some(expected) = expected {
                let presented = extract_bearer_token(&req).or_else(|| extract_query_token(&req));
                if presented.as_deref() != Some(expected.as_str()) {
                    warn!(path = %req.path(), "Rejected unauthenticated request");
                    return Ok(req
                        .into_response(
                            HttpResponse::Unauthorized()
                                .json(WebResponse::<()>::error("Invalid or missing token")),
                        )
                        .map_into_right_body());
                }
            }

            srv.call(req).await.map(|res| res.map_into_left_body())
        }
        .boxed_local()
    }
}

#[inline]
fn extract_bearer_token(req: &ServiceRequest) -> Option<String> {
    req.headers()
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix(BEARER_TOKEN)
        .map(|token| token.trim().to_string())
}

#[inline]
fn extract_query_token(req: &ServiceRequest) -> Option<String> {
    web::Query::<HashMap<String, String>>::from_query(req.query_string())
        .ok()?
        .into_inner()
        .remove(ACCESS_TOKEN_PARAM)
}
