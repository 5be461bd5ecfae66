use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    http::header,
    Error, HttpMessage,
};
use futures::future::{ready, LocalBoxFuture, Ready};
use std::sync::Arc;

use crate::auth::extractors::AuthenticatedUserId;
use crate::auth::token::TokenService;
use crate::error::AppError;

/// Paths under the gated scope that are reachable without a token.
pub const PUBLIC_PATHS: [&str; 3] = ["/api/register", "/api/login", "/api/test"];

/// Rejects requests without a valid bearer token before they reach a handler.
///
/// No `Authorization: Bearer` header yields 401; a token that fails verification
/// yields 403. On success the caller's id is stored as [`AuthenticatedUserId`].
pub struct AuthMiddleware {
    tokens: Arc<TokenService>,
}

impl AuthMiddleware {
    pub fn new(tokens: Arc<TokenService>) -> Self {
        Self { tokens }
    }
}

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Transform = AuthMiddlewareService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthMiddlewareService {
            service,
            tokens: Arc::clone(&self.tokens),
        }))
    }
}

pub struct AuthMiddlewareService<S> {
    service: S,
    tokens: Arc<TokenService>,
}

fn bearer_token(req: &ServiceRequest) -> Option<&str> {
    req.headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        if PUBLIC_PATHS.contains(&req.path()) {
            return Box::pin(self.service.call(req));
        }

        let verified = match bearer_token(&req) {
            Some(token) => self.tokens.verify(token),
            None => Err(AppError::Unauthorized("Access token required".into())),
        };

        match verified {
            Ok(user_id) => {
                req.extensions_mut().insert(AuthenticatedUserId(user_id));
                Box::pin(self.service.call(req))
            }
            Err(app_err) => {
                log::debug!("Rejected {} {}: {}", req.method(), req.path(), app_err);
                Box::pin(async move { Err(app_err.into()) })
            }
        }
    }
}
