use actix_web::dev::Payload;
use actix_web::{Error as ActixError, FromRequest, HttpMessage, HttpRequest};
use std::future::{ready, Ready};

use crate::error::AppError;
use crate::store::EntityId;

/// The verified id of the caller.
///
/// `AuthMiddleware` inserts this into the request extensions after a token checks out;
/// handlers take it as an argument. If it is missing the middleware did not run for
/// this route, and the request is rejected with `AppError::Unauthorized`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticatedUserId(pub EntityId);

impl FromRequest for AuthenticatedUserId {
    type Error = ActixError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        match req.extensions().get::<AuthenticatedUserId>().copied() {
            Some(user_id) => ready(Ok(user_id)),
            None => {
                let err = AppError::Unauthorized("Authentication required".to_string());
                ready(Err(err.into()))
            }
        }
    }
}
