//!
//! # Custom Error Handling
//!
//! This module defines the custom error type `AppError` used throughout the application.
//! Every failure a handler can produce is one of its variants, and each variant maps to
//! exactly one HTTP status code.
//!
//! `AppError` implements `actix_web::error::ResponseError`, so handlers simply return
//! `Result<_, AppError>` and the error is rendered as a `{"message": "..."}` JSON body.
//! `From` implementations for `validator::ValidationErrors`, `jsonwebtoken::errors::Error`,
//! `bcrypt::BcryptError`, the store's `StoreError` and actix's `BlockingError` allow the
//! `?` operator to be used everywhere.

use actix_web::{error::BlockingError, error::ResponseError, http::StatusCode, HttpResponse};
use serde_json::json;
use std::fmt;
use validator::ValidationErrors;

use crate::store::StoreError;

/// Message returned to clients for any internal failure. The real cause is only logged.
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

/// Represents all possible errors that can occur within the application.
#[derive(Debug, PartialEq, Eq)]
pub enum AppError {
    /// Missing or malformed input (HTTP 400).
    ValidationError(String),
    /// A unique value is already taken, e.g. a registered email (HTTP 400).
    Conflict(String),
    /// A request body or path that could not be parsed at all (HTTP 400).
    BadRequest(String),
    /// Login failed. Unknown email and wrong password are deliberately
    /// indistinguishable to the caller (HTTP 400).
    InvalidCredentials,
    /// No identity attached to the request (HTTP 401).
    Unauthorized(String),
    /// A bearer token was presented but failed verification (HTTP 403).
    InvalidToken(String),
    /// The caller is authenticated but does not own the resource (HTTP 403).
    Forbidden(String),
    /// The requested resource does not exist (HTTP 404).
    NotFound(String),
    /// Anything unexpected (HTTP 500). The message is logged, never sent.
    InternalServerError(String),
}

impl AppError {
    /// The message sent to the client in the JSON body.
    pub fn client_message(&self) -> String {
        match self {
            AppError::ValidationError(msg)
            | AppError::Conflict(msg)
            | AppError::BadRequest(msg)
            | AppError::Unauthorized(msg)
            | AppError::InvalidToken(msg)
            | AppError::Forbidden(msg)
            | AppError::NotFound(msg) => msg.clone(),
            AppError::InvalidCredentials => "Invalid email or password".to_string(),
            AppError::InternalServerError(_) => INTERNAL_ERROR_MESSAGE.to_string(),
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AppError::ValidationError(msg) => write!(f, "Validation Error: {}", msg),
            AppError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            AppError::BadRequest(msg) => write!(f, "Bad Request: {}", msg),
            AppError::InvalidCredentials => write!(f, "Invalid Credentials"),
            AppError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            AppError::InvalidToken(msg) => write!(f, "Invalid Token: {}", msg),
            AppError::Forbidden(msg) => write!(f, "Forbidden: {}", msg),
            AppError::NotFound(msg) => write!(f, "Not Found: {}", msg),
            AppError::InternalServerError(msg) => write!(f, "Internal Server Error: {}", msg),
        }
    }
}

/// Converts `AppError` variants into `HttpResponse` objects.
impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_)
            | AppError::Conflict(_)
            | AppError::BadRequest(_)
            | AppError::InvalidCredentials => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::InvalidToken(_) | AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        if let AppError::InternalServerError(detail) = self {
            log::error!("Internal error: {}", detail);
        }
        HttpResponse::build(self.status_code()).json(json!({
            "message": self.client_message()
        }))
    }
}

/// Converts `validator::ValidationErrors` into `AppError::ValidationError`.
///
/// Field messages are joined in field-name order so the output is stable.
impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> AppError {
        let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
        fields.sort_by_key(|(field, _)| *field);

        let messages: Vec<String> = fields
            .into_iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |err| match &err.message {
                    Some(msg) => msg.to_string(),
                    None => format!("{} is invalid", field),
                })
            })
            .collect();

        if messages.is_empty() {
            AppError::ValidationError("Invalid input".into())
        } else {
            AppError::ValidationError(messages.join("; "))
        }
    }
}

/// Converts `jsonwebtoken::errors::Error` into `AppError::InvalidToken`.
impl From<jsonwebtoken::errors::Error> for AppError {
    fn from(error: jsonwebtoken::errors::Error) -> AppError {
        AppError::InvalidToken(format!("Invalid token: {}", error))
    }
}

/// Converts `bcrypt::BcryptError` into `AppError::InternalServerError`.
impl From<bcrypt::BcryptError> for AppError {
    fn from(error: bcrypt::BcryptError) -> AppError {
        AppError::InternalServerError(format!("Password hashing failed: {}", error))
    }
}

/// Converts a failed `web::block` call (the blocking pool went away) into an internal error.
impl From<BlockingError> for AppError {
    fn from(error: BlockingError) -> AppError {
        AppError::InternalServerError(format!("Blocking task failed: {}", error))
    }
}

/// Converts `StoreError` into `AppError`.
///
/// A duplicate insert is a client conflict; a poisoned lock is internal.
impl From<StoreError> for AppError {
    fn from(error: StoreError) -> AppError {
        match error {
            StoreError::Duplicate(msg) => AppError::Conflict(msg),
            StoreError::Poisoned(_) => AppError::InternalServerError(error.to_string()),
        }
    }
}
