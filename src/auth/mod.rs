pub mod extractors;
pub mod middleware;
pub mod password;
pub mod token;

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::User;

// Re-export necessary items
pub use extractors::AuthenticatedUserId;
pub use middleware::AuthMiddleware;
pub use password::{hash_password, verify_password};
pub use token::{Claims, TokenService};

/// Represents the payload for a user login request.
///
/// Missing fields deserialize as empty strings so they surface as validation errors.
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "Email is required"))]
    pub email: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Represents the payload for a new user registration request.
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct RegisterRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "Email is required"))]
    pub email: String,
    #[serde(default)]
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
}

/// Response body of a successful registration or login.
#[derive(Debug, Serialize, Deserialize)]
pub struct AuthResponse {
    pub message: String,
    /// The bearer token to send as `Authorization: Bearer <token>`.
    pub token: String,
    pub user: User,
}
