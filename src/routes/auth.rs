use crate::{
    auth::{AuthResponse, LoginRequest, RegisterRequest},
    error::AppError,
    services::accounts,
    state::AppState,
};
use actix_web::{post, web, HttpResponse, Responder};

/// Register a new user
///
/// Creates the account together with a starter project and two starter tasks, and
/// returns an authentication token.
#[post("/register")]
pub async fn register(
    state: web::Data<AppState>,
    register_data: web::Json<RegisterRequest>,
) -> Result<impl Responder, AppError> {
    let session = accounts::register(&state, register_data.into_inner()).await?;

    Ok(HttpResponse::Created().json(AuthResponse {
        message: "User registered successfully".to_string(),
        token: session.token,
        user: session.user,
    }))
}

/// Login user
///
/// Authenticates a user and returns an authentication token.
#[post("/login")]
pub async fn login(
    state: web::Data<AppState>,
    login_data: web::Json<LoginRequest>,
) -> Result<impl Responder, AppError> {
    let session = accounts::login(&state, login_data.into_inner()).await?;

    Ok(HttpResponse::Ok().json(AuthResponse {
        message: "Login successful".to_string(),
        token: session.token,
        user: session.user,
    }))
}
