pub mod auth;
pub mod health;
pub mod projects;
pub mod tasks;

use actix_web::{web, HttpResponse};

use crate::{auth::AuthMiddleware, error::AppError, state::AppState};

/// Routes under `/api`. Everything except register, login and test is gated by
/// `AuthMiddleware` (see `auth::middleware::PUBLIC_PATHS`).
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(auth::register)
        .service(auth::login)
        .service(health::api_test)
        .service(projects::list_projects)
        .service(projects::create_project)
        .service(projects::list_project_tasks)
        .service(projects::create_project_task)
        .service(tasks::update_task)
        .service(tasks::delete_task);
}

/// Malformed JSON bodies become `400 {"message": ...}` like every other error.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        AppError::BadRequest(format!("Invalid request body: {}", err)).into()
    })
}

/// Non-numeric ids in the path become `400 {"message": ...}`.
pub fn path_config() -> web::PathConfig {
    web::PathConfig::default().error_handler(|err, _req| {
        AppError::BadRequest(format!("Invalid path parameter: {}", err)).into()
    })
}

async fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(serde_json::json!({ "message": "Route not found" }))
}

/// Full application wiring: shared state, extractor configs, public endpoints and the
/// gated `/api` scope. Used by `main` and by the integration tests.
///
/// `AuthMiddleware` wraps the whole scope, including its default service, so an
/// unknown `/api/*` path answers 401 without a token and 404 only with a valid one.
/// Unauthenticated callers learn nothing about which routes exist.
pub fn configure(state: web::Data<AppState>) -> impl FnOnce(&mut web::ServiceConfig) {
    move |cfg: &mut web::ServiceConfig| {
        let tokens = state.tokens.clone();
        cfg.app_data(state)
            .app_data(json_config())
            .app_data(path_config())
            .service(health::index)
            .service(health::health)
            .service(
                web::scope("/api")
                    .wrap(AuthMiddleware::new(tokens))
                    .configure(config)
                    .default_service(web::to(not_found)),
            );
    }
}
