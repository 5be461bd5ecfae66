use actix_web::{get, web, HttpResponse, Responder};
use chrono::Utc;
use serde_json::json;

use crate::{error::AppError, state::AppState};

/// Health check endpoint
///
/// Returns the current status of the API and timestamp.
#[get("/health")]
pub async fn health() -> impl Responder {
    HttpResponse::Ok().json(json!({
        "status": "ok",
        "timestamp": Utc::now()
    }))
}

/// Smoke-test endpoint reporting how many records are held in memory.
#[get("/test")]
pub async fn api_test(state: web::Data<AppState>) -> Result<impl Responder, AppError> {
    Ok(HttpResponse::Ok().json(json!({
        "message": "API is working",
        "users": state.users.count()?,
        "projects": state.projects.count()?,
        "tasks": state.tasks.count()?,
        "timestamp": Utc::now()
    })))
}

/// API map.
#[get("/")]
pub async fn index() -> impl Responder {
    HttpResponse::Ok().json(json!({
        "name": "Team Collaboration Hub API",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "register": "POST /api/register",
            "login": "POST /api/login",
            "listProjects": "GET /api/projects",
            "createProject": "POST /api/projects",
            "listTasks": "GET /api/projects/:projectId/tasks",
            "createTask": "POST /api/projects/:projectId/tasks",
            "updateTask": "PUT /api/tasks/:taskId",
            "deleteTask": "DELETE /api/tasks/:taskId",
            "test": "GET /api/test",
            "health": "GET /health"
        }
    }))
}
