use crate::{
    auth::AuthenticatedUserId, error::AppError, models::StatusUpdate, services::tasks,
    state::AppState,
};
use actix_web::{delete, put, web, HttpResponse, Responder};
use serde_json::json;

/// Updates the status of a task.
///
/// ## Request Body:
/// - `status`: one of `todo`, `inprogress`, `done`.
///
/// ## Responses:
/// - `200 OK`: the updated `Task`, with `updatedAt` set.
/// - `400 Bad Request`: missing or unknown status.
/// - `403 Forbidden`: the caller does not own the task's project.
/// - `404 Not Found`: no such task.
#[put("/tasks/{task_id}")]
pub async fn update_task(
    state: web::Data<AppState>,
    user: AuthenticatedUserId,
    task_id: web::Path<u64>,
    status_data: web::Json<StatusUpdate>,
) -> Result<impl Responder, AppError> {
    let task = tasks::update_task_status(
        &state,
        user.0,
        task_id.into_inner(),
        status_data.into_inner(),
    )?;
    Ok(HttpResponse::Ok().json(task))
}

/// Deletes a task by its ID.
///
/// ## Responses:
/// - `200 OK`: `{"message": "Task deleted successfully"}`.
/// - `403 Forbidden`: the caller does not own the task's project.
/// - `404 Not Found`: no such task.
#[delete("/tasks/{task_id}")]
pub async fn delete_task(
    state: web::Data<AppState>,
    user: AuthenticatedUserId,
    task_id: web::Path<u64>,
) -> Result<impl Responder, AppError> {
    tasks::delete_task(&state, user.0, task_id.into_inner())?;
    Ok(HttpResponse::Ok().json(json!({
        "message": "Task deleted successfully"
    })))
}
