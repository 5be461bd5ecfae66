use crate::{
    auth::AuthenticatedUserId,
    error::AppError,
    models::{ProjectInput, TaskInput},
    services::{projects, tasks},
    state::AppState,
};
use actix_web::{get, post, web, HttpResponse, Responder};

/// Lists the caller's projects.
///
/// ## Responses:
/// - `200 OK`: JSON array of `Project` objects, oldest first.
/// - `401 Unauthorized` / `403 Forbidden`: missing or invalid token.
#[get("/projects")]
pub async fn list_projects(
    state: web::Data<AppState>,
    user: AuthenticatedUserId,
) -> Result<impl Responder, AppError> {
    let projects = projects::list_projects(&state, user.0)?;
    Ok(HttpResponse::Ok().json(projects))
}

/// Creates a project owned by the caller.
///
/// ## Request Body:
/// - `name`: required, non-blank.
/// - `description` (optional): defaults to an empty string.
///
/// ## Responses:
/// - `201 Created`: the new `Project`.
/// - `400 Bad Request`: blank name or malformed body.
#[post("/projects")]
pub async fn create_project(
    state: web::Data<AppState>,
    user: AuthenticatedUserId,
    project_data: web::Json<ProjectInput>,
) -> Result<impl Responder, AppError> {
    let project = projects::create_project(&state, user.0, project_data.into_inner())?;
    Ok(HttpResponse::Created().json(project))
}

/// Lists the tasks of a project.
///
/// Any authenticated caller may list any project unless `STRICT_TASK_LISTING` is on,
/// in which case non-owners get `403` and unknown projects `404`.
#[get("/projects/{project_id}/tasks")]
pub async fn list_project_tasks(
    state: web::Data<AppState>,
    user: AuthenticatedUserId,
    project_id: web::Path<u64>,
) -> Result<impl Responder, AppError> {
    let tasks = tasks::list_tasks(&state, user.0, project_id.into_inner())?;
    Ok(HttpResponse::Ok().json(tasks))
}

/// Creates a task in one of the caller's projects.
///
/// ## Request Body:
/// - `title`: required, non-blank.
/// - `description` (optional).
/// - `priority` (optional): `low`, `medium` (default) or `high`.
///
/// ## Responses:
/// - `201 Created`: the new `Task`, assigned to the caller.
/// - `400 Bad Request`: blank title or unknown priority.
/// - `403 Forbidden`: the project belongs to someone else.
/// - `404 Not Found`: no such project.
#[post("/projects/{project_id}/tasks")]
pub async fn create_project_task(
    state: web::Data<AppState>,
    user: AuthenticatedUserId,
    project_id: web::Path<u64>,
    task_data: web::Json<TaskInput>,
) -> Result<impl Responder, AppError> {
    let task = tasks::create_task(
        &state,
        user.0,
        project_id.into_inner(),
        task_data.into_inner(),
    )?;
    Ok(HttpResponse::Created().json(task))
}
