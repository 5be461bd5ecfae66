use validator::Validate;

use crate::error::AppError;
use crate::models::{Project, ProjectInput};
use crate::state::AppState;
use crate::store::EntityId;

/// Projects owned by `user_id`, oldest first.
pub fn list_projects(state: &AppState, user_id: EntityId) -> Result<Vec<Project>, AppError> {
    Ok(state.projects.find(&|p: &Project| p.user_id == user_id)?)
}

pub fn create_project(
    state: &AppState,
    user_id: EntityId,
    input: ProjectInput,
) -> Result<Project, AppError> {
    input.validate()?;
    if input.name.trim().is_empty() {
        return Err(AppError::ValidationError("Project name is required".into()));
    }

    let project = state.projects.insert(Project::new(input, user_id))?;
    log::info!("User {} created project {}", user_id, project.id);
    Ok(project)
}
