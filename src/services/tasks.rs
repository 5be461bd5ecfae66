//! Task registry and the ownership rule guarding task writes.

use validator::Validate;

use crate::error::AppError;
use crate::models::{Project, StatusUpdate, Task, TaskInput, TaskPriority, TaskStatus};
use crate::state::AppState;
use crate::store::EntityId;

/// True iff `project_id` exists and belongs to `user_id`.
pub fn owns_project(
    state: &AppState,
    user_id: EntityId,
    project_id: EntityId,
) -> Result<bool, AppError> {
    Ok(state
        .projects
        .get(project_id)?
        .map_or(false, |project| project.user_id == user_id))
}

/// The ownership rule: only the owner of a task's project may change the task.
pub fn can_mutate(state: &AppState, user_id: EntityId, task: &Task) -> Result<bool, AppError> {
    owns_project(state, user_id, task.project_id)
}

fn owned_project(
    state: &AppState,
    user_id: EntityId,
    project_id: EntityId,
) -> Result<Project, AppError> {
    let project = state
        .projects
        .get(project_id)?
        .ok_or_else(|| AppError::NotFound("Project not found".into()))?;
    if project.user_id != user_id {
        return Err(AppError::Forbidden(
            "You do not have access to this project".into(),
        ));
    }
    Ok(project)
}

fn existing_task(state: &AppState, task_id: EntityId) -> Result<Task, AppError> {
    state
        .tasks
        .get(task_id)?
        .ok_or_else(|| AppError::NotFound("Task not found".into()))
}

/// Tasks of `project_id`, oldest first.
///
/// Unless `strict_task_listing` is configured, any authenticated user may list any
/// project's tasks, and an unknown project simply has no tasks.
pub fn list_tasks(
    state: &AppState,
    user_id: EntityId,
    project_id: EntityId,
) -> Result<Vec<Task>, AppError> {
    if state.strict_task_listing {
        owned_project(state, user_id, project_id)?;
    }
    Ok(state.tasks.find(&|t: &Task| t.project_id == project_id)?)
}

pub fn create_task(
    state: &AppState,
    user_id: EntityId,
    project_id: EntityId,
    input: TaskInput,
) -> Result<Task, AppError> {
    input.validate()?;
    let title = input.title.trim().to_string();
    if title.is_empty() {
        return Err(AppError::ValidationError("Task title is required".into()));
    }
    let priority = match input.priority.as_deref() {
        Some(raw) => raw
            .parse::<TaskPriority>()
            .map_err(|e| AppError::ValidationError(e.to_string()))?,
        None => TaskPriority::default(),
    };

    let project = owned_project(state, user_id, project_id)?;
    let creator = state
        .users
        .get(user_id)?
        .ok_or_else(|| AppError::Unauthorized("User no longer exists".into()))?;

    let task = state.tasks.insert(Task::new(
        project.id,
        title,
        input.description.unwrap_or_default(),
        priority,
        creator.username,
    ))?;
    log::info!(
        "User {} created task {} in project {}",
        user_id,
        task.id,
        project.id
    );
    Ok(task)
}

/// Sets a task's status. Any status may follow any other.
pub fn update_task_status(
    state: &AppState,
    user_id: EntityId,
    task_id: EntityId,
    input: StatusUpdate,
) -> Result<Task, AppError> {
    let status = input
        .status
        .as_deref()
        .ok_or_else(|| AppError::ValidationError("Status is required".into()))?
        .parse::<TaskStatus>()
        .map_err(|e| AppError::ValidationError(e.to_string()))?;

    let mut task = existing_task(state, task_id)?;
    if !can_mutate(state, user_id, &task)? {
        return Err(AppError::Forbidden(
            "Only the project owner can update this task".into(),
        ));
    }

    task.set_status(status);
    state
        .tasks
        .update(task)?
        .ok_or_else(|| AppError::NotFound("Task not found".into()))
}

pub fn delete_task(state: &AppState, user_id: EntityId, task_id: EntityId) -> Result<(), AppError> {
    let task = existing_task(state, task_id)?;
    if !can_mutate(state, user_id, &task)? {
        return Err(AppError::Forbidden(
            "Only the project owner can delete this task".into(),
        ));
    }

    match state.tasks.delete(task_id)? {
        Some(_) => {
            log::info!("User {} deleted task {}", user_id, task_id);
            Ok(())
        }
        None => Err(AppError::NotFound("Task not found".into())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::models::{ProjectInput, User};
    use crate::services::projects::create_project;

    struct Fixture {
        state: AppState,
        owner: EntityId,
        other: EntityId,
        project: EntityId,
    }

    fn fixture(strict: bool) -> Fixture {
        let mut config = Config::new("tasks_secret");
        config.strict_task_listing = strict;
        let state = AppState::in_memory(&config);

        let owner = state
            .users
            .insert(User::new("owner".into(), "o@x.com".into(), "hash".into()))
            .unwrap()
            .id;
        let other = state
            .users
            .insert(User::new("other".into(), "t@x.com".into(), "hash".into()))
            .unwrap()
            .id;
        let project = create_project(
            &state,
            owner,
            ProjectInput {
                name: "Board".into(),
                description: None,
            },
        )
        .unwrap()
        .id;

        Fixture {
            state,
            owner,
            other,
            project,
        }
    }

    fn task_input(title: &str, priority: Option<&str>) -> TaskInput {
        TaskInput {
            title: title.to_string(),
            description: None,
            priority: priority.map(str::to_string),
        }
    }

    fn status(value: &str) -> StatusUpdate {
        StatusUpdate {
            status: Some(value.to_string()),
        }
    }

    #[test]
    fn test_create_task_defaults() {
        let f = fixture(false);
        let task = create_task(&f.state, f.owner, f.project, task_input("Write", None)).unwrap();

        assert_eq!(task.assignee, "owner");
        assert_eq!(task.priority, TaskPriority::Medium);
        assert_eq!(task.status, TaskStatus::Todo);
        assert_eq!(task.description, "");
        assert!(task.updated_at.is_none());
    }

    #[test]
    fn test_create_task_validation() {
        let f = fixture(false);
        let err = create_task(&f.state, f.owner, f.project, task_input("", None)).unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));

        let err = create_task(&f.state, f.owner, f.project, task_input("X", Some("urgent")))
            .unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));

        assert_eq!(f.state.tasks.count().unwrap(), 0);
    }

    #[test]
    fn test_create_task_requires_owned_existing_project() {
        let f = fixture(false);
        let err = create_task(&f.state, f.other, f.project, task_input("Sneaky", None))
            .unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));

        let err = create_task(&f.state, f.owner, 999, task_input("Lost", None)).unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[test]
    fn test_update_status_only_by_owner() {
        let f = fixture(false);
        let task = create_task(&f.state, f.owner, f.project, task_input("Ship", None)).unwrap();

        let err = update_task_status(&f.state, f.other, task.id, status("done")).unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));
        assert_eq!(
            f.state.tasks.get(task.id).unwrap().unwrap().status,
            TaskStatus::Todo
        );

        let updated = update_task_status(&f.state, f.owner, task.id, status("done")).unwrap();
        assert_eq!(updated.status, TaskStatus::Done);
        assert!(updated.updated_at.is_some());

        let reopened =
            update_task_status(&f.state, f.owner, task.id, status("inprogress")).unwrap();
        assert_eq!(reopened.status, TaskStatus::InProgress);
    }

    #[test]
    fn test_update_status_errors() {
        let f = fixture(false);
        let task = create_task(&f.state, f.owner, f.project, task_input("Ship", None)).unwrap();

        let err = update_task_status(&f.state, f.owner, task.id, status("finished")).unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));

        let err = update_task_status(&f.state, f.owner, task.id, StatusUpdate { status: None })
            .unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));

        let err = update_task_status(&f.state, f.owner, 404, status("done")).unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[test]
    fn test_delete_task() {
        let f = fixture(false);
        let keep = create_task(&f.state, f.owner, f.project, task_input("Keep", None)).unwrap();
        let doomed = create_task(&f.state, f.owner, f.project, task_input("Drop", None)).unwrap();

        let err = delete_task(&f.state, f.other, doomed.id).unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));

        delete_task(&f.state, f.owner, doomed.id).unwrap();
        let remaining = list_tasks(&f.state, f.owner, f.project).unwrap();
        assert_eq!(remaining, vec![keep]);

        let err = delete_task(&f.state, f.owner, doomed.id).unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[test]
    fn test_list_tasks_open_by_default() {
        let f = fixture(false);
        create_task(&f.state, f.owner, f.project, task_input("Visible", None)).unwrap();

        assert_eq!(list_tasks(&f.state, f.other, f.project).unwrap().len(), 1);
        assert!(list_tasks(&f.state, f.other, 999).unwrap().is_empty());
    }

    #[test]
    fn test_list_tasks_strict_mode() {
        let f = fixture(true);
        create_task(&f.state, f.owner, f.project, task_input("Private", None)).unwrap();

        assert_eq!(list_tasks(&f.state, f.owner, f.project).unwrap().len(), 1);
        assert!(matches!(
            list_tasks(&f.state, f.other, f.project),
            Err(AppError::Forbidden(_))
        ));
        assert!(matches!(
            list_tasks(&f.state, f.owner, 999),
            Err(AppError::NotFound(_))
        ));
    }

    #[test]
    fn test_can_mutate_false_when_project_missing() {
        let f = fixture(false);
        let orphan = Task::new(
            12345,
            "Orphan".into(),
            String::new(),
            TaskPriority::Low,
            "owner".into(),
        );
        assert!(!can_mutate(&f.state, f.owner, &orphan).unwrap());
    }
}
