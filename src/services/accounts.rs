//! Registration and login.

use validator::Validate;

use crate::auth::password::{hash_password_blocking, verify_password_blocking};
use crate::auth::{LoginRequest, RegisterRequest};
use crate::error::AppError;
use crate::models::{Project, ProjectInput, Task, TaskPriority, User};
use crate::state::AppState;
use crate::store::EntityId;

pub const EMAIL_TAKEN_MESSAGE: &str = "Email already registered";

pub const DEFAULT_PROJECT_NAME: &str = "My First Project";
const DEFAULT_PROJECT_DESCRIPTION: &str = "A starter project created with your account";
const DEFAULT_TASKS: [(&str, &str, TaskPriority); 2] = [
    (
        "Explore your project board",
        "Move this task through todo, in progress and done",
        TaskPriority::High,
    ),
    (
        "Create your own project",
        "Projects group the tasks your team works on",
        TaskPriority::Medium,
    ),
];

/// A user together with a freshly issued bearer token.
#[derive(Debug)]
pub struct Session {
    pub user: User,
    pub token: String,
}

fn same_email(a: &str, b: &str) -> bool {
    a.eq_ignore_ascii_case(b)
}

/// Creates an account, seeds its default project and tasks, and issues a token.
pub async fn register(state: &AppState, input: RegisterRequest) -> Result<Session, AppError> {
    let input = RegisterRequest {
        username: input.username.trim().to_string(),
        email: input.email.trim().to_string(),
        password: input.password,
    };
    input.validate()?;

    // Fail fast before paying for bcrypt; insert_unique re-checks under the lock.
    let email = input.email.clone();
    if !state.users.find(&|u: &User| same_email(&u.email, &email))?.is_empty() {
        return Err(AppError::Conflict(EMAIL_TAKEN_MESSAGE.into()));
    }

    let password_hash = hash_password_blocking(input.password, state.bcrypt_cost).await?;
    let user = state.users.insert_unique(
        User::new(input.username, input.email, password_hash),
        &|u: &User| same_email(&u.email, &email),
        EMAIL_TAKEN_MESSAGE,
    )?;

    let token = match seed_defaults(state, &user).and_then(|_| state.tokens.issue(user.id)) {
        Ok(token) => token,
        Err(err) => {
            discard_account(state, user.id);
            return Err(err);
        }
    };

    log::info!("Registered user {} ({})", user.id, user.username);
    Ok(Session { user, token })
}

/// Best-effort removal of a half-registered user and whatever was seeded for them.
fn discard_account(state: &AppState, user_id: EntityId) {
    match state.projects.find(&|p: &Project| p.user_id == user_id) {
        Ok(projects) => {
            for project in projects {
                let project_id = project.id;
                match state.tasks.find(&|t: &Task| t.project_id == project_id) {
                    Ok(tasks) => {
                        for task in tasks {
                            if let Err(e) = state.tasks.delete(task.id) {
                                log::error!("Failed to discard task {}: {}", task.id, e);
                            }
                        }
                    }
                    Err(e) => log::error!("Failed to list tasks of project {}: {}", project_id, e),
                }
                if let Err(e) = state.projects.delete(project_id) {
                    log::error!("Failed to discard project {}: {}", project_id, e);
                }
            }
        }
        Err(e) => log::error!("Failed to list projects of user {}: {}", user_id, e),
    }

    match state.users.delete(user_id) {
        Ok(_) => log::warn!("Registration of user {} rolled back", user_id),
        Err(e) => log::error!("Failed to discard user {}: {}", user_id, e),
    }
}

/// Onboarding data: one project with two tasks assigned to the new user.
fn seed_defaults(state: &AppState, user: &User) -> Result<Project, AppError> {
    let project = state.projects.insert(Project::new(
        ProjectInput {
            name: DEFAULT_PROJECT_NAME.to_string(),
            description: Some(DEFAULT_PROJECT_DESCRIPTION.to_string()),
        },
        user.id,
    ))?;

    for (title, description, priority) in DEFAULT_TASKS {
        state.tasks.insert(Task::new(
            project.id,
            title.to_string(),
            description.to_string(),
            priority,
            user.username.clone(),
        ))?;
    }

    Ok(project)
}

/// Verifies credentials and issues a token.
///
/// An unknown email and a wrong password both end in `AppError::InvalidCredentials`.
pub async fn login(state: &AppState, input: LoginRequest) -> Result<Session, AppError> {
    input.validate()?;
    let email = input.email.trim();

    let user = match state
        .users
        .find(&|u: &User| same_email(&u.email, email))?
        .into_iter()
        .next()
    {
        Some(user) => user,
        None => {
            log::debug!("Login attempt for unknown email");
            return Err(AppError::InvalidCredentials);
        }
    };

    if !verify_password_blocking(input.password, user.password_hash.clone()).await? {
        log::warn!("Failed login for user {}", user.id);
        return Err(AppError::InvalidCredentials);
    }

    let token = state.tokens.issue(user.id)?;
    log::info!("User {} logged in", user.id);
    Ok(Session { user, token })
}
