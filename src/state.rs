use std::sync::Arc;

use crate::auth::TokenService;
use crate::config::Config;
use crate::models::{Project, Task, User};
use crate::store::{MemoryRepository, Repository};

/// Everything a handler needs, shared across workers as `web::Data<AppState>`.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn Repository<User>>,
    pub projects: Arc<dyn Repository<Project>>,
    pub tasks: Arc<dyn Repository<Task>>,
    pub tokens: Arc<TokenService>,
    pub bcrypt_cost: u32,
    pub strict_task_listing: bool,
}

impl AppState {
    /// Fresh in-memory state configured from `config`.
    pub fn in_memory(config: &Config) -> Self {
        Self::with_repositories(
            config,
            Arc::new(MemoryRepository::<User>::new("users")),
            Arc::new(MemoryRepository::<Project>::new("projects")),
            Arc::new(MemoryRepository::<Task>::new("tasks")),
        )
    }

    pub fn with_repositories(
        config: &Config,
        users: Arc<dyn Repository<User>>,
        projects: Arc<dyn Repository<Project>>,
        tasks: Arc<dyn Repository<Task>>,
    ) -> Self {
        Self {
            users,
            projects,
            tasks,
            tokens: Arc::new(TokenService::new(&config.jwt_secret, config.token_ttl_hours)),
            bcrypt_cost: config.bcrypt_cost,
            strict_task_listing: config.strict_task_listing,
        }
    }
}
