use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::store::{Entity, EntityId};

/// A project owned by exactly one user. Ownership never transfers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: EntityId,
    pub name: String,
    pub description: String,
    pub user_id: EntityId,
    pub created_at: DateTime<Utc>,
}

impl Project {
    pub fn new(input: ProjectInput, user_id: EntityId) -> Self {
        Self {
            id: 0,
            name: input.name.trim().to_string(),
            description: input.description.unwrap_or_default(),
            user_id,
            created_at: Utc::now(),
        }
    }
}

impl Entity for Project {
    fn id(&self) -> EntityId {
        self.id
    }

    fn set_id(&mut self, id: EntityId) {
        self.id = id;
    }
}

/// Body of `POST /api/projects`.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ProjectInput {
    /// Required. Whitespace-only names are rejected by the service.
    #[serde(default)]
    #[validate(length(min = 1, message = "Project name is required"))]
    pub name: String,

    #[serde(default)]
    pub description: Option<String>,
}
