use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::store::{Entity, EntityId};

/// A registered account. Never mutated after registration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: EntityId,
    pub username: String,
    pub email: String,
    /// bcrypt hash. Never serialized into a response.
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Builds an unsaved user; the repository assigns the id.
    pub fn new(username: String, email: String, password_hash: String) -> Self {
        Self {
            id: 0,
            username,
            email,
            password_hash,
            created_at: Utc::now(),
        }
    }
}

impl Entity for User {
    fn id(&self) -> EntityId {
        self.id
    }

    fn set_id(&mut self, id: EntityId) {
        self.id = id;
    }
}
