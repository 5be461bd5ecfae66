use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use validator::Validate;

use crate::store::{Entity, EntityId};

/// Represents the priority of a task.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TaskPriority {
    /// Low priority.
    Low,
    /// Medium priority.
    #[default]
    Medium,
    /// High priority.
    High,
}

/// Represents the status of a task.
///
/// Any status may follow any other; there is no terminal state.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    /// Task is yet to be started.
    #[default]
    Todo,
    /// Task is currently being worked on.
    InProgress,
    /// Task is completed.
    Done,
}

/// Returned when a string is not one of an enum's wire names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
    pub expected: &'static str,
}

impl fmt::Display for UnknownVariant {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "Invalid {} '{}': expected one of {}",
            self.kind, self.value, self.expected
        )
    }
}

impl FromStr for TaskStatus {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "todo" => Ok(TaskStatus::Todo),
            "inprogress" => Ok(TaskStatus::InProgress),
            "done" => Ok(TaskStatus::Done),
            other => Err(UnknownVariant {
                kind: "status",
                value: other.to_string(),
                expected: "todo, inprogress, done",
            }),
        }
    }
}

impl FromStr for TaskPriority {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(TaskPriority::Low),
            "medium" => Ok(TaskPriority::Medium),
            "high" => Ok(TaskPriority::High),
            other => Err(UnknownVariant {
                kind: "priority",
                value: other.to_string(),
                expected: "low, medium, high",
            }),
        }
    }
}

/// Body of `POST /api/projects/{projectId}/tasks`.
///
/// `priority` stays a string here so an unknown value is reported as a validation
/// error with a readable message rather than a JSON parse failure.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct TaskInput {
    #[serde(default)]
    #[validate(length(min = 1, message = "Task title is required"))]
    pub title: String,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub priority: Option<String>,
}

/// Body of `PUT /api/tasks/{taskId}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusUpdate {
    #[serde(default)]
    pub status: Option<String>,
}

/// A task inside a project.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: EntityId,
    pub project_id: EntityId,
    pub title: String,
    pub description: String,
    /// Username of the user who created the task.
    pub assignee: String,
    pub priority: TaskPriority,
    pub status: TaskStatus,
    pub created_at: DateTime<Utc>,
    /// Absent until the first status update.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Task {
    /// Creates an unsaved task in `todo` state.
    pub fn new(
        project_id: EntityId,
        title: String,
        description: String,
        priority: TaskPriority,
        assignee: String,
    ) -> Self {
        Self {
            id: 0,
            project_id,
            title,
            description,
            assignee,
            priority,
            status: TaskStatus::Todo,
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    /// Moves the task to `status` and stamps `updated_at`.
    pub fn set_status(&mut self, status: TaskStatus) {
        self.status = status;
        self.updated_at = Some(Utc::now());
    }
}

impl Entity for Task {
    fn id(&self) -> EntityId {
        self.id
    }

    fn set_id(&mut self, id: EntityId) {
        self.id = id;
    }
}
