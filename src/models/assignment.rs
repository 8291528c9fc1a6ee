use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum AssignmentKind {
    #[default]
    Assignment,
    Exam,
    Project,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum AssignmentStatus {
    #[default]
    Pending,
    InProgress,
    Completed,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

/// An assignment, exam or project with a due date.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Assignment {
    pub id: String,
    pub user_id: String,
    pub title: String,
    #[serde(rename = "type")]
    pub kind: AssignmentKind,
    pub description: String,
    pub due_date: String,
    pub class_name: String,
    pub status: AssignmentStatus,
    pub priority: Priority,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewAssignmentRequest {
    #[serde(default)]
    pub title: String,
    #[serde(rename = "type", default)]
    pub kind: AssignmentKind,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub due_date: String,
    #[serde(default)]
    pub class_name: String,
    #[serde(default)]
    pub status: AssignmentStatus,
    #[serde(default)]
    pub priority: Priority,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateAssignmentRequest {
    pub title: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<AssignmentKind>,
    pub description: Option<String>,
    pub due_date: Option<String>,
    pub class_name: Option<String>,
    pub status: Option<AssignmentStatus>,
    pub priority: Option<Priority>,
}
