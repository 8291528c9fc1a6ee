use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Attendance counter for one class.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ClassRecord {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub attended: i64,
    pub total: i64,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewClassRequest {
    pub name: String,
    #[serde(default)]
    pub attended: i64,
    #[serde(default)]
    pub total: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateClassRequest {
    pub name: Option<String>,
    pub attended: Option<i64>,
    pub total: Option<i64>,
}
