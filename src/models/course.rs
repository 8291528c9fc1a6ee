use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// An uploaded course schedule. `schedule_data` keeps the raw text so modules
/// can be re-derived on every load.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Course {
    pub user_id: String,
    pub course_id: String,
    pub course_name: String,
    pub schedule_data: String,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewCourseRequest {
    pub course_id: Option<String>,
    pub course_name: Option<String>,
    #[serde(default)]
    pub schedule_data: String,
    /// Name of the uploaded file; its stem is the fallback course name and its
    /// extension must agree with the delimiter found in the header.
    pub file_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateCourseRequest {
    pub course_name: Option<String>,
    pub schedule_data: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DeletedCourse {
    pub deleted: Course,
    pub progress_entries_deleted: u64,
}
