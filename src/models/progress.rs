use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::error::AppError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "kebab-case")]
#[sqlx(rename_all = "kebab-case")]
pub enum HomeworkStatus {
    #[default]
    NotStarted,
    InProgress,
    Review,
    Completed,
}

/// Progress of one user on one module of one course.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleProgress {
    pub user_id: String,
    pub course_id: String,
    pub module_id: String,
    pub reading_progress: Vec<String>,
    pub homework_status: HomeworkStatus,
    pub notes: String,
    pub updated_at: String,
}

impl ModuleProgress {
    pub fn has_read(&self, reading: &str) -> bool {
        self.reading_progress.iter().any(|r| r == reading)
    }
}

/// Row shape of `schedule_progress`; `reading_progress` is a JSON array.
#[derive(Debug, FromRow)]
pub(crate) struct ProgressRow {
    pub user_id: String,
    pub course_id: String,
    pub module_id: String,
    pub reading_progress: String,
    pub homework_status: HomeworkStatus,
    pub notes: String,
    pub updated_at: String,
}

impl TryFrom<ProgressRow> for ModuleProgress {
    type Error = AppError;

    fn try_from(row: ProgressRow) -> Result<Self, Self::Error> {
        let reading_progress: Vec<String> = serde_json::from_str(&row.reading_progress)?;
        Ok(ModuleProgress {
            user_id: row.user_id,
            course_id: row.course_id,
            module_id: row.module_id,
            reading_progress,
            homework_status: row.homework_status,
            notes: row.notes,
            updated_at: row.updated_at,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpsertProgressRequest {
    #[serde(default)]
    pub course_id: String,
    #[serde(default)]
    pub module_id: String,
    #[serde(default)]
    pub reading_progress: Vec<String>,
    #[serde(default)]
    pub homework_status: HomeworkStatus,
    #[serde(default)]
    pub notes: String,
}

impl UpsertProgressRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.course_id.trim().is_empty() || self.module_id.trim().is_empty() {
            return Err(AppError::BadRequest(
                "course_id and module_id are required".to_string(),
            ));
        }
        Ok(())
    }

    /// Reading progress is a set; duplicates and blank entries are dropped,
    /// first occurrence order kept.
    pub fn normalized_readings(&self) -> Vec<String> {
        let mut readings: Vec<String> = Vec::with_capacity(self.reading_progress.len());
        for reading in &self.reading_progress {
            let reading = reading.trim();
            if !reading.is_empty() && !readings.iter().any(|r| r == reading) {
                readings.push(reading.to_string());
            }
        }
        readings
    }
}

#[derive(Debug, Deserialize)]
pub struct ProgressQuery {
    pub course_id: Option<String>,
}
