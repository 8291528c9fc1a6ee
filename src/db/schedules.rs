use chrono::Utc;
use sqlx::{SqliteExecutor, SqlitePool};

use crate::error::AppError;
use crate::models::progress::ProgressRow;
use crate::models::{Course, HomeworkStatus, ModuleProgress};

const COURSE_COLUMNS: &str =
    "user_id, course_id, course_name, schedule_data, created_at, updated_at";

const PROGRESS_COLUMNS: &str =
    "user_id, course_id, module_id, reading_progress, homework_status, notes, updated_at";

pub async fn fetch_courses(db: &SqlitePool, user_id: &str) -> Result<Vec<Course>, sqlx::Error> {
    sqlx::query_as::<_, Course>(&format!(
        r#"
        SELECT {COURSE_COLUMNS}
        FROM schedules
        WHERE user_id = ?
        ORDER BY created_at DESC, course_id DESC
        "#
    ))
    .bind(user_id)
    .fetch_all(db)
    .await
}

pub async fn find_course(
    db: &SqlitePool,
    user_id: &str,
    course_id: &str,
) -> Result<Option<Course>, sqlx::Error> {
    sqlx::query_as::<_, Course>(&format!(
        "SELECT {COURSE_COLUMNS} FROM schedules WHERE user_id = ? AND course_id = ?"
    ))
    .bind(user_id)
    .bind(course_id)
    .fetch_optional(db)
    .await
}

pub async fn insert_course(
    db: &SqlitePool,
    user_id: &str,
    course_id: &str,
    course_name: &str,
    schedule_data: &str,
) -> Result<Course, sqlx::Error> {
    let now = Utc::now().to_rfc3339();

    sqlx::query_as::<_, Course>(&format!(
        r#"
        INSERT INTO schedules ({COURSE_COLUMNS})
        VALUES (?1, ?2, ?3, ?4, ?5, ?5)
        RETURNING {COURSE_COLUMNS}
        "#
    ))
    .bind(user_id)
    .bind(course_id)
    .bind(course_name)
    .bind(schedule_data)
    .bind(&now)
    .fetch_one(db)
    .await
}

/// Replaces name and schedule text. Returns `None` when the course does not
/// belong to `user_id`.
pub async fn update_course(
    db: &SqlitePool,
    user_id: &str,
    course_id: &str,
    course_name: &str,
    schedule_data: &str,
) -> Result<Option<Course>, sqlx::Error> {
    let now = Utc::now().to_rfc3339();

    sqlx::query_as::<_, Course>(&format!(
        r#"
        UPDATE schedules
        SET course_name = ?1,
            schedule_data = ?2,
            updated_at = ?3
        WHERE user_id = ?4 AND course_id = ?5
        RETURNING {COURSE_COLUMNS}
        "#
    ))
    .bind(course_name)
    .bind(schedule_data)
    .bind(&now)
    .bind(user_id)
    .bind(course_id)
    .fetch_optional(db)
    .await
}

/// Deletes a course together with all progress recorded against it, in one
/// transaction. Returns the deleted course and the number of progress rows
/// removed, or `None` when the course does not exist.
pub async fn delete_course(
    db: &SqlitePool,
    user_id: &str,
    course_id: &str,
) -> Result<Option<(Course, u64)>, sqlx::Error> {
    let mut tx = db.begin().await?;

    let progress_deleted = delete_course_progress(&mut *tx, user_id, course_id).await?;

    let deleted = sqlx::query_as::<_, Course>(&format!(
        "DELETE FROM schedules WHERE user_id = ? AND course_id = ? RETURNING {COURSE_COLUMNS}"
    ))
    .bind(user_id)
    .bind(course_id)
    .fetch_optional(&mut *tx)
    .await?;

    match deleted {
        Some(course) => {
            tx.commit().await?;
            Ok(Some((course, progress_deleted)))
        }
        None => {
            tx.rollback().await?;
            Ok(None)
        }
    }
}

pub async fn fetch_progress(
    db: &SqlitePool,
    user_id: &str,
    course_id: &str,
) -> Result<Vec<ModuleProgress>, AppError> {
    sqlx::query_as::<_, ProgressRow>(&format!(
        r#"
        SELECT {PROGRESS_COLUMNS}
        FROM schedule_progress
        WHERE user_id = ? AND course_id = ?
        ORDER BY module_id
        "#
    ))
    .bind(user_id)
    .bind(course_id)
    .fetch_all(db)
    .await?
    .into_iter()
    .map(ModuleProgress::try_from)
    .collect()
}

pub async fn fetch_all_progress(
    db: &SqlitePool,
    user_id: &str,
) -> Result<Vec<ModuleProgress>, AppError> {
    sqlx::query_as::<_, ProgressRow>(&format!(
        r#"
        SELECT {PROGRESS_COLUMNS}
        FROM schedule_progress
        WHERE user_id = ?
        ORDER BY course_id, module_id
        "#
    ))
    .bind(user_id)
    .fetch_all(db)
    .await?
    .into_iter()
    .map(ModuleProgress::try_from)
    .collect()
}

/// Inserts or replaces the progress row for `(user_id, course_id, module_id)`
/// in a single statement and returns the stored row.
pub async fn upsert_progress(
    db: &SqlitePool,
    user_id: &str,
    course_id: &str,
    module_id: &str,
    reading_progress: &[String],
    homework_status: HomeworkStatus,
    notes: &str,
) -> Result<ModuleProgress, AppError> {
    let now = Utc::now().to_rfc3339();
    let readings = serde_json::to_string(reading_progress)?;

    let row = sqlx::query_as::<_, ProgressRow>(&format!(
        r#"
        INSERT INTO schedule_progress ({PROGRESS_COLUMNS})
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
        ON CONFLICT(user_id, course_id, module_id) DO UPDATE SET
            reading_progress = excluded.reading_progress,
            homework_status = excluded.homework_status,
            notes = excluded.notes,
            updated_at = excluded.updated_at
        RETURNING {PROGRESS_COLUMNS}
        "#
    ))
    .bind(user_id)
    .bind(course_id)
    .bind(module_id)
    .bind(readings)
    .bind(homework_status)
    .bind(notes)
    .bind(now)
    .fetch_one(db)
    .await?;

    ModuleProgress::try_from(row)
}

pub async fn delete_course_progress<'e>(
    db: impl SqliteExecutor<'e>,
    user_id: &str,
    course_id: &str,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM schedule_progress WHERE user_id = ? AND course_id = ?")
        .bind(user_id)
        .bind(course_id)
        .execute(db)
        .await?;

    Ok(result.rows_affected())
}

pub async fn delete_module_progress(
    db: &SqlitePool,
    user_id: &str,
    course_id: &str,
    module_id: &str,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        "DELETE FROM schedule_progress WHERE user_id = ? AND course_id = ? AND module_id = ?",
    )
    .bind(user_id)
    .bind(course_id)
    .bind(module_id)
    .execute(db)
    .await?
    .rows_affected();

    Ok(result > 0)
}
