use std::collections::HashMap;

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use tracing::{debug, info, warn};

use crate::db::schedules;
use crate::error::AppError;
use crate::models::{
    Course, DeletedCourse, ModuleProgress, NewCourseRequest, UpdateCourseRequest,
    UpsertProgressRequest,
};
use crate::schedule::{
    Delimiter, ModuleStatus, ModuleView, ParseWarning, ScheduleStats, compute_stats,
    filter_modules, parse_schedule,
};

const DEFAULT_COURSE_NAME: &str = "Untitled Course";

pub struct ScheduleService {
    db: SqlitePool,
}

/// A course's modules merged with the caller's progress, plus statistics over
/// the whole schedule (filters only narrow `modules`).
#[derive(Debug, Serialize)]
pub struct CourseOverview {
    pub course_id: String,
    pub course_name: String,
    pub modules: Vec<ModuleView>,
    pub stats: ScheduleStats,
    pub warnings: Vec<ParseWarning>,
}

#[derive(Debug, Default, Deserialize)]
pub struct OverviewQuery {
    pub status: Option<ModuleStatus>,
    pub search: Option<String>,
}

impl ScheduleService {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    pub async fn create_course(
        &self,
        user_id: &str,
        req: NewCourseRequest,
    ) -> Result<Course, AppError> {
        validate_schedule_text(&req.schedule_data, req.file_name.as_deref())?;

        let course_id = non_blank(req.course_id)
            .unwrap_or_else(|| format!("course-{}", Utc::now().timestamp_millis()));
        let course_name = non_blank(req.course_name)
            .or_else(|| req.file_name.as_deref().map(file_stem).and_then(|s| non_blank(Some(s))))
            .unwrap_or_else(|| DEFAULT_COURSE_NAME.to_string());

        let course = schedules::insert_course(
            &self.db,
            user_id,
            &course_id,
            &course_name,
            &req.schedule_data,
        )
        .await
        .map_err(|e| AppError::from_insert(e, "course"))?;

        info!("created course {} ({}) for user {}", course.course_id, course.course_name, user_id);
        Ok(course)
    }

    pub async fn update_course(
        &self,
        user_id: &str,
        course_id: &str,
        req: UpdateCourseRequest,
    ) -> Result<Course, AppError> {
        let current = schedules::find_course(&self.db, user_id, course_id)
            .await?
            .ok_or(AppError::NotFound)?;

        if let Some(data) = &req.schedule_data {
            validate_schedule_text(data, None)?;
        }
        let course_name = non_blank(req.course_name).unwrap_or(current.course_name);
        let schedule_data = req.schedule_data.unwrap_or(current.schedule_data);

        let course =
            schedules::update_course(&self.db, user_id, course_id, &course_name, &schedule_data)
                .await?
                .ok_or(AppError::NotFound)?;

        info!("updated course {} for user {}", course_id, user_id);
        Ok(course)
    }

    pub async fn delete_course(
        &self,
        user_id: &str,
        course_id: &str,
    ) -> Result<DeletedCourse, AppError> {
        let (deleted, progress_entries_deleted) =
            schedules::delete_course(&self.db, user_id, course_id)
                .await?
                .ok_or(AppError::NotFound)?;

        info!(
            "deleted course {} and {} progress entries for user {}",
            course_id, progress_entries_deleted, user_id
        );
        Ok(DeletedCourse {
            deleted,
            progress_entries_deleted,
        })
    }

    pub async fn overview(
        &self,
        user_id: &str,
        course_id: &str,
        query: &OverviewQuery,
        today: NaiveDate,
    ) -> Result<CourseOverview, AppError> {
        let course = schedules::find_course(&self.db, user_id, course_id)
            .await?
            .ok_or(AppError::NotFound)?;

        let parsed = parse_schedule(&course.schedule_data, today);
        if !parsed.warnings.is_empty() {
            warn!(
                "course {} has {} schedule rows with issues",
                course_id,
                parsed.warnings.len()
            );
        }

        let progress: HashMap<String, ModuleProgress> =
            schedules::fetch_progress(&self.db, user_id, course_id)
                .await?
                .into_iter()
                .map(|p| (p.module_id.clone(), p))
                .collect();

        let stats = compute_stats(&parsed.modules, &progress);
        debug!("course {} stats: {:?}", course_id, stats);

        let modules = filter_modules(&parsed.modules, query.status, query.search.as_deref())
            .into_iter()
            .map(|m| ModuleView::new(m.clone(), progress.get(&m.id)))
            .collect();

        Ok(CourseOverview {
            course_id: course.course_id,
            course_name: course.course_name,
            modules,
            stats,
            warnings: parsed.warnings,
        })
    }

    /// Upserts progress for one module of one of the caller's courses.
    pub async fn save_progress(
        &self,
        user_id: &str,
        req: UpsertProgressRequest,
    ) -> Result<ModuleProgress, AppError> {
        req.validate()?;

        if schedules::find_course(&self.db, user_id, &req.course_id)
            .await?
            .is_none()
        {
            return Err(AppError::NotFound);
        }

        let readings = req.normalized_readings();
        let progress = schedules::upsert_progress(
            &self.db,
            user_id,
            &req.course_id,
            &req.module_id,
            &readings,
            req.homework_status,
            &req.notes,
        )
        .await?;

        debug!(
            "saved progress for {}/{} ({} readings, {:?})",
            progress.course_id,
            progress.module_id,
            progress.reading_progress.len(),
            progress.homework_status
        );
        Ok(progress)
    }
}

/// Rejects uploads without a data row, and files whose extension names a
/// different delimiter than the header actually uses.
fn validate_schedule_text(text: &str, file_name: Option<&str>) -> Result<(), AppError> {
    let mut lines = text.trim().lines().filter(|l| !l.trim().is_empty());
    let header = lines.next().unwrap_or_default();
    if lines.next().is_none() {
        return Err(AppError::BadRequest(
            "File must contain at least a header and one data row".to_string(),
        ));
    }

    if let Some(expected) = file_name.and_then(Delimiter::from_file_name) {
        let found = Delimiter::sniff(header);
        if found != expected {
            return Err(AppError::BadRequest(format!(
                "file extension suggests {:?}-separated values but the header is {:?}-separated",
                expected, found
            )));
        }
    }
    Ok(())
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn file_stem(file_name: &str) -> String {
    let base = file_name.rsplit(['/', '\\']).next().unwrap_or(file_name);
    match base.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem.to_string(),
        _ => base.to_string(),
    }
}
