use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use chrono::Local;

use crate::auth::AuthUser;
use crate::db::schedules;
use crate::error::AppError;
use crate::models::*;
use crate::services::{CourseOverview, OverviewQuery, ScheduleService};
use crate::state::AppState;

pub(super) async fn list_courses(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<Vec<Course>>, AppError> {
    let courses = schedules::fetch_courses(&state.db, user.user_id()).await?;
    Ok(Json(courses))
}

pub(super) async fn create_course(
    State(state): State<AppState>,
    user: AuthUser,
    Json(req): Json<NewCourseRequest>,
) -> Result<(StatusCode, Json<Course>), AppError> {
    let service = ScheduleService::new(state.db.clone());
    let course = service.create_course(user.user_id(), req).await?;
    Ok((StatusCode::CREATED, Json(course)))
}

pub(super) async fn update_course(
    State(state): State<AppState>,
    user: AuthUser,
    Path(course_id): Path<String>,
    Json(req): Json<UpdateCourseRequest>,
) -> Result<Json<Course>, AppError> {
    let service = ScheduleService::new(state.db.clone());
    let course = service.update_course(user.user_id(), &course_id, req).await?;
    Ok(Json(course))
}

pub(super) async fn delete_course(
    State(state): State<AppState>,
    user: AuthUser,
    Path(course_id): Path<String>,
) -> Result<Json<DeletedCourse>, AppError> {
    let service = ScheduleService::new(state.db.clone());
    let deleted = service.delete_course(user.user_id(), &course_id).await?;
    Ok(Json(deleted))
}

pub(super) async fn course_overview(
    State(state): State<AppState>,
    user: AuthUser,
    Path(course_id): Path<String>,
    Query(query): Query<OverviewQuery>,
) -> Result<Json<CourseOverview>, AppError> {
    let service = ScheduleService::new(state.db.clone());
    let today = Local::now().date_naive();
    let overview = service
        .overview(user.user_id(), &course_id, &query, today)
        .await?;
    Ok(Json(overview))
}

pub(super) async fn list_progress(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<ProgressQuery>,
) -> Result<Json<Vec<ModuleProgress>>, AppError> {
    let progress = match query.course_id.as_deref().filter(|c| !c.is_empty()) {
        Some(course_id) => schedules::fetch_progress(&state.db, user.user_id(), course_id).await?,
        None => schedules::fetch_all_progress(&state.db, user.user_id()).await?,
    };
    Ok(Json(progress))
}

pub(super) async fn upsert_progress(
    State(state): State<AppState>,
    user: AuthUser,
    Json(req): Json<UpsertProgressRequest>,
) -> Result<Json<ModuleProgress>, AppError> {
    let service = ScheduleService::new(state.db.clone());
    let progress = service.save_progress(user.user_id(), req).await?;
    Ok(Json(progress))
}

pub(super) async fn reset_module_progress(
    State(state): State<AppState>,
    user: AuthUser,
    Path((course_id, module_id)): Path<(String, String)>,
) -> Result<StatusCode, AppError> {
    let ok =
        schedules::delete_module_progress(&state.db, user.user_id(), &course_id, &module_id)
            .await?;
    if ok {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound)
    }
}
