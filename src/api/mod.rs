mod schedules;
mod trackers;

use axum::routing::{delete, patch, put};
use axum::{Json, Router, extract::State, http::StatusCode, routing::get};
use serde::Serialize;

use crate::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/calendar", get(calendar))
        .route("/schedules", get(schedules::list_courses).post(schedules::create_course))
        .route(
            "/schedules/{course_id}",
            put(schedules::update_course).delete(schedules::delete_course),
        )
        .route("/schedules/{course_id}/overview", get(schedules::course_overview))
        .route(
            "/schedule_progress",
            get(schedules::list_progress).post(schedules::upsert_progress),
        )
        .route(
            "/schedule_progress/{course_id}/{module_id}",
            delete(schedules::reset_module_progress),
        )
        .route("/todos", get(trackers::list_todos).post(trackers::create_todo))
        .route(
            "/todos/{id}",
            patch(trackers::update_todo).delete(trackers::delete_todo),
        )
        .route("/classes", get(trackers::list_classes).post(trackers::create_class))
        .route(
            "/classes/{id}",
            patch(trackers::update_class).delete(trackers::delete_class),
        )
        .route(
            "/assignments",
            get(trackers::list_assignments).post(trackers::create_assignment),
        )
        .route(
            "/assignments/{id}",
            patch(trackers::update_assignment).delete(trackers::delete_assignment),
        )
        .with_state(state)
}

async fn health(State(state): State<AppState>) -> Result<StatusCode, AppError> {
    sqlx::query("select 1").execute(&state.db).await?;
    Ok(StatusCode::OK)
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CalendarResponse {
    calendar_id: String,
}

/// The primary Google Calendar of an account is addressed by its email.
async fn calendar(user: AuthUser) -> Result<Json<CalendarResponse>, AppError> {
    let calendar_id = user
        .0
        .email
        .ok_or_else(|| AppError::Unauthorized("token carries no email".to_string()))?;
    Ok(Json(CalendarResponse { calendar_id }))
}
