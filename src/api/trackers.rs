use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;

use crate::auth::AuthUser;
use crate::db::repository;
use crate::error::AppError;
use crate::models::*;
use crate::state::AppState;

fn check_not_blank(value: Option<&str>, field: &str) -> Result<(), AppError> {
    match value {
        Some(v) if v.trim().is_empty() => {
            Err(AppError::BadRequest(format!("{} is required", field)))
        }
        _ => Ok(()),
    }
}

pub(super) async fn list_todos(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<Vec<Todo>>, AppError> {
    let todos = repository::fetch_todos(&state.db, user.user_id()).await?;
    Ok(Json(todos))
}

pub(super) async fn create_todo(
    State(state): State<AppState>,
    user: AuthUser,
    Json(req): Json<NewTodoRequest>,
) -> Result<(StatusCode, Json<Todo>), AppError> {
    check_not_blank(Some(req.text.as_str()), "text")?;
    let todo = repository::insert_todo(&state.db, user.user_id(), req).await?;
    Ok((StatusCode::CREATED, Json(todo)))
}

pub(super) async fn update_todo(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
    Json(req): Json<UpdateTodoRequest>,
) -> Result<Json<Todo>, AppError> {
    check_not_blank(req.text.as_deref(), "text")?;
    let todo = repository::update_todo(&state.db, user.user_id(), &id, req)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(Json(todo))
}

pub(super) async fn delete_todo(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    let ok = repository::delete_todo(&state.db, user.user_id(), &id).await?;
    if ok {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound)
    }
}

fn check_counts(attended: i64, total: i64) -> Result<(), AppError> {
    if attended < 0 || total < 0 {
        return Err(AppError::BadRequest(
            "attended and total must not be negative".to_string(),
        ));
    }
    Ok(())
}

pub(super) async fn list_classes(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<Vec<ClassRecord>>, AppError> {
    let classes = repository::fetch_classes(&state.db, user.user_id()).await?;
    Ok(Json(classes))
}

pub(super) async fn create_class(
    State(state): State<AppState>,
    user: AuthUser,
    Json(req): Json<NewClassRequest>,
) -> Result<(StatusCode, Json<ClassRecord>), AppError> {
    check_not_blank(Some(req.name.as_str()), "name")?;
    check_counts(req.attended, req.total)?;
    let class = repository::insert_class(&state.db, user.user_id(), req).await?;
    Ok((StatusCode::CREATED, Json(class)))
}

pub(super) async fn update_class(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
    Json(req): Json<UpdateClassRequest>,
) -> Result<Json<ClassRecord>, AppError> {
    check_not_blank(req.name.as_deref(), "name")?;
    check_counts(req.attended.unwrap_or(0), req.total.unwrap_or(0))?;
    let class = repository::update_class(&state.db, user.user_id(), &id, req)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(Json(class))
}

pub(super) async fn delete_class(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    let ok = repository::delete_class(&state.db, user.user_id(), &id).await?;
    if ok {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound)
    }
}

pub(super) async fn list_assignments(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<Vec<Assignment>>, AppError> {
    let assignments = repository::fetch_assignments(&state.db, user.user_id()).await?;
    Ok(Json(assignments))
}

pub(super) async fn create_assignment(
    State(state): State<AppState>,
    user: AuthUser,
    Json(req): Json<NewAssignmentRequest>,
) -> Result<(StatusCode, Json<Assignment>), AppError> {
    check_not_blank(Some(req.title.as_str()), "title")?;
    let assignment = repository::insert_assignment(&state.db, user.user_id(), req).await?;
    Ok((StatusCode::CREATED, Json(assignment)))
}

pub(super) async fn update_assignment(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
    Json(req): Json<UpdateAssignmentRequest>,
) -> Result<Json<Assignment>, AppError> {
    check_not_blank(req.title.as_deref(), "title")?;
    let assignment = repository::update_assignment(&state.db, user.user_id(), &id, req)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(Json(assignment))
}

pub(super) async fn delete_assignment(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    let ok = repository::delete_assignment(&state.db, user.user_id(), &id).await?;
    if ok {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound)
    }
}
