use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::models::{
    Assignment, ClassRecord, NewAssignmentRequest, NewClassRequest, NewTodoRequest, Todo,
    UpdateAssignmentRequest, UpdateClassRequest, UpdateTodoRequest,
};

pub async fn fetch_todos(db: &SqlitePool, user_id: &str) -> Result<Vec<Todo>, sqlx::Error> {
    sqlx::query_as::<_, Todo>(
        r#"
        SELECT id, user_id, text, done, created_at
        FROM todos
        WHERE user_id = ?
        ORDER BY created_at, id
        "#,
    )
    .bind(user_id)
    .fetch_all(db)
    .await
}

pub async fn find_todo_by_id(
    db: &SqlitePool,
    user_id: &str,
    id: &str,
) -> Result<Option<Todo>, sqlx::Error> {
    sqlx::query_as::<_, Todo>(
        "SELECT id, user_id, text, done, created_at FROM todos WHERE id = ? AND user_id = ?",
    )
    .bind(id)
    .bind(user_id)
    .fetch_optional(db)
    .await
}

pub async fn insert_todo(
    db: &SqlitePool,
    user_id: &str,
    req: NewTodoRequest,
) -> Result<Todo, sqlx::Error> {
    let id = Uuid::new_v4().to_string();
    let now = Utc::now().to_rfc3339();

    sqlx::query(
        r#"
        INSERT INTO todos (id, user_id, text, done, created_at)
        VALUES (?1, ?2, ?3, ?4, ?5)
        "#,
    )
    .bind(&id)
    .bind(user_id)
    .bind(&req.text)
    .bind(req.done)
    .bind(&now)
    .execute(db)
    .await?;

    Ok(Todo {
        id,
        user_id: user_id.to_string(),
        text: req.text,
        done: req.done,
        created_at: now,
    })
}

pub async fn update_todo(
    db: &SqlitePool,
    user_id: &str,
    id: &str,
    req: UpdateTodoRequest,
) -> Result<Option<Todo>, sqlx::Error> {
    let mut current = match find_todo_by_id(db, user_id, id).await? {
        Some(t) => t,
        None => return Ok(None),
    };

    if let Some(text) = req.text {
        current.text = text;
    }
    if let Some(done) = req.done {
        current.done = done;
    }

    sqlx::query(
        r#"
        UPDATE todos
        SET text = ?1,
            done = ?2
        WHERE id = ?3 AND user_id = ?4
        "#,
    )
    .bind(&current.text)
    .bind(current.done)
    .bind(id)
    .bind(user_id)
    .execute(db)
    .await?;

    Ok(Some(current))
}

pub async fn delete_todo(db: &SqlitePool, user_id: &str, id: &str) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM todos WHERE id = ? AND user_id = ?")
        .bind(id)
        .bind(user_id)
        .execute(db)
        .await?
        .rows_affected();

    Ok(result > 0)
}

pub async fn fetch_classes(
    db: &SqlitePool,
    user_id: &str,
) -> Result<Vec<ClassRecord>, sqlx::Error> {
    sqlx::query_as::<_, ClassRecord>(
        r#"
        SELECT id, user_id, name, attended, total, created_at
        FROM classes
        WHERE user_id = ?
        ORDER BY created_at, id
        "#,
    )
    .bind(user_id)
    .fetch_all(db)
    .await
}

pub async fn find_class_by_id(
    db: &SqlitePool,
    user_id: &str,
    id: &str,
) -> Result<Option<ClassRecord>, sqlx::Error> {
    sqlx::query_as::<_, ClassRecord>(
        r#"
        SELECT id, user_id, name, attended, total, created_at
        FROM classes
        WHERE id = ? AND user_id = ?
        "#,
    )
    .bind(id)
    .bind(user_id)
    .fetch_optional(db)
    .await
}

pub async fn insert_class(
    db: &SqlitePool,
    user_id: &str,
    req: NewClassRequest,
) -> Result<ClassRecord, sqlx::Error> {
    let id = Uuid::new_v4().to_string();
    let now = Utc::now().to_rfc3339();

    sqlx::query(
        r#"
        INSERT INTO classes (id, user_id, name, attended, total, created_at)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6)
        "#,
    )
    .bind(&id)
    .bind(user_id)
    .bind(&req.name)
    .bind(req.attended)
    .bind(req.total)
    .bind(&now)
    .execute(db)
    .await?;

    Ok(ClassRecord {
        id,
        user_id: user_id.to_string(),
        name: req.name,
        attended: req.attended,
        total: req.total,
        created_at: now,
    })
}

pub async fn update_class(
    db: &SqlitePool,
    user_id: &str,
    id: &str,
    req: UpdateClassRequest,
) -> Result<Option<ClassRecord>, sqlx::Error> {
    let mut current = match find_class_by_id(db, user_id, id).await? {
        Some(c) => c,
        None => return Ok(None),
    };

    if let Some(name) = req.name {
        current.name = name;
    }
    if let Some(attended) = req.attended {
        current.attended = attended;
    }
    if let Some(total) = req.total {
        current.total = total;
    }

    sqlx::query(
        r#"
        UPDATE classes
        SET name = ?1,
            attended = ?2,
            total = ?3
        WHERE id = ?4 AND user_id = ?5
        "#,
    )
    .bind(&current.name)
    .bind(current.attended)
    .bind(current.total)
    .bind(id)
    .bind(user_id)
    .execute(db)
    .await?;

    Ok(Some(current))
}

pub async fn delete_class(db: &SqlitePool, user_id: &str, id: &str) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM classes WHERE id = ? AND user_id = ?")
        .bind(id)
        .bind(user_id)
        .execute(db)
        .await?
        .rows_affected();

    Ok(result > 0)
}

const ASSIGNMENT_COLUMNS: &str =
    "id, user_id, title, kind, description, due_date, class_name, status, priority, created_at";

pub async fn fetch_assignments(
    db: &SqlitePool,
    user_id: &str,
) -> Result<Vec<Assignment>, sqlx::Error> {
    sqlx::query_as::<_, Assignment>(&format!(
        r#"
        SELECT {ASSIGNMENT_COLUMNS}
        FROM assignments
        WHERE user_id = ?
        ORDER BY due_date ASC, created_at DESC
        "#
    ))
    .bind(user_id)
    .fetch_all(db)
    .await
}

pub async fn find_assignment_by_id(
    db: &SqlitePool,
    user_id: &str,
    id: &str,
) -> Result<Option<Assignment>, sqlx::Error> {
    sqlx::query_as::<_, Assignment>(&format!(
        "SELECT {ASSIGNMENT_COLUMNS} FROM assignments WHERE id = ? AND user_id = ?"
    ))
    .bind(id)
    .bind(user_id)
    .fetch_optional(db)
    .await
}

pub async fn insert_assignment(
    db: &SqlitePool,
    user_id: &str,
    req: NewAssignmentRequest,
) -> Result<Assignment, sqlx::Error> {
    let id = Uuid::new_v4().to_string();
    let now = Utc::now().to_rfc3339();

    sqlx::query(&format!(
        r#"
        INSERT INTO assignments ({ASSIGNMENT_COLUMNS})
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
        "#
    ))
    .bind(&id)
    .bind(user_id)
    .bind(&req.title)
    .bind(req.kind)
    .bind(&req.description)
    .bind(&req.due_date)
    .bind(&req.class_name)
    .bind(req.status)
    .bind(req.priority)
    .bind(&now)
    .execute(db)
    .await?;

    Ok(Assignment {
        id,
        user_id: user_id.to_string(),
        title: req.title,
        kind: req.kind,
        description: req.description,
        due_date: req.due_date,
        class_name: req.class_name,
        status: req.status,
        priority: req.priority,
        created_at: now,
    })
}

pub async fn update_assignment(
    db: &SqlitePool,
    user_id: &str,
    id: &str,
    req: UpdateAssignmentRequest,
) -> Result<Option<Assignment>, sqlx::Error> {
    let mut current = match find_assignment_by_id(db, user_id, id).await? {
        Some(a) => a,
        None => return Ok(None),
    };

    if let Some(title) = req.title {
        current.title = title;
    }
    if let Some(kind) = req.kind {
        current.kind = kind;
    }
    if let Some(description) = req.description {
        current.description = description;
    }
    if let Some(due_date) = req.due_date {
        current.due_date = due_date;
    }
    if let Some(class_name) = req.class_name {
        current.class_name = class_name;
    }
    if let Some(status) = req.status {
        current.status = status;
    }
    if let Some(priority) = req.priority {
        current.priority = priority;
    }

    sqlx::query(
        r#"
        UPDATE assignments
        SET title = ?1,
            kind = ?2,
            description = ?3,
            due_date = ?4,
            class_name = ?5,
            status = ?6,
            priority = ?7
        WHERE id = ?8 AND user_id = ?9
        "#,
    )
    .bind(&current.title)
    .bind(current.kind)
    .bind(&current.description)
    .bind(&current.due_date)
    .bind(&current.class_name)
    .bind(current.status)
    .bind(current.priority)
    .bind(id)
    .bind(user_id)
    .execute(db)
    .await?;

    Ok(Some(current))
}

pub async fn delete_assignment(
    db: &SqlitePool,
    user_id: &str,
    id: &str,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM assignments WHERE id = ? AND user_id = ?")
        .bind(id)
        .bind(user_id)
        .execute(db)
        .await?
        .rows_affected();

    Ok(result > 0)
}
