mod common;

use axum::http::StatusCode;
use serde_json::json;

use common::{SAMPLE_SCHEDULE, send, test_app};

const ALICE: Option<&str> = Some("alice-token");
const BOB: Option<&str> = Some("bob-token");

#[tokio::test]
async fn health_needs_no_token() {
    let (app, _db) = test_app().await;
    let (status, _) = send(&app, "GET", "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn missing_or_unknown_tokens_are_rejected() {
    let (app, _db) = test_app().await;

    let (status, body) = send(&app, "GET", "/schedules", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Unauthorized");

    let (status, _) = send(&app, "GET", "/todos", Some("forged"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn schedule_progress_flow() {
    let (app, _db) = test_app().await;

    let (status, course) = send(
        &app,
        "POST",
        "/schedules",
        ALICE,
        Some(json!({
            "course_id": "course-1",
            "file_name": "CS5800.tsv",
            "schedule_data": SAMPLE_SCHEDULE,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(course["course_name"], "CS5800");
    assert_eq!(course["user_id"], "alice");

    let (status, overview) =
        send(&app, "GET", "/schedules/course-1/overview", ALICE, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(overview["modules"].as_array().unwrap().len(), 2);
    assert_eq!(overview["modules"][0]["id"], "module-1");
    assert_eq!(overview["modules"][0]["readings"], json!(["Ch1", "Ch2"]));
    assert_eq!(overview["modules"][1]["is_trackable"], false);
    assert_eq!(overview["stats"]["module_progress"], "0/1");
    assert_eq!(overview["stats"]["overall_completion"], 0);

    let (status, saved) = send(
        &app,
        "POST",
        "/schedule_progress",
        ALICE,
        Some(json!({
            "course_id": "course-1",
            "module_id": "module-1",
            "reading_progress": ["Ch1", "Ch2"],
            "homework_status": "completed",
            "notes": "done",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(saved["homework_status"], "completed");
    assert_eq!(saved["reading_progress"], json!(["Ch1", "Ch2"]));

    let (_, overview) = send(&app, "GET", "/schedules/course-1/overview", ALICE, None).await;
    assert_eq!(overview["stats"]["module_progress"], "1/1");
    assert_eq!(overview["stats"]["reading_progress"], "2/2");
    assert_eq!(overview["stats"]["overall_completion"], 100);
    assert_eq!(overview["modules"][0]["is_complete"], true);
    assert_eq!(overview["modules"][0]["notes"], "done");

    let (status, progress) =
        send(&app, "GET", "/schedule_progress?course_id=course-1", ALICE, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(progress.as_array().unwrap().len(), 1);

    let (status, deleted) = send(&app, "DELETE", "/schedules/course-1", ALICE, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(deleted["progress_entries_deleted"], 1);
    assert_eq!(deleted["deleted"]["course_id"], "course-1");

    let (_, progress) =
        send(&app, "GET", "/schedule_progress?course_id=course-1", ALICE, None).await;
    assert_eq!(progress, json!([]));

    let (status, _) = send(&app, "GET", "/schedules/course-1/overview", ALICE, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn overview_filters_modules_but_not_stats() {
    let (app, _db) = test_app().await;
    send(
        &app,
        "POST",
        "/schedules",
        ALICE,
        Some(json!({ "course_id": "course-1", "schedule_data": SAMPLE_SCHEDULE })),
    )
    .await;

    let (status, overview) = send(
        &app,
        "GET",
        "/schedules/course-1/overview?search=loops",
        ALICE,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(overview["modules"].as_array().unwrap().len(), 1);
    assert_eq!(overview["modules"][0]["topics"], "Loops");
    assert_eq!(overview["stats"]["reading_progress"], "0/2");
}

#[tokio::test]
async fn course_creation_validates_input() {
    let (app, _db) = test_app().await;

    let (status, _) = send(
        &app,
        "POST",
        "/schedules",
        ALICE,
        Some(json!({ "schedule_data": "Date\tTopics\n" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        "POST",
        "/schedules",
        ALICE,
        Some(json!({ "file_name": "plan.csv", "schedule_data": SAMPLE_SCHEDULE })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, course) = send(
        &app,
        "POST",
        "/schedules",
        ALICE,
        Some(json!({ "course_id": "course-1", "schedule_data": SAMPLE_SCHEDULE })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(course["course_name"], "Untitled Course");

    let (status, _) = send(
        &app,
        "POST",
        "/schedules",
        ALICE,
        Some(json!({ "course_id": "course-1", "schedule_data": SAMPLE_SCHEDULE })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, generated) = send(
        &app,
        "POST",
        "/schedules",
        ALICE,
        Some(json!({ "schedule_data": SAMPLE_SCHEDULE })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert!(generated["course_id"].as_str().unwrap().starts_with("course-"));
}

#[tokio::test]
async fn courses_are_private_to_their_owner() {
    let (app, _db) = test_app().await;
    send(
        &app,
        "POST",
        "/schedules",
        ALICE,
        Some(json!({ "course_id": "course-1", "schedule_data": SAMPLE_SCHEDULE })),
    )
    .await;

    let (_, courses) = send(&app, "GET", "/schedules", BOB, None).await;
    assert_eq!(courses, json!([]));

    let (status, _) = send(&app, "GET", "/schedules/course-1/overview", BOB, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(
        &app,
        "POST",
        "/schedule_progress",
        BOB,
        Some(json!({ "course_id": "course-1", "module_id": "module-1" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, "DELETE", "/schedules/course-1", BOB, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn progress_requires_keys_and_supports_module_reset() {
    let (app, _db) = test_app().await;
    send(
        &app,
        "POST",
        "/schedules",
        ALICE,
        Some(json!({ "course_id": "course-1", "schedule_data": SAMPLE_SCHEDULE })),
    )
    .await;

    let (status, _) = send(
        &app,
        "POST",
        "/schedule_progress",
        ALICE,
        Some(json!({ "course_id": "course-1" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, saved) = send(
        &app,
        "POST",
        "/schedule_progress",
        ALICE,
        Some(json!({
            "course_id": "course-1",
            "module_id": "module-1",
            "reading_progress": ["Ch1", "Ch1"],
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(saved["homework_status"], "not-started");
    assert_eq!(saved["reading_progress"], json!(["Ch1"]));

    let (status, _) =
        send(&app, "DELETE", "/schedule_progress/course-1/module-1", ALICE, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) =
        send(&app, "DELETE", "/schedule_progress/course-1/module-1", ALICE, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn schedule_can_be_replaced() {
    let (app, _db) = test_app().await;
    send(
        &app,
        "POST",
        "/schedules",
        ALICE,
        Some(json!({ "course_id": "course-1", "schedule_data": SAMPLE_SCHEDULE })),
    )
    .await;

    let (status, course) = send(
        &app,
        "PUT",
        "/schedules/course-1",
        ALICE,
        Some(json!({ "course_name": "Algorithms", "schedule_data": "Date,Topics\n2/1,Graphs\n" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(course["course_name"], "Algorithms");

    let (_, overview) = send(&app, "GET", "/schedules/course-1/overview", ALICE, None).await;
    assert_eq!(overview["modules"].as_array().unwrap().len(), 1);
    assert_eq!(overview["modules"][0]["topics"], "Graphs");

    let (status, _) = send(
        &app,
        "PUT",
        "/schedules/missing",
        ALICE,
        Some(json!({ "course_name": "x" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn calendar_id_is_the_account_email() {
    let (app, _db) = test_app().await;

    let (status, body) = send(&app, "GET", "/calendar", ALICE, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "calendarId": "alice@example.com" }));

    let (status, _) = send(&app, "GET", "/calendar", BOB, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn todo_crud() {
    let (app, _db) = test_app().await;

    let (status, todo) =
        send(&app, "POST", "/todos", ALICE, Some(json!({ "text": "Read Ch. 3" }))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(todo["done"], false);
    let id = todo["id"].as_str().unwrap().to_string();

    let (status, updated) = send(
        &app,
        "PATCH",
        &format!("/todos/{}", id),
        ALICE,
        Some(json!({ "done": true })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["done"], true);
    assert_eq!(updated["text"], "Read Ch. 3");

    let (_, others) = send(&app, "GET", "/todos", BOB, None).await;
    assert_eq!(others, json!([]));
    let (status, _) = send(&app, "DELETE", &format!("/todos/{}", id), BOB, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, "DELETE", &format!("/todos/{}", id), ALICE, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (_, todos) = send(&app, "GET", "/todos", ALICE, None).await;
    assert_eq!(todos, json!([]));

    let (status, _) = send(&app, "POST", "/todos", ALICE, Some(json!({ "text": "  " }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn class_attendance_counts() {
    let (app, _db) = test_app().await;

    let (status, class) = send(
        &app,
        "POST",
        "/classes",
        ALICE,
        Some(json!({ "name": "Algorithms", "total": 28 })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(class["attended"], 0);
    let id = class["id"].as_str().unwrap().to_string();

    let (status, class) = send(
        &app,
        "PATCH",
        &format!("/classes/{}", id),
        ALICE,
        Some(json!({ "attended": 1 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(class["attended"], 1);
    assert_eq!(class["total"], 28);

    let (status, _) = send(
        &app,
        "PATCH",
        &format!("/classes/{}", id),
        ALICE,
        Some(json!({ "attended": -1 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, classes) = send(&app, "GET", "/classes", ALICE, None).await;
    assert_eq!(classes.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn assignments_are_listed_by_due_date() {
    let (app, _db) = test_app().await;

    let items = [
        ("Exam I", "exam", "2025-10-06"),
        ("Hwk#1", "assignment", "2025-09-15"),
    ];
    for (title, kind, due) in items {
        let (status, _) = send(
            &app,
            "POST",
            "/assignments",
            ALICE,
            Some(json!({ "title": title, "type": kind, "due_date": due, "priority": "high" })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (_, list) = send(&app, "GET", "/assignments", ALICE, None).await;
    let titles: Vec<&str> = list
        .as_array()
        .unwrap()
        .iter()
        .map(|a| a["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["Hwk#1", "Exam I"]);
    assert_eq!(list[1]["type"], "exam");
    assert_eq!(list[1]["status"], "pending");

    let id = list[0]["id"].as_str().unwrap().to_string();
    let (status, updated) = send(
        &app,
        "PATCH",
        &format!("/assignments/{}", id),
        ALICE,
        Some(json!({ "status": "in_progress" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["status"], "in_progress");
    assert_eq!(updated["priority"], "high");

    let (status, _) = send(&app, "POST", "/assignments", ALICE, Some(json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, "DELETE", &format!("/assignments/{}", id), ALICE, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}


#[tokio::test]
async fn tracker_updates_reject_blank_names() {
    let (app, _db) = test_app().await;

    let cases = [
        ("/todos", json!({ "text": "Read Ch. 3" }), json!({ "text": "   " }), "text"),
        ("/classes", json!({ "name": "Algorithms" }), json!({ "name": "" }), "name"),
        ("/assignments", json!({ "title": "Hwk#1" }), json!({ "title": " \t" }), "title"),
    ];

    for (path, create, patch, field) in cases {
        let (status, created) = send(&app, "POST", path, ALICE, Some(create)).await;
        assert_eq!(status, StatusCode::CREATED);
        let uri = format!("{}/{}", path, created["id"].as_str().unwrap());

        let (status, _) = send(&app, "PATCH", &uri, ALICE, Some(patch)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{}", path);

        let (_, list) = send(&app, "GET", path, ALICE, None).await;
        assert_eq!(list[0][field], created[field]);
    }
}
