// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::helpers::{bearer, create_test_app, register_and_login};
use axum::http::StatusCode;
use serde_json::{json, Value};

#[tokio::test]
async fn test_health_and_version() {
    let app = create_test_app().await;

    let health = app.server.get("/health").await;
    assert_eq!(health.status_code(), StatusCode::OK);
    assert_eq!(health.text(), "OK");

    let version = app.server.get("/version").await;
    assert_eq!(version.status_code(), StatusCode::OK);
    assert_eq!(version.text(), env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn test_register_rejects_duplicate_email() {
    let app = create_test_app().await;
    register_and_login(&app, "dup@example.com").await;

    let response = app
        .server
        .post("/register")
        .json(&json!({
            "name": "Someone Else",
            "email": "dup@example.com",
            "password": "another-pass"
        }))
        .await;

    assert_eq!(response.status_code(), StatusCode::CONFLICT);
    assert_eq!(
        response.json::<Value>()["error"],
        "email already exists"
    );
}

#[tokio::test]
async fn test_register_rejects_invalid_email() {
    let app = create_test_app().await;

    let response = app
        .server
        .post("/register")
        .json(&json!({
            "name": "Broken",
            "email": "not-an-email",
            "password": "secret"
        }))
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_login_with_wrong_password_is_unauthorized() {
    let app = create_test_app().await;
    register_and_login(&app, "login@example.com").await;

    let response = app
        .server
        .post("/login")
        .json(&json!({ "email": "login@example.com", "password": "wrong" }))
        .await;

    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        response.json::<Value>()["error"],
        "invalid email or password"
    );
}

#[tokio::test]
async fn test_login_returns_user_without_password() {
    let app = create_test_app().await;
    register_and_login(&app, "profile@example.com").await;

    let response = app
        .server
        .post("/login")
        .json(&json!({ "email": "profile@example.com", "password": "correct-horse" }))
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    let body = response.json::<Value>();
    assert_eq!(body["user"]["email"], "profile@example.com");
    assert!(body["user"].get("password_hash").is_none());
}

#[tokio::test]
async fn test_task_routes_require_token() {
    let app = create_test_app().await;

    let missing = app.server.get("/tasks").await;
    assert_eq!(missing.status_code(), StatusCode::UNAUTHORIZED);

    let garbage = app
        .server
        .get("/tasks")
        .add_header("Authorization", "Bearer not-a-token")
        .await;
    assert_eq!(garbage.status_code(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_create_and_list_tasks() {
    let app = create_test_app().await;
    let (user_id, token) = register_and_login(&app, "tasks@example.com").await;

    let created = app
        .server
        .post("/tasks")
        .add_header("Authorization", bearer(&token))
        .json(&json!({
            "title": "Write report",
            "description": "quarterly numbers",
            "priority": "high",
            "labels": ["work"]
        }))
        .await;
    assert_eq!(created.status_code(), StatusCode::CREATED);
    let task = created.json::<Value>();
    assert_eq!(task["owner_id"], user_id);
    assert_eq!(task["status"], "pending");

    app.server
        .post("/tasks")
        .add_header("Authorization", bearer(&token))
        .json(&json!({ "title": "Second" }))
        .await;

    let listed = app
        .server
        .get("/tasks")
        .add_header("Authorization", bearer(&token))
        .await;
    assert_eq!(listed.status_code(), StatusCode::OK);
    let tasks = listed.json::<Vec<Value>>();
    assert_eq!(tasks.len(), 2);
    assert_eq!(tasks[0]["title"], "Second");
    assert_eq!(tasks[1]["labels"], json!(["work"]));
    assert_eq!(tasks[1]["priority"], "high");
}

#[tokio::test]
async fn test_tasks_are_scoped_to_owner() {
    let app = create_test_app().await;
    let (_, alice) = register_and_login(&app, "alice@example.com").await;
    let (_, bob) = register_and_login(&app, "bob@example.com").await;

    let created = app
        .server
        .post("/tasks")
        .add_header("Authorization", bearer(&alice))
        .json(&json!({ "title": "Private" }))
        .await;
    let task_id = created.json::<Value>()["id"].as_i64().unwrap();

    let bob_list = app
        .server
        .get("/tasks")
        .add_header("Authorization", bearer(&bob))
        .await;
    assert!(bob_list.json::<Vec<Value>>().is_empty());

    let forbidden = app
        .server
        .put(&format!("/tasks/{}", task_id))
        .add_header("Authorization", bearer(&bob))
        .json(&json!({ "status": "done" }))
        .await;
    assert_eq!(forbidden.status_code(), StatusCode::FORBIDDEN);

    let delete = app
        .server
        .delete(&format!("/tasks/{}", task_id))
        .add_header("Authorization", bearer(&bob))
        .await;
    assert_eq!(delete.status_code(), StatusCode::FORBIDDEN);

    let missing = app
        .server
        .put("/tasks/9999")
        .add_header("Authorization", bearer(&alice))
        .json(&json!({ "status": "done" }))
        .await;
    assert_eq!(missing.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_update_status_and_delete() {
    let app = create_test_app().await;
    let (_, token) = register_and_login(&app, "status@example.com").await;

    let created = app
        .server
        .post("/tasks")
        .add_header("Authorization", bearer(&token))
        .json(&json!({ "title": "Ship it" }))
        .await;
    let task_id = created.json::<Value>()["id"].as_i64().unwrap();

    let updated = app
        .server
        .put(&format!("/tasks/{}", task_id))
        .add_header("Authorization", bearer(&token))
        .json(&json!({ "status": "in_progress" }))
        .await;
    assert_eq!(updated.status_code(), StatusCode::OK);
    assert_eq!(updated.json::<Value>()["message"], "Task updated");

    let listed = app
        .server
        .get("/tasks")
        .add_header("Authorization", bearer(&token))
        .await;
    assert_eq!(listed.json::<Vec<Value>>()[0]["status"], "in_progress");

    let deleted = app
        .server
        .delete(&format!("/tasks/{}", task_id))
        .add_header("Authorization", bearer(&token))
        .await;
    assert_eq!(deleted.status_code(), StatusCode::OK);

    let again = app
        .server
        .delete(&format!("/tasks/{}", task_id))
        .add_header("Authorization", bearer(&token))
        .await;
    assert_eq!(again.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_subtask_routes() {
    let app = create_test_app().await;
    let (_, token) = register_and_login(&app, "subtasks@example.com").await;
    let (_, other) = register_and_login(&app, "other@example.com").await;

    let created = app
        .server
        .post("/tasks")
        .add_header("Authorization", bearer(&token))
        .json(&json!({ "title": "Move house" }))
        .await;
    let task_id = created.json::<Value>()["id"].as_i64().unwrap();

    let subtask = app
        .server
        .post(&format!("/tasks/{}/subtasks", task_id))
        .add_header("Authorization", bearer(&token))
        .json(&json!({ "title": "Book van" }))
        .await;
    assert_eq!(subtask.status_code(), StatusCode::CREATED);
    let sub_id = subtask.json::<Value>()["id"].as_i64().unwrap();

    let foreign = app
        .server
        .put(&format!("/subtasks/{}", sub_id))
        .add_header("Authorization", bearer(&other))
        .await;
    assert_eq!(foreign.status_code(), StatusCode::FORBIDDEN);

    let toggled = app
        .server
        .put(&format!("/subtasks/{}", sub_id))
        .add_header("Authorization", bearer(&token))
        .await;
    assert_eq!(toggled.status_code(), StatusCode::OK);

    let listed = app
        .server
        .get("/tasks")
        .add_header("Authorization", bearer(&token))
        .await;
    assert_eq!(listed.json::<Vec<Value>>()[0]["subtasks"][0]["is_done"], true);

    let deleted = app
        .server
        .delete(&format!("/subtasks/{}", sub_id))
        .add_header("Authorization", bearer(&token))
        .await;
    assert_eq!(deleted.status_code(), StatusCode::OK);

    let missing = app
        .server
        .delete(&format!("/subtasks/{}", sub_id))
        .add_header("Authorization", bearer(&token))
        .await;
    assert_eq!(missing.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_unknown_recurrence_rule_is_rejected() {
    let app = create_test_app().await;
    let (_, token) = register_and_login(&app, "rules@example.com").await;

    let response = app
        .server
        .post("/tasks")
        .add_header("Authorization", bearer(&token))
        .json(&json!({ "title": "Hourly", "recurrence_rule": "hourly" }))
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
}
