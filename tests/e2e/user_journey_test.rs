// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::integration::helpers::{bearer, create_test_app, register_and_login};
use axum::http::StatusCode;
use chrono::{Duration as ChronoDuration, Utc};
use serde_json::{json, Value};
use taskmgr::workers::{RecurringTaskWorker, RecurringTaskWorkerOptions};

/// 完整用户旅程：注册、登录、创建周期任务与子任务、推进状态、
/// 由工作器生成实例，最后清理
#[tokio::test]
async fn test_complete_user_journey() {
    let app = create_test_app().await;
    let (user_id, token) = register_and_login(&app, "journey@example.com").await;

    // Weekly review that became due an hour ago
    let due_at = Utc::now().fixed_offset() - ChronoDuration::hours(1);
    let created = app
        .server
        .post("/tasks")
        .add_header("Authorization", bearer(&token))
        .json(&json!({
            "title": "Weekly review",
            "description": "go through the inbox",
            "labels": ["personal"],
            "recurrence_rule": "weekly",
            "next_trigger": due_at.to_rfc3339()
        }))
        .await;
    assert_eq!(created.status_code(), StatusCode::CREATED);
    let task = created.json::<Value>();
    let task_id = task["id"].as_i64().unwrap();
    assert_eq!(task["owner_id"], user_id);

    let subtask = app
        .server
        .post(&format!("/tasks/{}/subtasks", task_id))
        .add_header("Authorization", bearer(&token))
        .json(&json!({ "title": "Empty inbox" }))
        .await;
    assert_eq!(subtask.status_code(), StatusCode::CREATED);
    let sub_id = subtask.json::<Value>()["id"].as_i64().unwrap();

    app.server
        .put(&format!("/subtasks/{}", sub_id))
        .add_header("Authorization", bearer(&token))
        .await
        .assert_status_ok();
    app.server
        .put(&format!("/tasks/{}", task_id))
        .add_header("Authorization", bearer(&token))
        .json(&json!({ "status": "done" }))
        .await
        .assert_status_ok();

    let worker = RecurringTaskWorker::new(app.task_repo.clone(), RecurringTaskWorkerOptions::default());
    let report = worker.run_cycle().await;
    assert_eq!(report.cloned, 1);
    assert_eq!(report.rescheduled, 1);

    let tasks = app
        .server
        .get("/tasks")
        .add_header("Authorization", bearer(&token))
        .await
        .json::<Vec<Value>>();
    assert_eq!(tasks.len(), 2);

    // The instance starts fresh: pending, no subtasks, no schedule
    let instance = tasks.iter().find(|t| t["id"] != task_id).unwrap();
    assert_eq!(instance["title"], "Weekly review (Auto)");
    assert_eq!(instance["status"], "pending");
    assert_eq!(instance["description"], "go through the inbox");
    assert_eq!(instance["subtasks"], json!([]));

    let parent = tasks.iter().find(|t| t["id"] == task_id).unwrap();
    assert_eq!(parent["status"], "done");
    assert_eq!(parent["subtasks"][0]["is_done"], true);

    app.server
        .delete(&format!("/tasks/{}", task_id))
        .add_header("Authorization", bearer(&token))
        .await
        .assert_status_ok();
    let remaining = app
        .server
        .get("/tasks")
        .add_header("Authorization", bearer(&token))
        .await
        .json::<Vec<Value>>();
    assert_eq!(remaining.len(), 1);
}
