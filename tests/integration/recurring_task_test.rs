// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::helpers::{bearer, create_test_app, register_and_login, TestApp};
use axum::http::StatusCode;
use chrono::{DateTime, FixedOffset, TimeZone, Utc};
use serde_json::{json, Value};
use std::time::Duration;
use taskmgr::infrastructure::repositories::task_repo_impl::TaskRepositoryImpl;
use taskmgr::workers::{CycleReport, RecurringTaskWorker, RecurringTaskWorkerOptions};

fn at(day: u32, hour: u32, minute: u32) -> DateTime<FixedOffset> {
    Utc.with_ymd_and_hms(2025, 3, day, hour, minute, 0)
        .unwrap()
        .fixed_offset()
}

fn worker(app: &TestApp, atomic: bool) -> RecurringTaskWorker<TaskRepositoryImpl> {
    RecurringTaskWorker::new(
        app.task_repo.clone(),
        RecurringTaskWorkerOptions {
            interval: Duration::from_secs(60),
            call_timeout: Duration::from_secs(2),
            max_concurrency: 2,
            atomic,
        },
    )
}

async fn list(app: &TestApp, token: &str) -> Vec<Value> {
    let response = app
        .server
        .get("/tasks")
        .add_header("Authorization", bearer(token))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    response.json::<Vec<Value>>()
}

fn trigger_of(task: &Value) -> DateTime<FixedOffset> {
    DateTime::parse_from_rfc3339(task["next_trigger"].as_str().unwrap()).unwrap()
}

async fn create_daily(app: &TestApp, token: &str, title: &str) -> i64 {
    let response = app
        .server
        .post("/tasks")
        .add_header("Authorization", bearer(token))
        .json(&json!({
            "title": title,
            "priority": "high",
            "labels": ["ops"],
            "recurrence_rule": "daily",
            "next_trigger": at(10, 9, 0).to_rfc3339()
        }))
        .await;
    assert_eq!(response.status_code(), StatusCode::CREATED);
    response.json::<Value>()["id"].as_i64().unwrap()
}

#[tokio::test]
async fn test_daily_task_generates_one_instance_per_occurrence() {
    let app = create_test_app().await;
    let (_, token) = register_and_login(&app, "recurring@example.com").await;
    let parent_id = create_daily(&app, &token, "A").await;
    let worker = worker(&app, false);

    // Not yet due
    let early = worker.run_cycle_at(at(10, 8, 59)).await;
    assert_eq!(early, CycleReport::default());
    assert_eq!(list(&app, &token).await.len(), 1);

    let report = worker.run_cycle_at(at(10, 9, 5)).await;
    assert_eq!(report.due, 1);
    assert_eq!(report.cloned, 1);
    assert_eq!(report.rescheduled, 1);
    assert_eq!(report.failures, 0);

    let tasks = list(&app, &token).await;
    assert_eq!(tasks.len(), 2);
    let instance = tasks.iter().find(|t| t["id"] != parent_id).unwrap();
    assert_eq!(instance["title"], "A (Auto)");
    assert_eq!(instance["status"], "pending");
    assert_eq!(instance["priority"], "high");
    assert_eq!(instance["labels"], json!(["ops"]));
    assert!(instance["recurrence_rule"].is_null());
    assert!(instance["next_trigger"].is_null());

    let parent = tasks.iter().find(|t| t["id"] == parent_id).unwrap();
    assert_eq!(parent["title"], "A");
    assert_eq!(parent["recurrence_rule"], "daily");
    assert_eq!(trigger_of(parent), at(11, 9, 0));

    // Same occurrence is never generated twice
    let again = worker.run_cycle_at(at(10, 9, 10)).await;
    assert_eq!(again.due, 0);
    assert_eq!(list(&app, &token).await.len(), 2);
}

#[tokio::test]
async fn test_instances_do_not_recur() {
    let app = create_test_app().await;
    let (_, token) = register_and_login(&app, "instances@example.com").await;
    create_daily(&app, &token, "Water plants").await;
    let worker = worker(&app, false);

    worker.run_cycle_at(at(10, 9, 5)).await;
    let next_day = worker.run_cycle_at(at(11, 9, 5)).await;

    // Only the parent is due again, never the generated instance
    assert_eq!(next_day.due, 1);
    let tasks = list(&app, &token).await;
    let instances = tasks
        .iter()
        .filter(|t| t["title"] == "Water plants (Auto)")
        .count();
    assert_eq!(instances, 2);
    assert_eq!(tasks.len(), 3);
}

#[tokio::test]
async fn test_atomic_mode_over_sqlite() {
    let app = create_test_app().await;
    let (_, token) = register_and_login(&app, "atomic@example.com").await;
    let parent_id = create_daily(&app, &token, "Backup").await;
    let worker = worker(&app, true);

    let report = worker.run_cycle_at(at(10, 9, 5)).await;

    assert_eq!(report.cloned, 1);
    assert_eq!(report.rescheduled, 1);
    let tasks = list(&app, &token).await;
    assert_eq!(tasks.len(), 2);
    let parent = tasks.iter().find(|t| t["id"] == parent_id).unwrap();
    assert_eq!(trigger_of(parent), at(11, 9, 0));
}

#[tokio::test]
async fn test_deleted_parent_is_not_regenerated() {
    let app = create_test_app().await;
    let (_, token) = register_and_login(&app, "deleted@example.com").await;
    let parent_id = create_daily(&app, &token, "Gone").await;

    let deleted = app
        .server
        .delete(&format!("/tasks/{}", parent_id))
        .add_header("Authorization", bearer(&token))
        .await;
    assert_eq!(deleted.status_code(), StatusCode::OK);

    let report = worker(&app, false).run_cycle_at(at(10, 9, 5)).await;

    assert_eq!(report.due, 0);
    assert!(list(&app, &token).await.is_empty());
}
