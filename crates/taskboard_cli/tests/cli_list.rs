use std::path::PathBuf;
use std::process::{Command, Output};
use std::time::{SystemTime, UNIX_EPOCH};
use time::format_description::well_known::Rfc3339;
use time::{OffsetDateTime, UtcOffset};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn temp_path(file_name: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    std::env::temp_dir().join(format!("taskboard-{nanos}-{file_name}"))
}

fn local_now() -> String {
    let offset = UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC);
    OffsetDateTime::now_utc()
        .to_offset(offset)
        .format(&Rfc3339)
        .expect("format now")
}

fn listing() -> serde_json::Value {
    serde_json::json!([
        {
            "id": 1,
            "title": "Pay rent",
            "description": "before the 5th",
            "category": {"id": 2, "name": "Home"},
            "priority_score": 9,
            "deadline": "2020-01-01",
            "status": "pending",
            "tags": ["bills"],
            "checklist_items": [
                {"id": 10, "text": "transfer", "completed": false},
                {"id": 11, "text": "receipt", "completed": true}
            ],
            "created_at": "2025-12-01T00:00:00Z",
            "updated_at": "2025-12-01T00:00:00Z"
        },
        {
            "id": 2,
            "title": "Groceries",
            "description": "stay under budget",
            "priority_score": 3.2,
            "deadline": local_now(),
            "status": "completed",
            "created_at": "2025-12-01T00:00:00Z",
            "updated_at": "2025-12-02T00:00:00Z"
        },
        {
            "id": 3,
            "title": "Call mom",
            "priority_score": 6,
            "status": "in_progress",
            "created_at": "2025-12-01T00:00:00Z",
            "updated_at": "2025-12-01T00:00:00Z"
        }
    ])
}

async fn server_with_listing() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/tasks"))
        .respond_with(ResponseTemplate::new(200).set_body_json(listing()))
        .mount(&server)
        .await;
    server
}

async fn run_cli(base_url: String, args: &[&str]) -> Output {
    let mut command = Command::new(env!("CARGO_BIN_EXE_taskboard"));
    command
        .args(args)
        .env("TASKBOARD_API_URL", base_url)
        .env("TASKBOARD_CONFIG_PATH", temp_path("absent-config.json"))
        .env_remove("TASKBOARD_LOG")
        .env_remove("RUST_LOG");
    tokio::task::spawn_blocking(move || command.output().expect("failed to run taskboard"))
        .await
        .unwrap()
}

#[tokio::test]
async fn list_plain_renders_every_task() {
    let server = server_with_listing().await;
    let output = run_cli(format!("{}/api", server.uri()), &["list"]).await;

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Pay rent"));
    assert!(stdout.contains("Groceries"));
    assert!(stdout.contains("Call mom"));
    assert!(stdout.contains("pending (overdue)"));
    assert!(stdout.contains("1/2"));
}

#[tokio::test]
async fn list_json_applies_filter_and_decodes_fields() {
    let server = server_with_listing().await;
    let output = run_cli(
        format!("{}/api", server.uri()),
        &["list", "--filter", "urgent", "--json"],
    )
    .await;

    assert!(output.status.success());
    let payload: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let tasks = payload.as_array().unwrap();
    assert_eq!(tasks.len(), 1);

    let task = &tasks[0];
    assert_eq!(task["id"], "1");
    assert_eq!(task["priorityLevel"], "urgent");
    assert_eq!(task["aiScore"], 9);
    assert_eq!(task["categoryName"], "Home");
    assert_eq!(task["overdue"], true);
    assert_eq!(task["checklistProgress"]["completedCount"], 1);
    assert_eq!(task["checklistProgress"]["percent"], 50.0);
}

#[tokio::test]
async fn list_search_and_today_filter_compose() {
    let server = server_with_listing().await;
    let base_url = format!("{}/api", server.uri());

    let output = run_cli(base_url.clone(), &["list", "--search", "BUDGET", "--json"]).await;
    assert!(output.status.success());
    let payload: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let ids: Vec<&str> = payload
        .as_array()
        .unwrap()
        .iter()
        .map(|task| task["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec!["2"]);

    let output = run_cli(base_url, &["list", "--filter", "today", "--json"]).await;
    assert!(output.status.success());
    let payload: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let tasks = payload.as_array().unwrap();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0]["title"], "Groceries");
    assert_eq!(tasks[0]["status"], "completed");
    assert_eq!(tasks[0]["priorityLevel"], "low");
}

#[tokio::test]
async fn list_rejects_unknown_filter() {
    let server = server_with_listing().await;
    let output = run_cli(
        format!("{}/api", server.uri()),
        &["list", "--filter", "overdue"],
    )
    .await;

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("ERROR: invalid_input"));
}

#[tokio::test]
async fn default_filter_override_applies_without_flag() {
    let server = server_with_listing().await;
    let output = run_cli(
        format!("{}/api", server.uri()),
        &["list", "--json", "--config-override", "default_filter=pending"],
    )
    .await;

    assert!(output.status.success());
    let payload: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let tasks = payload.as_array().unwrap();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0]["title"], "Pay rent");
}

#[tokio::test]
async fn stats_counts_the_listing() {
    let server = server_with_listing().await;
    let output = run_cli(format!("{}/api", server.uri()), &["stats", "--json"]).await;

    assert!(output.status.success());
    let payload: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(
        payload,
        serde_json::json!({"total": 3, "completed": 1, "pending": 1, "urgent": 1})
    );
}

#[tokio::test]
async fn show_prints_details_and_rejects_unknown_id() {
    let server = server_with_listing().await;
    let base_url = format!("{}/api", server.uri());

    let output = run_cli(base_url.clone(), &["show", "1"]).await;
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("1 | Pay rent"));
    assert!(stdout.contains("Category: Home (2)"));
    assert!(stdout.contains("Tags: bills"));
    assert!(stdout.contains("[x] 11 receipt"));

    let output = run_cli(base_url, &["show", "42"]).await;
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("task not found: 42"));
}

#[tokio::test]
async fn categories_lists_reference_data() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/categories"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            {"id": 1, "name": "Uncategorized", "usage_count": 4},
            {"id": 2, "name": "Home"}
        ])))
        .mount(&server)
        .await;

    let output = run_cli(format!("{}/api", server.uri()), &["categories"]).await;

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Uncategorized"));
    assert!(stdout.contains("Home"));
}
