//! CLI integration tests.
//!
//! Spawn the `seriesdex` binary against an in-process stub catalog and pin
//! its exit codes: 0 on success, 1 on registry failures, 2 on bad
//! arguments or configuration.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use axum::extract::{Path as UrlPath, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::Router;
use serde_json::{json, Value};
use tempfile::TempDir;

#[derive(Clone, Default)]
struct StubState {
    search_body: Arc<Mutex<String>>,
    works: Arc<Mutex<HashMap<String, String>>>,
}

/// Start a stub catalog answering every search with the same docs.
async fn start_stub(docs: Value) -> (String, StubState) {
    let state = StubState::default();
    *state.search_body.lock().unwrap() = json!({ "numFound": 0, "docs": docs }).to_string();

    let app = Router::new()
        .route("/search.json", get(search_handler))
        .route("/works/{id}", get(work_handler))
        .with_state(state.clone());
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    (format!("http://{}", addr), state)
}

async fn search_handler(State(state): State<StubState>) -> (StatusCode, String) {
    (StatusCode::OK, state.search_body.lock().unwrap().clone())
}

async fn work_handler(
    State(state): State<StubState>,
    UrlPath(id): UrlPath<String>,
) -> (StatusCode, String) {
    match state.works.lock().unwrap().get(id.trim_end_matches(".json")) {
        Some(body) => (StatusCode::OK, body.clone()),
        None => (StatusCode::NOT_FOUND, "{}".to_string()),
    }
}

fn foo_saga_docs() -> Value {
    json!([
        { "key": "/works/OL1W", "title": "The Foo Saga Volume 1", "author_name": ["Jane Roe"], "subject": ["fiction"] },
        { "key": "/works/OL2W", "title": "The Foo Saga Volume 2", "author_name": ["Jane Roe"], "subject": ["fiction"] },
        { "key": "/works/OL3W", "title": "The Foo Saga Volume 3", "author_name": ["Jane Roe"], "subject": ["fiction"] },
    ])
}

/// Write a config pointing at the stub with pacing disabled.
fn write_config(dir: &Path, base_url: &str) -> PathBuf {
    let registry = dir.join("series_registry.json");
    let path = dir.join("seriesdex.toml");
    std::fs::write(
        &path,
        format!(
            r#"
[registry]
path = "{}"

[catalog]
base_url = "{}"
min_delay_ms = 0
max_delay_ms = 0
backoff_ms = 10
timeout_secs = 5
"#,
            registry.display(),
            base_url
        ),
    )
    .unwrap();
    path
}

struct Output {
    code: i32,
    stdout: String,
}

async fn run_cli(args: &[&str]) -> Output {
    let output = tokio::process::Command::new(env!("CARGO_BIN_EXE_seriesdex"))
        .args(args)
        .env_remove("SERIESDEX_CONFIG")
        .env("RUST_LOG", "error") // Quiet logs during tests
        .kill_on_drop(true)
        .output()
        .await
        .expect("Failed to run seriesdex");
    Output {
        code: output.status.code().unwrap_or(-1),
        stdout: String::from_utf8_lossy(&output.stdout).to_string(),
    }
}

// =============================================================================
// Exit code 0
// =============================================================================

#[tokio::test]
async fn test_harvest_succeeds_and_writes_registry() {
    let dir = TempDir::new().unwrap();
    let (base_url, _state) = start_stub(foo_saga_docs()).await;
    let config = write_config(dir.path(), &base_url);

    let out = run_cli(&["--config", config.to_str().unwrap(), "keyword", "--api-cap", "2"]).await;
    assert_eq!(out.code, 0);

    let report: Value = serde_json::from_str(&out.stdout).unwrap();
    assert_eq!(report["queries_issued"], 2);
    assert_eq!(report["accepted_names"][0], "Foo Saga");

    let raw = std::fs::read_to_string(dir.path().join("series_registry.json")).unwrap();
    let registry: Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(registry[0]["name"], "Foo Saga");
    assert_eq!(registry[0]["category"], "prose");
}

#[tokio::test]
async fn test_dry_run_writes_report_and_metrics_only() {
    let dir = TempDir::new().unwrap();
    let (base_url, _state) = start_stub(foo_saga_docs()).await;
    let config = write_config(dir.path(), &base_url);
    let report_path = dir.path().join("report.json");
    let metrics_path = dir.path().join("seriesdex.prom");

    let out = run_cli(&[
        "--config",
        config.to_str().unwrap(),
        "genre",
        "--api-cap",
        "1",
        "--dry-run",
        "--report",
        report_path.to_str().unwrap(),
        "--metrics-out",
        metrics_path.to_str().unwrap(),
    ])
    .await;
    assert_eq!(out.code, 0);
    assert!(!dir.path().join("series_registry.json").exists());

    let report: Value =
        serde_json::from_str(&std::fs::read_to_string(&report_path).unwrap()).unwrap();
    assert_eq!(report["dry_run"], true);
    assert_eq!(report["accepted"], 1);
    assert_eq!(report["written"], 0);

    let metrics = std::fs::read_to_string(&metrics_path).unwrap();
    assert!(metrics.contains("seriesdex_runs_total"));
}

#[tokio::test]
async fn test_stats_and_lookup() {
    let dir = TempDir::new().unwrap();
    let (base_url, state) = start_stub(foo_saga_docs()).await;
    state.works.lock().unwrap().insert(
        "OL1W".to_string(),
        json!({ "key": "/works/OL1W", "title": "The Foo Saga" }).to_string(),
    );
    let config = write_config(dir.path(), &base_url);
    let config = config.to_str().unwrap();

    let out = run_cli(&["--config", config, "stats"]).await;
    assert_eq!(out.code, 0);
    let stats: Value = serde_json::from_str(&out.stdout).unwrap();
    assert_eq!(stats["total"], 0);

    let out = run_cli(&["--config", config, "lookup", "/works/OL1W"]).await;
    assert_eq!(out.code, 0);
    let work: Value = serde_json::from_str(&out.stdout).unwrap();
    assert_eq!(work["title"], "The Foo Saga");

    let out = run_cli(&["--config", config, "lookup", "OL404W"]).await;
    assert_eq!(out.code, 1);
}

// =============================================================================
// Exit code 1
// =============================================================================

#[tokio::test]
async fn test_corrupt_registry_exits_1() {
    let dir = TempDir::new().unwrap();
    let (base_url, _state) = start_stub(foo_saga_docs()).await;
    let config = write_config(dir.path(), &base_url);
    let registry = dir.path().join("series_registry.json");
    std::fs::write(&registry, "{ not json").unwrap();

    let out = run_cli(&["--config", config.to_str().unwrap(), "keyword"]).await;
    assert_eq!(out.code, 1);
    assert_eq!(std::fs::read_to_string(&registry).unwrap(), "{ not json");

    let out = run_cli(&["--config", config.to_str().unwrap(), "stats"]).await;
    assert_eq!(out.code, 1);
}

// =============================================================================
// Exit code 2
// =============================================================================

#[tokio::test]
async fn test_invalid_arguments_exit_2() {
    assert_eq!(run_cli(&[]).await.code, 2);
    assert_eq!(run_cli(&["bogus"]).await.code, 2);
    assert_eq!(run_cli(&["numeric", "--limit", "many"]).await.code, 2);
}

#[tokio::test]
async fn test_invalid_config_exits_2() {
    let dir = TempDir::new().unwrap();

    let missing = dir.path().join("missing.toml");
    let out = run_cli(&["--config", missing.to_str().unwrap(), "stats"]).await;
    assert_eq!(out.code, 2);

    let bad = dir.path().join("bad.toml");
    std::fs::write(&bad, "[catalog]\nmin_delay_ms = 900\nmax_delay_ms = 100\n").unwrap();
    let out = run_cli(&["--config", bad.to_str().unwrap(), "stats"]).await;
    assert_eq!(out.code, 2);

    let (base_url, _state) = start_stub(json!([])).await;
    let config = write_config(dir.path(), &base_url);
    let out = run_cli(&[
        "--config",
        config.to_str().unwrap(),
        "keyword",
        "--accept-threshold",
        "150",
    ])
    .await;
    assert_eq!(out.code, 2);
}
