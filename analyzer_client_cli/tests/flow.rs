use std::fs;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use analyzer_client_cli::client::AnalyzerClient;
use analyzer_client_cli::error::ClientError;
use analyzer_client_cli::session::{SessionPhase, TaskSession};
use analyzer_client_cli::ExportFormat;
use axum::extract::{Path, State};
use axum::http::header;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use tempfile::TempDir;
use url::Url;

#[derive(Clone, Default)]
struct MockApi {
    polls: Arc<AtomicUsize>,
    result_calls: Arc<AtomicUsize>,
}

async fn upload() -> Json<Value> {
    Json(json!({
        "task_id": "t-42",
        "estimated_time_seconds": 5,
        "file_info": {
            "name": "comments.csv",
            "rows": 3,
            "size_mb": 0.1,
            "columns_found": ["Nota", "Comentario Final"],
            "has_nps_column": true
        }
    }))
}

async fn status(State(api): State<MockApi>, Path(task_id): Path<String>) -> Json<Value> {
    let poll = api.polls.fetch_add(1, Ordering::SeqCst);
    let body = match poll {
        0 => json!({"task_id": task_id, "status": "queued", "progress": 0, "results_available": false}),
        1 => json!({"task_id": task_id, "status": "processing", "progress": 60, "current_step": "analyzing", "results_available": false}),
        _ => json!({"task_id": task_id, "status": "completed", "progress": 100, "results_available": true}),
    };
    Json(body)
}

async fn results(State(api): State<MockApi>, Path(task_id): Path<String>) -> Json<Value> {
    api.result_calls.fetch_add(1, Ordering::SeqCst);
    Json(json!({
        "task_id": task_id,
        "summary": {
            "nps": {
                "score": 33.3,
                "promoters": 2, "promoters_percentage": 66.7,
                "passives": 0, "passives_percentage": 0.0,
                "detractors": 1, "detractors_percentage": 33.3
            },
            "churn_risk": {
                "average": 0.25,
                "high_risk_count": 1,
                "high_risk_percentage": 33.3,
                "distribution": {"very_low": 1, "low": 1, "moderate": 0, "high": 1, "very_high": 0}
            },
            "pain_points": [
                {"category": "delivery", "count": 1, "percentage": 33.3, "examples": ["late delivery"]}
            ],
            "emotions": {},
            "sentiment_distribution": {}
        },
        "metadata": {"total_comments": 3},
        "rows": [],
        "aggregated_insights": {}
    }))
}

async fn export(Path(_task_id): Path<String>) -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/csv")],
        "index,churn\n0,0.1\n".to_string(),
    )
}

async fn spawn_mock() -> (SocketAddr, MockApi) {
    let api = MockApi::default();
    let app = Router::new()
        .route("/upload", post(upload))
        .route("/status/{task_id}", get(status))
        .route("/results/{task_id}", get(results))
        .route("/export/{task_id}", get(export))
        .with_state(api.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (addr, api)
}

fn sample_csv(dir: &TempDir) -> PathBuf {
    let path = dir.path().join("comments.csv");
    fs::write(
        &path,
        "Nota,Comentario Final\n9,excellent service\n8,fine\n2,late delivery\n",
    )
    .unwrap();
    path
}

fn fast_client(addr: SocketAddr) -> AnalyzerClient {
    AnalyzerClient::new(
        Url::parse(&format!("http://{addr}")).unwrap(),
        Duration::from_millis(10),
        Duration::from_secs(5),
    )
    .unwrap()
}

#[tokio::test]
async fn upload_poll_results_export_round() {
    let (addr, api) = spawn_mock().await;
    let dir = TempDir::new().unwrap();
    let csv = sample_csv(&dir);

    let client = fast_client(addr);
    let mut session = TaskSession::new();

    let upload = client
        .upload(&mut session, &csv, Some("beta"))
        .await
        .unwrap();
    assert_eq!(upload.task_id, "t-42");
    assert_eq!(upload.file_info.rows, 3);
    assert_eq!(session.phase, SessionPhase::Processing);

    client.poll_to_completion(&mut session).await.unwrap();
    assert_eq!(session.phase, SessionPhase::Completed);
    assert_eq!(session.progress, 100);
    assert!(api.polls.load(Ordering::SeqCst) >= 3);

    let results = client.fetch_results("t-42").await.unwrap();
    assert!((results.summary.nps.score - 33.3).abs() < f64::EPSILON);
    assert_eq!(results.summary.pain_points[0].category, "delivery");

    // Second fetch is a cache hit.
    client.fetch_results("t-42").await.unwrap();
    assert_eq!(api.result_calls.load(Ordering::SeqCst), 1);

    let blob = client.export("t-42", ExportFormat::Csv).await.unwrap();
    assert_eq!(blob, b"index,churn\n0,0.1\n");
}

#[tokio::test]
async fn reset_clears_the_results_cache() {
    let (addr, api) = spawn_mock().await;
    let dir = TempDir::new().unwrap();
    let csv = sample_csv(&dir);

    let client = fast_client(addr);
    let mut session = TaskSession::new();
    client.upload(&mut session, &csv, None).await.unwrap();
    client.poll_to_completion(&mut session).await.unwrap();
    client.fetch_results("t-42").await.unwrap();

    client.reset(&mut session);
    assert_eq!(session.phase, SessionPhase::Idle);
    assert!(client.results.is_empty());

    client.fetch_results("t-42").await.unwrap();
    assert_eq!(api.result_calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn stalled_task_fails_after_the_timeout() {
    async fn stuck(Path(task_id): Path<String>) -> Json<Value> {
        Json(json!({"task_id": task_id, "status": "processing", "progress": 10, "results_available": false}))
    }
    let app = Router::new().route("/status/{task_id}", get(stuck));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let client = AnalyzerClient::new(
        Url::parse(&format!("http://{addr}")).unwrap(),
        Duration::from_millis(10),
        Duration::from_millis(50),
    )
    .unwrap();

    let mut session = TaskSession::new();
    session.begin_upload().unwrap();
    session.uploaded("t-stuck".to_string()).unwrap();

    let err = client.poll_to_completion(&mut session).await.unwrap_err();
    assert!(matches!(err, ClientError::Stalled { .. }));
    assert_eq!(session.phase, SessionPhase::Failed);
}

#[tokio::test]
async fn failed_task_surfaces_the_upstream_error() {
    async fn failing(Path(task_id): Path<String>) -> Json<Value> {
        Json(json!({
            "task_id": task_id,
            "status": "failed",
            "progress": 30,
            "error": "unreadable file",
            "results_available": false
        }))
    }
    let app = Router::new().route("/status/{task_id}", get(failing));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let client = fast_client(addr);
    let mut session = TaskSession::new();
    session.begin_upload().unwrap();
    session.uploaded("t-bad".to_string()).unwrap();

    let err = client.poll_to_completion(&mut session).await.unwrap_err();
    assert!(matches!(
        err,
        ClientError::TaskFailed { ref reason, .. } if reason == "unreadable file"
    ));
    assert_eq!(session.error.as_deref(), Some("unreadable file"));
}

#[tokio::test]
async fn validation_failure_keeps_the_session_idle() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("notes.txt");
    fs::write(&path, "not a spreadsheet").unwrap();

    // Nothing listens here; validation must fail before any request.
    let client = AnalyzerClient::new(
        Url::parse("http://127.0.0.1:9").unwrap(),
        Duration::from_millis(10),
        Duration::from_secs(5),
    )
    .unwrap();

    let mut session = TaskSession::new();
    let err = client.upload(&mut session, &path, None).await.unwrap_err();
    assert!(matches!(err, ClientError::UnsupportedFileType { .. }));
    assert_eq!(session.phase, SessionPhase::Idle);
}
