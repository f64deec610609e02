//! Integration tests for the HTTP API.
//!
//! Drives the real axum router with an in-memory sheet source and a fake
//! text generator; no network involved.

use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{bail, Result};
use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use ballhog_stats::analysis::{TextGenerator, TradeAnalyzer};
use ballhog_stats::config::ServerConfig;
use ballhog_stats::server::{build_router, AppState};
use ballhog_stats::sheets::{SheetGrid, SheetSource};
use ballhog_stats::store::PlayerStore;

struct StaticSheet {
    grid: Option<SheetGrid>,
}

#[async_trait]
impl SheetSource for StaticSheet {
    async fn fetch_grid(&self) -> Result<SheetGrid> {
        match &self.grid {
            Some(grid) => Ok(grid.clone()),
            None => bail!("spreadsheet unreachable"),
        }
    }

    fn name(&self) -> &str {
        "static"
    }
}

#[derive(Default)]
struct FakeGenerator {
    fail: bool,
    calls: AtomicUsize,
    prompts: Mutex<Vec<String>>,
}

#[async_trait]
impl TextGenerator for FakeGenerator {
    async fn generate(&self, prompt: &str) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().unwrap().push(prompt.to_string());
        if self.fail {
            bail!("model overloaded");
        }
        Ok("Player 2 is the better trade.".to_string())
    }

    fn model(&self) -> &str {
        "fake"
    }
}

fn grid(rows: &[&[&str]]) -> SheetGrid {
    rows.iter()
        .map(|row| row.iter().map(|c| c.to_string()).collect())
        .collect()
}

fn sample_grid() -> SheetGrid {
    grid(&[
        &["Rank", "Player", "Team", "Pos", "Points", "Field Goal Percentage"],
        &["1", "Nikola Jokic", "DEN", "C", "26.4", "58.3"],
        &["2", "Luka Doncic", "DAL", "PG", "33.9"],
        &["3", "Jalen Brunson", "NYK", "PG", "28.7", "47.9"],
    ])
}

fn server_config(static_dir: PathBuf) -> ServerConfig {
    ServerConfig {
        bind: "127.0.0.1".to_string(),
        port: 3000,
        static_dir,
        allowed_origin: None,
    }
}

async fn test_app(grid: Option<SheetGrid>, generator: Option<Arc<FakeGenerator>>) -> Router {
    let store = Arc::new(PlayerStore::new(
        Arc::new(StaticSheet { grid }),
        Duration::from_secs(3600),
    ));
    store.init().await;

    let generator = generator.map(|g| g as Arc<dyn TextGenerator>);
    let state = AppState::new(store, TradeAnalyzer::new(generator));
    build_router(state, &server_config(PathBuf::from("public"))).unwrap()
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes().to_vec();
    (status, body)
}

async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    let (status, body) = send(app, request).await;
    (status, serde_json::from_slice(&body).unwrap())
}

async fn post_json(app: Router, uri: &str, body: String) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body))
        .unwrap();
    let (status, body) = send(app, request).await;
    (status, serde_json::from_slice(&body).unwrap())
}

fn summary(name: &str) -> Value {
    json!({
        "name": name,
        "stats": {
            "gamesPlayed": "79.00",
            "minutesPerGame": "34.60",
            "fieldGoalPercentage": "58.3",
            "points": "26.40",
            "rebounds": "12.40",
            "assists": "9.00",
            "turnovers": "3.00",
            "lastSeasonInjuries": "Data not available"
        }
    })
}

// --- /api/players ---

#[tokio::test]
async fn test_players_in_sheet_order_with_formatting() {
    let app = test_app(Some(sample_grid()), None).await;
    let (status, body) = get_json(app, "/api/players").await;

    assert_eq!(status, StatusCode::OK);
    let players = body.as_array().unwrap();
    assert_eq!(players.len(), 3);
    assert_eq!(players[0]["player"], "Nikola Jokic");
    assert_eq!(players[0]["points"], "26.40");
    assert_eq!(players[0]["field_goal_percentage"], "58.3");
    assert_eq!(players[1]["field_goal_percentage"], Value::Null);

    let keys: Vec<&String> = players[0].as_object().unwrap().keys().collect();
    assert_eq!(
        keys,
        vec!["rank", "player", "team", "pos", "points", "field_goal_percentage"]
    );
}

#[tokio::test]
async fn test_players_sorted_desc() {
    let app = test_app(Some(sample_grid()), None).await;
    let (_, body) = get_json(app, "/api/players?sort=points&order=desc").await;

    let names: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["player"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Luka Doncic", "Jalen Brunson", "Nikola Jokic"]);
}

#[tokio::test]
async fn test_unknown_sort_field_keeps_order() {
    let app = test_app(Some(sample_grid()), None).await;
    let (status, body) = get_json(app, "/api/players?sort=steals").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["player"], "Nikola Jokic");
    assert_eq!(body[2]["player"], "Jalen Brunson");
}

#[tokio::test]
async fn test_header_only_sheet_is_an_error() {
    let app = test_app(Some(grid(&[&["Player", "Team"]])), None).await;
    let (status, body) = get_json(app, "/api/players").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Failed to load player data");
    assert!(body["details"].as_str().unwrap().contains("Invalid or empty sheet data"));
}

#[tokio::test]
async fn test_no_fetch_yet_is_an_error() {
    let app = test_app(None, None).await;
    let (status, body) = get_json(app, "/api/players").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Failed to load player data");
}

// --- /api/analyze-trade ---

#[tokio::test]
async fn test_two_for_one_is_rejected_without_model_call() {
    let generator = Arc::new(FakeGenerator::default());
    let app = test_app(Some(sample_grid()), Some(generator.clone())).await;

    let body = json!({
        "tradedPlayers": [summary("Nikola Jokic"), summary("Luka Doncic")],
        "receivedPlayers": [summary("Jalen Brunson")]
    });
    let (status, response) = post_json(app, "/api/analyze-trade", body.to_string()).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        response["error"],
        "This analysis requires exactly two players (one traded, one received)"
    );
    assert_eq!(generator.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_one_for_one_returns_model_text() {
    let generator = Arc::new(FakeGenerator::default());
    let app = test_app(Some(sample_grid()), Some(generator.clone())).await;

    let body = json!({
        "tradedPlayers": [summary("Nikola Jokic")],
        "receivedPlayers": [summary("Jalen Brunson")]
    });
    let (status, response) = post_json(app, "/api/analyze-trade", body.to_string()).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(response, json!({"analysis": "Player 2 is the better trade."}));

    let prompts = generator.prompts.lock().unwrap();
    assert!(prompts[0].contains("Player 1 (Nikola Jokic):\nGames Played: 79.00\n"));
    assert!(prompts[0].contains("Player 2 (Jalen Brunson):"));
}

#[tokio::test]
async fn test_model_failure_is_generic() {
    let generator = Arc::new(FakeGenerator {
        fail: true,
        ..FakeGenerator::default()
    });
    let app = test_app(Some(sample_grid()), Some(generator)).await;

    let body = json!({
        "tradedPlayers": [summary("A")],
        "receivedPlayers": [summary("B")]
    });
    let (status, response) = post_json(app, "/api/analyze-trade", body.to_string()).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response["error"], "An error occurred while analyzing the trade");
}

#[tokio::test]
async fn test_malformed_body_is_a_validation_error() {
    let generator = Arc::new(FakeGenerator::default());
    let app = test_app(Some(sample_grid()), Some(generator.clone())).await;

    let (status, response) = post_json(app, "/api/analyze-trade", "{not json".to_string()).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(response["error"].is_string());
    assert_eq!(generator.calls.load(Ordering::SeqCst), 0);
}

// --- /htmltable, /api/health, static files, CORS ---

#[tokio::test]
async fn test_html_table_renders_raw_grid() {
    let app = test_app(Some(sample_grid()), None).await;
    let request = Request::builder().uri("/htmltable").body(Body::empty()).unwrap();
    let (status, body) = send(app, request).await;

    assert_eq!(status, StatusCode::OK);
    let html = String::from_utf8(body).unwrap();
    assert!(html.contains("<td>Field Goal Percentage</td>"));
    assert!(html.contains("<td>33.9</td>"));
    assert_eq!(html.matches("<tr>").count(), 4);
}

#[tokio::test]
async fn test_health_reports_refresh_status() {
    let app = test_app(Some(sample_grid()), None).await;
    let (status, body) = get_json(app, "/api/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["analysis_enabled"], false);
    assert_eq!(body["refresh"]["grid_rows"], 4);
    assert!(body["refresh"]["last_error"].is_null());
}

#[tokio::test]
async fn test_health_degrades_without_data() {
    let app = test_app(None, Some(Arc::new(FakeGenerator::default()))).await;
    let (_, body) = get_json(app, "/api/health").await;

    assert_eq!(body["status"], "unavailable");
    assert_eq!(body["analysis_enabled"], true);
    assert!(body["refresh"]["last_error"]
        .as_str()
        .unwrap()
        .contains("spreadsheet unreachable"));
}

#[tokio::test]
async fn test_index_and_filtertable_served_from_static_dir() {
    let dir = std::env::temp_dir().join(format!("ballhog-static-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("index.html"), "<h1>Trade</h1>").unwrap();
    std::fs::write(dir.join("filtertable.html"), "<h1>Table</h1>").unwrap();
    std::fs::write(dir.join("styles.css"), "body {}").unwrap();

    let store = Arc::new(PlayerStore::new(
        Arc::new(StaticSheet { grid: None }),
        Duration::from_secs(3600),
    ));
    let state = AppState::new(store, TradeAnalyzer::new(None));
    let app = build_router(state, &server_config(dir.clone())).unwrap();

    for (uri, expected) in [
        ("/", "<h1>Trade</h1>"),
        ("/filtertable", "<h1>Table</h1>"),
        ("/styles.css", "body {}"),
    ] {
        let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
        let (status, body) = send(app.clone(), request).await;
        assert_eq!(status, StatusCode::OK, "{uri}");
        assert_eq!(String::from_utf8(body).unwrap(), expected);
    }

    let request = Request::builder().uri("/missing.js").body(Body::empty()).unwrap();
    let (status, _) = send(app, request).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    std::fs::remove_dir_all(&dir).ok();
}

#[tokio::test]
async fn test_cors_allows_configured_origin_only() {
    let app = test_app(Some(sample_grid()), None).await;

    let request = Request::builder()
        .uri("/api/players")
        .header(header::ORIGIN, "http://localhost:3000")
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    let headers = response.headers();
    assert_eq!(
        headers.get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
        "http://localhost:3000"
    );
    assert_eq!(
        headers.get(header::ACCESS_CONTROL_ALLOW_CREDENTIALS).unwrap(),
        "true"
    );

    let request = Request::builder()
        .uri("/api/players")
        .header(header::ORIGIN, "http://evil.example")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert!(response
        .headers()
        .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
        .is_none());
}
