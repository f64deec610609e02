//! Terminal controllers against a mocked player API.

use std::time::Duration;

use serde_json::json;
use tokio::time::Instant;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use ballhog_stats::client::api::PlayerApiClient;
use ballhog_stats::client::columns::ColumnConfig;
use ballhog_stats::client::comparison::{ComparisonController, DeltaSign, Side};
use ballhog_stats::client::table::{TableController, TableState};

async fn mock_api() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/players"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"rank": "1", "player": "Nikola Jokic", "pos": "C", "team": "DEN", "pts": "26.4", "points": "26.40"},
            {"rank": "2", "player": "James Harden", "pos": "PG", "team": "LAC", "pts": "16.6", "points": "16.60"},
            {"rank": "3", "player": "Jaren Jackson Jr.", "pos": "PF", "team": "MEM", "pts": "22.5", "points": "22.50"},
            {"rank": "4", "player": "LeBron James", "pos": "SF", "team": "LAL", "pts": "25.7", "points": "25.70"}
        ])))
        .mount(&server)
        .await;
    server
}

#[tokio::test]
async fn test_table_search_flow() {
    let server = mock_api().await;
    let api = PlayerApiClient::new(&server.uri()).unwrap();

    let mut table = TableController::new(ColumnConfig::standard(), Duration::from_millis(300));
    assert_eq!(table.state(), &TableState::Loading);
    table.load_from(&api).await;
    assert_eq!(table.state(), &TableState::Ready);

    let now = Instant::now();
    table.type_search("jam", now);
    assert!(table.poll_search(now + Duration::from_millis(300)));

    let view = table.view();
    let names: Vec<&str> = view.rows.iter().map(|row| row[1].text.as_str()).collect();
    assert_eq!(names, vec!["James Harden", "LeBron James"]);
    assert_eq!(view.total_label(), "Showing 2 players");
}

#[tokio::test]
async fn test_table_fetch_failure_is_reported() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/players"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({
            "error": "Failed to load player data",
            "details": "No sheet data has been fetched yet"
        })))
        .mount(&server)
        .await;
    let api = PlayerApiClient::new(&server.uri()).unwrap();

    let mut table = TableController::new(ColumnConfig::standard(), Duration::from_millis(300));
    table.load_from(&api).await;

    assert!(matches!(table.state(), TableState::Error(_)));
    let notes = table.notifications().active();
    assert!(notes.iter().any(|n| n.message == "Failed to fetch player data"));
}

#[tokio::test]
async fn test_comparison_flow() {
    let server = mock_api().await;
    let api = PlayerApiClient::new(&server.uri()).unwrap();
    let mut controller = ComparisonController::load_from(&api).await.unwrap();

    assert_eq!(
        controller.suggestions("jam"),
        vec!["James Harden", "LeBron James"]
    );

    controller.select(Side::Trading, 0, "Nikola Jokic").unwrap();
    controller.select(Side::Receiving, 0, "LeBron James").unwrap();
    controller.add_slot(Side::Receiving).unwrap();
    controller.select(Side::Receiving, 1, "James Harden").unwrap();

    let comparison = controller.compare().unwrap();
    let points = comparison.row("points").unwrap();
    assert_eq!(points.trading, "26.40");
    assert_eq!(points.receiving, "42.30");
    assert_eq!(points.difference, "+15.90");
    assert_eq!(points.sign, DeltaSign::Positive);

    let request = controller.analysis_request();
    assert_eq!(request.traded_players.len(), 1);
    assert_eq!(request.received_players.len(), 2);
}
