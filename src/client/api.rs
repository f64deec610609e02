//! HTTP client for the player API, used by the terminal controllers.

use std::time::Duration;

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use tracing::{info, instrument};

use crate::analysis::TradeAnalysisRequest;
use crate::players::PlayerCollection;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(90);

pub struct PlayerApiClient {
    client: reqwest::Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
    #[serde(default)]
    details: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AnalysisBody {
    analysis: String,
}

impl PlayerApiClient {
    pub fn new(base_url: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// `GET /api/players`, unsorted.
    #[instrument(skip(self), fields(base_url = %self.base_url))]
    pub async fn fetch_players(&self) -> Result<PlayerCollection> {
        let response = self
            .client
            .get(format!("{}/api/players", self.base_url))
            .send()
            .await
            .context("Player API request failed")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            bail!("HTTP error! status: {} ({})", status.as_u16(), error_message(&body));
        }

        let players: PlayerCollection = response
            .json()
            .await
            .context("Failed to parse player list")?;
        info!(count = players.len(), "Fetched player data");
        Ok(players)
    }

    /// `POST /api/analyze-trade`. A server-side rejection surfaces its message.
    #[instrument(skip(self, request))]
    pub async fn analyze_trade(&self, request: &TradeAnalysisRequest) -> Result<String> {
        let response = self
            .client
            .post(format!("{}/api/analyze-trade", self.base_url))
            .json(request)
            .send()
            .await
            .context("Trade analysis request failed")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            bail!("{}", error_message(&body));
        }

        let body: AnalysisBody = response
            .json()
            .await
            .context("Failed to parse trade analysis")?;
        Ok(body.analysis)
    }
}

/// `error` (plus `details`) from a JSON error body, else the raw body.
fn error_message(body: &str) -> String {
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(ErrorBody {
            error,
            details: Some(details),
        }) => format!("{error}: {details}"),
        Ok(ErrorBody { error, .. }) => error,
        Err(_) if body.is_empty() => "empty response".to_string(),
        Err(_) => body.to_string(),
    }
}
