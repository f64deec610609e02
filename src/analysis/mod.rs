//! Trade analysis gateway.
//!
//! Validates a one-for-one trade request, renders the fixed prompt and hands
//! it to a text-generation backend, returning the model's text untouched.

pub mod gemini;
pub mod prompt;

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Deserializer, Serialize};
use tracing::{error, info, instrument, warn};

use crate::error::ApiError;
use crate::players::NOT_AVAILABLE;

pub const INJURY_PLACEHOLDER: &str = "Data not available";
pub const PLAYER_COUNT_MESSAGE: &str =
    "This analysis requires exactly two players (one traded, one received)";

/// Anything that turns a prompt into text.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String>;

    fn model(&self) -> &str;
}

/// Body of `POST /api/analyze-trade`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeAnalysisRequest {
    #[serde(default)]
    pub traded_players: Vec<PlayerSummary>,
    #[serde(default)]
    pub received_players: Vec<PlayerSummary>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerSummary {
    pub name: String,
    #[serde(default)]
    pub stats: SummaryStats,
}

/// Stats quoted in the prompt. Values are display text; numbers sent by a
/// client are accepted and rendered as written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryStats {
    #[serde(default = "not_available", deserialize_with = "scalar_text")]
    pub games_played: String,
    #[serde(default = "not_available", deserialize_with = "scalar_text")]
    pub minutes_per_game: String,
    #[serde(default = "not_available", deserialize_with = "scalar_text")]
    pub field_goal_percentage: String,
    #[serde(default = "not_available", deserialize_with = "scalar_text")]
    pub points: String,
    #[serde(default = "not_available", deserialize_with = "scalar_text")]
    pub rebounds: String,
    #[serde(default = "not_available", deserialize_with = "scalar_text")]
    pub assists: String,
    #[serde(default = "not_available", deserialize_with = "scalar_text")]
    pub turnovers: String,
    #[serde(default = "injury_placeholder", deserialize_with = "scalar_text")]
    pub last_season_injuries: String,
}

impl Default for SummaryStats {
    fn default() -> Self {
        Self {
            games_played: not_available(),
            minutes_per_game: not_available(),
            field_goal_percentage: not_available(),
            points: not_available(),
            rebounds: not_available(),
            assists: not_available(),
            turnovers: not_available(),
            last_season_injuries: injury_placeholder(),
        }
    }
}

fn not_available() -> String {
    NOT_AVAILABLE.to_string()
}

fn injury_placeholder() -> String {
    INJURY_PLACEHOLDER.to_string()
}

fn scalar_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => s,
        serde_json::Value::Null => not_available(),
        other => other.to_string(),
    })
}

/// Reject anything but exactly one player per side.
pub fn validate(request: &TradeAnalysisRequest) -> Result<(&PlayerSummary, &PlayerSummary), ApiError> {
    match (request.traded_players.as_slice(), request.received_players.as_slice()) {
        ([traded], [received]) => Ok((traded, received)),
        _ => Err(ApiError::Validation(PLAYER_COUNT_MESSAGE.to_string())),
    }
}

pub struct TradeAnalyzer {
    generator: Option<Arc<dyn TextGenerator>>,
}

impl TradeAnalyzer {
    pub fn new(generator: Option<Arc<dyn TextGenerator>>) -> Self {
        if generator.is_none() {
            warn!("GEMINI_API_KEY not set — trade analysis disabled");
        }
        Self { generator }
    }

    pub fn is_enabled(&self) -> bool {
        self.generator.is_some()
    }

    #[instrument(skip(self, request))]
    pub async fn analyze(&self, request: &TradeAnalysisRequest) -> Result<String, ApiError> {
        let (traded, received) = match validate(request) {
            Ok(pair) => pair,
            Err(e) => {
                warn!(
                    traded = request.traded_players.len(),
                    received = request.received_players.len(),
                    "Rejected trade analysis request"
                );
                return Err(e);
            }
        };

        let Some(generator) = &self.generator else {
            error!("Trade analysis requested but no text generator is configured");
            return Err(ApiError::AnalysisFailed);
        };

        let prompt = prompt::build_trade_prompt(traded, received);
        info!(
            traded = %traded.name,
            received = %received.name,
            model = generator.model(),
            "Requesting trade analysis"
        );

        generator.generate(&prompt).await.map_err(|e| {
            error!(error = %e, "Error analyzing trade");
            ApiError::AnalysisFailed
        })
    }
}
