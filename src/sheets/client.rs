//! Google Sheets values API client.

use std::time::Duration;

use anyhow::{anyhow, bail, Context, Result};
use async_trait::async_trait;
use secrecy::ExposeSecret;
use serde::Deserialize;
use tracing::{info, instrument};

use crate::config::SheetConfig;
use crate::sheets::auth::ServiceAccountAuth;
use crate::sheets::{SheetGrid, SheetSource};

pub struct GoogleSheetsClient {
    http: reqwest::Client,
    auth: ServiceAccountAuth,
    base_url: String,
    spreadsheet_id: String,
    range: String,
}

impl GoogleSheetsClient {
    pub fn new(config: &SheetConfig, auth: ServiceAccountAuth) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_seconds))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            http,
            auth,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            spreadsheet_id: config.spreadsheet_id.clone(),
            range: config.range.clone(),
        })
    }

    fn values_url(&self) -> Result<reqwest::Url> {
        let mut url = reqwest::Url::parse(&self.base_url)
            .with_context(|| format!("Invalid Sheets base URL: {}", self.base_url))?;
        url.path_segments_mut()
            .map_err(|_| anyhow!("Sheets base URL cannot carry a path: {}", self.base_url))?
            .extend([
                "v4",
                "spreadsheets",
                self.spreadsheet_id.as_str(),
                "values",
                self.range.as_str(),
            ]);
        Ok(url)
    }
}

#[async_trait]
impl SheetSource for GoogleSheetsClient {
    #[instrument(skip(self), fields(range = %self.range))]
    async fn fetch_grid(&self) -> Result<SheetGrid> {
        let token = self.auth.access_token(&self.http).await?;

        let response = self
            .http
            .get(self.values_url()?)
            .bearer_auth(token.expose_secret())
            .send()
            .await
            .context("Sheets values request failed")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            bail!("Sheets API error ({status}): {body}");
        }

        let value_range: ValueRange = response
            .json()
            .await
            .context("Failed to parse Sheets values response")?;

        let grid = value_range.into_grid();
        info!(rows = grid.len(), "Fetched sheet values");
        Ok(grid)
    }

    fn name(&self) -> &str {
        "google_sheets"
    }
}

// --- Sheets API Response Types ---

#[derive(Debug, Deserialize)]
struct ValueRange {
    /// Omitted entirely by the API when the range is empty.
    #[serde(default)]
    values: Vec<Vec<serde_json::Value>>,
}

impl ValueRange {
    fn into_grid(self) -> SheetGrid {
        self.values
            .into_iter()
            .map(|row| row.into_iter().map(cell_text).collect())
            .collect()
    }
}

fn cell_text(cell: serde_json::Value) -> String {
    match cell {
        serde_json::Value::String(s) => s,
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    }
}
