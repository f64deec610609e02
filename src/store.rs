//! The player data store: last fetched sheet grid plus the normalized,
//! TTL-cached player collection built from it.
//!
//! Lifecycle is explicit: `init` performs the startup fetch, `refresh` is
//! driven by the scheduler, `teardown` drops everything on shutdown.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;
use tokio::sync::{Mutex, RwLock};
use tracing::{info, warn};

use crate::cache::TtlCache;
use crate::players::normalize::normalize_grid;
use crate::players::sort::apply_query_sort;
use crate::players::PlayerCollection;
use crate::sheets::{SheetGrid, SheetSource};

pub const PLAYERS_CACHE_KEY: &str = "players";

/// The player collection cannot be built from the current grid.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct DataUnavailable(pub String);

/// Outcome of the most recent refreshes, for the health endpoint.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RefreshStatus {
    pub last_success_at: Option<DateTime<Utc>>,
    pub last_attempt_at: Option<DateTime<Utc>>,
    pub last_error: Option<String>,
    pub grid_rows: usize,
    pub cache_rebuilds: u64,
}

pub struct PlayerStore {
    source: Arc<dyn SheetSource>,
    ttl: Duration,
    grid: RwLock<Option<Arc<SheetGrid>>>,
    cache: TtlCache<Arc<PlayerCollection>>,
    /// Serializes cache rebuilds with each other and with grid swaps.
    rebuild: Mutex<()>,
    rebuilds: AtomicU64,
    status: RwLock<RefreshStatus>,
}

impl PlayerStore {
    pub fn new(source: Arc<dyn SheetSource>, ttl: Duration) -> Self {
        Self {
            source,
            ttl,
            grid: RwLock::new(None),
            cache: TtlCache::new(),
            rebuild: Mutex::new(()),
            rebuilds: AtomicU64::new(0),
            status: RwLock::new(RefreshStatus::default()),
        }
    }

    /// Startup fetch. A failure is logged and the store starts empty; the
    /// scheduler keeps retrying on its cadence.
    pub async fn init(&self) {
        info!(source = self.source.name(), "Initializing player store");
        if let Err(e) = self.refresh().await {
            warn!(error = %e, "Initial sheet fetch failed — serving no data until next refresh");
        }
    }

    /// Fetch the sheet and, on success, replace the grid and drop the cached
    /// collection unconditionally. On failure the previous grid stays.
    pub async fn refresh(&self) -> Result<usize> {
        info!(source = self.source.name(), "Updating sheet data");
        let attempted_at = Utc::now();

        match self.source.fetch_grid().await {
            Ok(grid) => {
                let rows = grid.len();
                {
                    let _guard = self.rebuild.lock().await;
                    *self.grid.write().await = Some(Arc::new(grid));
                    self.cache.invalidate_all().await;
                }

                let mut status = self.status.write().await;
                status.last_attempt_at = Some(attempted_at);
                status.last_success_at = Some(attempted_at);
                status.last_error = None;
                status.grid_rows = rows;

                info!(rows, "Sheet data update completed");
                Ok(rows)
            }
            Err(e) => {
                let mut status = self.status.write().await;
                status.last_attempt_at = Some(attempted_at);
                status.last_error = Some(format!("{e:#}"));

                warn!(error = %e, "Sheet data update failed — keeping previous data");
                Err(e)
            }
        }
    }

    /// Drop the grid and every cached collection.
    pub async fn teardown(&self) {
        let _guard = self.rebuild.lock().await;
        *self.grid.write().await = None;
        self.cache.invalidate_all().await;
        info!("Player store torn down");
    }

    /// The cached collection, rebuilt from the current grid on a miss.
    /// Concurrent misses coalesce into one rebuild.
    pub async fn players(&self) -> Result<Arc<PlayerCollection>, DataUnavailable> {
        if let Some(players) = self.cache.get(PLAYERS_CACHE_KEY).await {
            return Ok(players);
        }

        let _guard = self.rebuild.lock().await;
        if let Some(players) = self.cache.get(PLAYERS_CACHE_KEY).await {
            return Ok(players);
        }

        info!("Cache miss - rebuilding player collection");
        let grid = self
            .grid
            .read()
            .await
            .clone()
            .ok_or_else(|| DataUnavailable("No sheet data has been fetched yet".to_string()))?;

        let players = Arc::new(normalize_grid(&grid).map_err(|e| DataUnavailable(e.to_string()))?);
        self.cache
            .set(PLAYERS_CACHE_KEY, players.clone(), self.ttl)
            .await;
        self.rebuilds.fetch_add(1, Ordering::Relaxed);

        Ok(players)
    }

    /// Player list for the API, optionally sorted. The cached collection is
    /// never reordered; sorting works on a copy.
    pub async fn list_players(
        &self,
        sort: Option<&str>,
        order: Option<&str>,
    ) -> Result<PlayerCollection, DataUnavailable> {
        let players = self.players().await?;
        let mut list = players.as_ref().clone();
        apply_query_sort(&mut list, sort, order);
        Ok(list)
    }

    /// Last successfully fetched grid, untouched by normalization.
    pub async fn raw_grid(&self) -> Option<Arc<SheetGrid>> {
        self.grid.read().await.clone()
    }

    pub async fn status(&self) -> RefreshStatus {
        let mut status = self.status.read().await.clone();
        status.cache_rebuilds = self.rebuilds.load(Ordering::Relaxed);
        status
    }
}
