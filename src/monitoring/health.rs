//! Process health reported at `GET /api/health`.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::store::{PlayerStore, RefreshStatus};

/// Shared health state, cheap to clone into handlers.
#[derive(Clone)]
pub struct HealthState {
    store: Arc<PlayerStore>,
    started_at: DateTime<Utc>,
    analysis_enabled: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthReport {
    pub status: &'static str,
    pub started_at: DateTime<Utc>,
    pub uptime_seconds: i64,
    pub analysis_enabled: bool,
    pub refresh: RefreshStatus,
}

impl HealthState {
    pub fn new(store: Arc<PlayerStore>, analysis_enabled: bool) -> Self {
        Self {
            store,
            started_at: Utc::now(),
            analysis_enabled,
        }
    }

    pub async fn report(&self) -> HealthReport {
        let refresh = self.store.status().await;
        let now = Utc::now();
        HealthReport {
            status: overall_status(&refresh),
            started_at: self.started_at,
            uptime_seconds: (now - self.started_at).num_seconds(),
            analysis_enabled: self.analysis_enabled,
            refresh,
        }
    }
}

/// `ok` once data has been fetched, `degraded` while serving stale data after
/// a failed refresh, `unavailable` before the first successful fetch.
fn overall_status(refresh: &RefreshStatus) -> &'static str {
    match (&refresh.last_success_at, &refresh.last_error) {
        (None, _) => "unavailable",
        (Some(_), Some(_)) => "degraded",
        (Some(_), None) => "ok",
    }
}
