//! Spreadsheet access.
//!
//! The rest of the crate only sees `SheetSource`: something that returns the
//! current grid of cells, header row first.

pub mod auth;
pub mod client;

use anyhow::Result;
use async_trait::async_trait;

/// Raw cells as returned by the spreadsheet, row 0 being the header.
pub type SheetGrid = Vec<Vec<String>>;

#[async_trait]
pub trait SheetSource: Send + Sync {
    /// Fetch the full configured range.
    async fn fetch_grid(&self) -> Result<SheetGrid>;

    /// Human-readable name for logs.
    fn name(&self) -> &str;
}
