//! Filterable, sortable player table.
//!
//! The player list is fetched once; every interaction re-derives the view
//! from it (filter, then sort, then column projection) and the whole body is
//! rebuilt.

use std::collections::BTreeSet;
use std::time::Duration;

use anyhow::{anyhow, Result};
use tokio::time::Instant;
use tracing::{debug, instrument};

use crate::client::api::PlayerApiClient;
use crate::client::columns::{ColumnConfig, StatClass};
use crate::client::debounce::Debouncer;
use crate::client::headshot_path;
use crate::client::notify::Notifications;
use crate::players::numeric::{format_fixed, format_percent, parse_number};
use crate::players::sort::{compare_cells, SortOrder};
use crate::players::{PlayerCollection, PlayerRecord, NOT_AVAILABLE, PLAYER_FIELD};

pub const RANK_COLUMN: &str = "rank";
const POSITION_FIELD: &str = "pos";
const TEAM_FIELD: &str = "team";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableState {
    Loading,
    Ready,
    /// Terminal: the fetch failed or returned nothing.
    Error(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortState {
    pub column: String,
    pub order: SortOrder,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HeaderCell {
    pub column: String,
    pub label: String,
    pub tooltip: String,
    pub sorted: Option<SortOrder>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    pub text: String,
    /// `team • pos` under the player name.
    pub subtitle: Option<String>,
    pub image: Option<String>,
    pub class: Option<StatClass>,
}

impl Cell {
    fn text(text: String) -> Self {
        Self {
            text,
            subtitle: None,
            image: None,
            class: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TableView {
    pub headers: Vec<HeaderCell>,
    pub rows: Vec<Vec<Cell>>,
}

impl TableView {
    pub fn total_label(&self) -> String {
        format!("Showing {} players", self.rows.len())
    }

    /// Fixed-width text rendering for the terminal.
    pub fn to_text(&self) -> String {
        let mut widths: Vec<usize> = self.headers.iter().map(|h| h.label.chars().count()).collect();
        for row in &self.rows {
            for (i, cell) in row.iter().enumerate() {
                widths[i] = widths[i].max(cell.text.chars().count());
            }
        }

        let mut out = String::new();
        let header: Vec<String> = self
            .headers
            .iter()
            .zip(&widths)
            .map(|(h, w)| format!("{:<w$}", h.label, w = *w))
            .collect();
        out.push_str(header.join("  ").trim_end());
        out.push('\n');

        for row in &self.rows {
            let line: Vec<String> = row
                .iter()
                .zip(&widths)
                .map(|(c, w)| format!("{:<w$}", c.text, w = *w))
                .collect();
            out.push_str(line.join("  ").trim_end());
            out.push('\n');
        }
        out.push_str(&self.total_label());
        out
    }
}

/// Distinct values for the position and team dropdowns, sorted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterOptions {
    pub positions: Vec<String>,
    pub teams: Vec<String>,
}

pub struct TableController {
    config: ColumnConfig,
    state: TableState,
    players: PlayerCollection,
    visible_columns: Vec<String>,
    position_filter: Option<String>,
    team_filter: Option<String>,
    search: String,
    pending_search: Debouncer<String>,
    sort: Option<SortState>,
    notifications: Notifications,
}

impl TableController {
    pub fn new(config: ColumnConfig, search_debounce: Duration) -> Self {
        Self {
            visible_columns: config.default_columns.iter().map(|c| c.to_string()).collect(),
            config,
            state: TableState::Loading,
            players: Vec::new(),
            position_filter: None,
            team_filter: None,
            search: String::new(),
            pending_search: Debouncer::new(search_debounce),
            sort: None,
            notifications: Notifications::new(),
        }
    }

    pub async fn load_from(&mut self, api: &PlayerApiClient) {
        let result = api.fetch_players().await;
        self.load(result);
    }

    /// Leave `Loading`, for `Ready` or a terminal `Error`.
    #[instrument(skip(self, result))]
    pub fn load(&mut self, result: Result<PlayerCollection>) {
        if self.state != TableState::Loading {
            debug!("Ignoring repeated load");
            return;
        }

        match result {
            Ok(players) if players.is_empty() => {
                self.fail("No player data received".to_string());
            }
            Ok(players) => {
                self.players = players;
                self.visible_columns = self.config.default_columns.iter().map(|c| c.to_string()).collect();
                self.state = TableState::Ready;
                self.notifications.success("Data loaded successfully");
            }
            Err(e) => {
                self.notifications.error("Failed to fetch player data");
                self.fail(format!("{e:#}"));
            }
        }
    }

    fn fail(&mut self, message: String) {
        self.notifications.error(message.clone());
        self.state = TableState::Error(message);
    }

    pub fn state(&self) -> &TableState {
        &self.state
    }

    pub fn notifications(&self) -> &Notifications {
        &self.notifications
    }

    pub fn notifications_mut(&mut self) -> &mut Notifications {
        &mut self.notifications
    }

    pub fn visible_columns(&self) -> &[String] {
        &self.visible_columns
    }

    pub fn sort_state(&self) -> Option<&SortState> {
        self.sort.as_ref()
    }

    /// Empty or `None` clears the filter.
    pub fn set_position_filter(&mut self, position: Option<&str>) {
        self.position_filter = position.filter(|p| !p.is_empty()).map(str::to_string);
    }

    pub fn set_team_filter(&mut self, team: Option<&str>) {
        self.team_filter = team.filter(|t| !t.is_empty()).map(str::to_string);
    }

    /// A keystroke in the search box. Takes effect after the debounce wait.
    pub fn type_search(&mut self, text: &str, now: Instant) {
        self.pending_search.push(text.to_string(), now);
    }

    /// Apply a debounced search if its wait is over. Returns whether the
    /// view changed.
    pub fn poll_search(&mut self, now: Instant) -> bool {
        match self.pending_search.poll(now) {
            Some(text) => {
                self.search = text;
                true
            }
            None => false,
        }
    }

    /// Apply search text immediately.
    pub fn set_search(&mut self, text: &str) {
        self.pending_search.flush();
        self.search = text.to_string();
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn toggle_column(&mut self, column: &str, visible: bool) {
        let shown = self.visible_columns.iter().any(|c| c == column);
        if visible && !shown {
            self.visible_columns.push(column.to_string());
        } else if !visible {
            self.visible_columns.retain(|c| c != column);
        }
    }

    /// Header click: ascending first, then flip on each click of the same
    /// column.
    pub fn click_header(&mut self, column: &str) {
        let order = match &self.sort {
            Some(s) if s.column == column && s.order == SortOrder::Asc => SortOrder::Desc,
            _ => SortOrder::Asc,
        };
        self.sort_by(column, order);
    }

    /// Stat ranking dropdown: sort by a stat in an explicit order.
    pub fn sort_by(&mut self, column: &str, order: SortOrder) {
        self.sort = Some(SortState {
            column: column.to_string(),
            order,
        });
    }

    fn matches(&self, player: &PlayerRecord) -> bool {
        let pos = player.get(POSITION_FIELD).unwrap_or_default();
        let team = player.get(TEAM_FIELD).unwrap_or_default();

        let position_ok = self
            .position_filter
            .as_deref()
            .map_or(true, |p| pos.eq_ignore_ascii_case(p));
        let team_ok = self
            .team_filter
            .as_deref()
            .map_or(true, |t| team.eq_ignore_ascii_case(t));

        let term = self.search.to_lowercase();
        let search_ok = term.is_empty()
            || player.name().unwrap_or_default().to_lowercase().contains(&term)
            || team.to_lowercase().contains(&term);

        position_ok && team_ok && search_ok
    }

    /// Players passing the filters, in the current sort order.
    pub fn visible_players(&self) -> Vec<&PlayerRecord> {
        let mut players: Vec<&PlayerRecord> = self.players.iter().filter(|p| self.matches(p)).collect();
        if let Some(sort) = &self.sort {
            players.sort_by(|a, b| {
                let ordering = compare_cells(a.get(&sort.column), b.get(&sort.column));
                match sort.order {
                    SortOrder::Asc => ordering,
                    SortOrder::Desc => ordering.reverse(),
                }
            });
        }
        players
    }

    pub fn view(&self) -> TableView {
        let headers = self
            .visible_columns
            .iter()
            .map(|column| HeaderCell {
                column: column.clone(),
                label: self.config.display_name(column).to_string(),
                tooltip: self.config.tooltip(column).to_string(),
                sorted: self
                    .sort
                    .as_ref()
                    .filter(|s| &s.column == column)
                    .map(|s| s.order),
            })
            .collect();

        let rows = self
            .visible_players()
            .into_iter()
            .enumerate()
            .map(|(index, player)| {
                self.visible_columns
                    .iter()
                    .map(|column| self.cell(column, player, index))
                    .collect()
            })
            .collect();

        TableView { headers, rows }
    }

    fn cell(&self, column: &str, player: &PlayerRecord, index: usize) -> Cell {
        if column == RANK_COLUMN {
            return Cell::text((index + 1).to_string());
        }

        if column == PLAYER_FIELD {
            let name = player.display(PLAYER_FIELD);
            return Cell {
                subtitle: Some(format!(
                    "{} • {}",
                    player.display(TEAM_FIELD),
                    player.display(POSITION_FIELD)
                )),
                image: Some(headshot_path(&name)),
                text: name,
                class: None,
            };
        }

        let mut cell = Cell::text(format_value(&self.config, column, player.get(column)));
        cell.class = player
            .number(column)
            .and_then(|v| self.config.stat_class(column, v));
        cell
    }

    pub fn filter_options(&self) -> FilterOptions {
        let distinct = |field: &str| -> Vec<String> {
            self.players
                .iter()
                .filter_map(|p| p.get(field))
                .filter(|v| !v.is_empty())
                .map(str::to_string)
                .collect::<BTreeSet<_>>()
                .into_iter()
                .collect()
        };

        FilterOptions {
            positions: distinct(POSITION_FIELD),
            teams: distinct(TEAM_FIELD),
        }
    }

    /// Current view as CSV. Header row uses the long column labels.
    pub fn to_csv(&self) -> Result<String> {
        let view = self.view();
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record(view.headers.iter().map(|h| h.tooltip.as_str()))?;
        for row in &view.rows {
            writer.write_record(row.iter().map(|c| c.text.as_str()))?;
        }
        let bytes = writer
            .into_inner()
            .map_err(|e| anyhow!("Failed to flush CSV export: {}", e.error()))?;
        Ok(String::from_utf8(bytes)?)
    }
}

/// Cell text for a stat column.
pub fn format_value(config: &ColumnConfig, column: &str, raw: Option<&str>) -> String {
    let Some(raw) = raw else {
        return NOT_AVAILABLE.to_string();
    };
    if raw.is_empty() {
        return "-".to_string();
    }

    if config.is_fraction(column) {
        return format_percent(raw, 1).unwrap_or_else(|| raw.to_string());
    }
    if parse_number(raw).is_some() {
        return format_fixed(raw, 1).unwrap_or_else(|| raw.to_string());
    }
    raw.to_string()
}
