//! Trade comparison: pick up to five players per side, total their stats and
//! show the receiving-minus-trading delta, optionally asking for an AI
//! write-up.

use std::collections::HashMap;
use std::fmt;

use anyhow::Result;
use rust_decimal::Decimal;
use tracing::{info, warn};

use crate::analysis::{PlayerSummary, SummaryStats, TradeAnalysisRequest, INJURY_PLACEHOLDER};
use crate::client::api::PlayerApiClient;
use crate::client::headshot_path;
use crate::client::notify::Notifications;
use crate::players::numeric::round_fixed;
use crate::players::{PlayerCollection, PlayerRecord, NOT_AVAILABLE};

pub const MAX_SLOTS: usize = 5;

/// Identity fields never summed.
const EXCLUDED_STATS: &[&str] = &["rank", "player", "player_name", "position", "team", "pos"];

const TEAM_NAMES: &[(&str, &str)] = &[
    ("ATL", "Atlanta Hawks"),
    ("BOS", "Boston Celtics"),
    ("BKN", "Brooklyn Nets"),
    ("CHA", "Charlotte Hornets"),
    ("CHI", "Chicago Bulls"),
    ("CLE", "Cleveland Cavaliers"),
    ("DAL", "Dallas Mavericks"),
    ("DEN", "Denver Nuggets"),
    ("DET", "Detroit Pistons"),
    ("GSW", "Golden State Warriors"),
    ("HOU", "Houston Rockets"),
    ("IND", "Indiana Pacers"),
    ("LAC", "Los Angeles Clippers"),
    ("LAL", "Los Angeles Lakers"),
    ("MEM", "Memphis Grizzlies"),
    ("MIA", "Miami Heat"),
    ("MIL", "Milwaukee Bucks"),
    ("MIN", "Minnesota Timberwolves"),
    ("NOP", "New Orleans Pelicans"),
    ("NYK", "New York Knicks"),
    ("OKC", "Oklahoma City Thunder"),
    ("ORL", "Orlando Magic"),
    ("PHI", "Philadelphia 76ers"),
    ("PHX", "Phoenix Suns"),
    ("POR", "Portland Trail Blazers"),
    ("SAC", "Sacramento Kings"),
    ("SAS", "San Antonio Spurs"),
    ("TOR", "Toronto Raptors"),
    ("UTA", "Utah Jazz"),
    ("WAS", "Washington Wizards"),
];

const POSITION_NAMES: &[(&str, &str)] = &[
    ("C", "Center"),
    ("PF", "Power Forward"),
    ("SF", "Small Forward"),
    ("SG", "Shooting Guard"),
    ("PG", "Point Guard"),
    ("F", "Forward"),
    ("G", "Guard"),
    ("F-C", "Forward-Center"),
    ("C-F", "Center-Forward"),
    ("G-F", "Guard-Forward"),
    ("F-G", "Forward-Guard"),
];

pub fn team_name(abbreviation: &str) -> Option<&'static str> {
    TEAM_NAMES
        .iter()
        .find(|(k, _)| *k == abbreviation)
        .map(|(_, v)| *v)
}

pub fn position_name(abbreviation: &str) -> Option<&'static str> {
    POSITION_NAMES
        .iter()
        .find(|(k, _)| *k == abbreviation)
        .map(|(_, v)| *v)
}

/// `field_goal_percentage` → `Field Goal Percentage`.
pub fn format_stat_name(stat: &str) -> String {
    stat.split('_')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Trading,
    Receiving,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(match self {
            Side::Trading => "trading",
            Side::Receiving => "receiving",
        })
    }
}

/// Summary shown once a name is picked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerCard {
    pub name: String,
    pub image: String,
    pub rank: String,
    pub position: String,
    pub team: String,
    pub team_name: Option<&'static str>,
    pub position_name: Option<&'static str>,
}

/// Per-stat totals for one side, in first-seen field order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ComparisonStats {
    order: Vec<String>,
    sums: HashMap<String, Decimal>,
}

impl ComparisonStats {
    /// Add every numeric, non-identity field of a player.
    pub fn add_player(&mut self, player: &PlayerRecord) {
        for field in player.fields() {
            if EXCLUDED_STATS.contains(&field) {
                continue;
            }
            let Some(value) = player.decimal(field) else {
                continue;
            };
            match self.sums.get_mut(field) {
                Some(sum) => *sum += value,
                None => {
                    self.order.push(field.to_string());
                    self.sums.insert(field.to_string(), value);
                }
            }
        }
    }

    pub fn get(&self, stat: &str) -> Option<Decimal> {
        self.sums.get(stat).copied()
    }

    pub fn stats(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeltaSign {
    Positive,
    Negative,
}

impl DeltaSign {
    pub fn css_class(self) -> &'static str {
        match self {
            DeltaSign::Positive => "positive",
            DeltaSign::Negative => "negative",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DeltaRow {
    pub stat: String,
    pub label: String,
    pub trading: String,
    pub receiving: String,
    pub difference: String,
    pub sign: DeltaSign,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Comparison {
    pub trading: ComparisonStats,
    pub receiving: ComparisonStats,
    pub rows: Vec<DeltaRow>,
}

impl Comparison {
    fn build(trading: ComparisonStats, receiving: ComparisonStats) -> Self {
        let mut stats: Vec<&str> = trading.stats().collect();
        for stat in receiving.stats() {
            if !stats.contains(&stat) {
                stats.push(stat);
            }
        }

        let rows = stats
            .into_iter()
            .map(|stat| {
                let t = trading.get(stat);
                let r = receiving.get(stat);
                let difference =
                    round_fixed(r.unwrap_or(Decimal::ZERO) - t.unwrap_or(Decimal::ZERO), 2);
                let sign = if difference.is_zero() || difference.is_sign_positive() {
                    DeltaSign::Positive
                } else {
                    DeltaSign::Negative
                };
                DeltaRow {
                    stat: stat.to_string(),
                    label: format_stat_name(stat),
                    trading: fixed2(t),
                    receiving: fixed2(r),
                    difference: match sign {
                        DeltaSign::Positive => format!("+{}", difference.abs()),
                        DeltaSign::Negative => difference.to_string(),
                    },
                    sign,
                }
            })
            .collect();

        Self {
            trading,
            receiving,
            rows,
        }
    }

    pub fn row(&self, stat: &str) -> Option<&DeltaRow> {
        self.rows.iter().find(|r| r.stat == stat)
    }

    pub fn to_text(&self) -> String {
        let label_width = self
            .rows
            .iter()
            .map(|r| r.label.chars().count())
            .max()
            .unwrap_or(0)
            .max(4);

        let mut out = format!(
            "{:<label_width$}  {:>10}  {:>10}  {:>10}\n",
            "Stat", "Trading", "Receiving", "Difference"
        );
        for row in &self.rows {
            out.push_str(&format!(
                "{:<label_width$}  {:>10}  {:>10}  {:>10}\n",
                row.label, row.trading, row.receiving, row.difference
            ));
        }
        out
    }
}

fn fixed2(value: Option<Decimal>) -> String {
    value.map_or_else(|| NOT_AVAILABLE.to_string(), |v| round_fixed(v, 2).to_string())
}

pub struct ComparisonController {
    players: HashMap<String, PlayerRecord>,
    names: Vec<String>,
    trading: Vec<String>,
    receiving: Vec<String>,
    comparison: Option<Comparison>,
    notifications: Notifications,
}

impl ComparisonController {
    /// Each side starts with one empty slot. Later duplicates of a name
    /// replace earlier ones.
    pub fn new(players: PlayerCollection) -> Self {
        let mut by_name = HashMap::new();
        let mut names = Vec::new();
        for player in players {
            let Some(name) = player.name().filter(|n| !n.is_empty()).map(str::to_string) else {
                warn!("Skipping player record without a name");
                continue;
            };
            if !by_name.contains_key(&name) {
                names.push(name.clone());
            }
            by_name.insert(name, player);
        }
        info!(players = names.len(), "Comparison player set ready");

        Self {
            players: by_name,
            names,
            trading: vec![String::new()],
            receiving: vec![String::new()],
            comparison: None,
            notifications: Notifications::new(),
        }
    }

    pub async fn load_from(api: &PlayerApiClient) -> Result<Self> {
        Ok(Self::new(api.fetch_players().await?))
    }

    fn slots(&self, side: Side) -> &Vec<String> {
        match side {
            Side::Trading => &self.trading,
            Side::Receiving => &self.receiving,
        }
    }

    fn slots_mut(&mut self, side: Side) -> &mut Vec<String> {
        match side {
            Side::Trading => &mut self.trading,
            Side::Receiving => &mut self.receiving,
        }
    }

    pub fn slot_count(&self, side: Side) -> usize {
        self.slots(side).len()
    }

    /// Whether the add control is shown.
    pub fn can_add(&self, side: Side) -> bool {
        self.slot_count(side) < MAX_SLOTS
    }

    /// Add an empty slot. Returns its index, or `None` at the limit.
    pub fn add_slot(&mut self, side: Side) -> Option<usize> {
        if !self.can_add(side) {
            return None;
        }
        let slots = self.slots_mut(side);
        slots.push(String::new());
        Some(slots.len() - 1)
    }

    pub fn remove_slot(&mut self, side: Side, index: usize) -> bool {
        let slots = self.slots_mut(side);
        if index >= slots.len() {
            return false;
        }
        slots.remove(index);
        true
    }

    /// Free text typed into a slot.
    pub fn set_input(&mut self, side: Side, index: usize, text: &str) -> bool {
        match self.slots_mut(side).get_mut(index) {
            Some(slot) => {
                *slot = text.to_string();
                true
            }
            None => false,
        }
    }

    pub fn input(&self, side: Side, index: usize) -> Option<&str> {
        self.slots(side).get(index).map(String::as_str)
    }

    /// Autocomplete: names containing `query`, case-insensitively. An empty
    /// query suggests nothing.
    pub fn suggestions(&self, query: &str) -> Vec<&str> {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return Vec::new();
        }
        self.names
            .iter()
            .filter(|n| n.to_lowercase().contains(&query))
            .map(String::as_str)
            .collect()
    }

    /// Pick a suggestion: the slot takes the exact stored name.
    pub fn select(&mut self, side: Side, index: usize, name: &str) -> Option<PlayerCard> {
        let stored = self.players.get_key_value(name).map(|(k, _)| k.clone())?;
        if !self.set_input(side, index, &stored) {
            return None;
        }
        self.card(side, index)
    }

    fn selected(&self, side: Side) -> impl Iterator<Item = &PlayerRecord> {
        self.slots(side)
            .iter()
            .filter_map(|input| self.players.get(input.trim()))
    }

    pub fn card(&self, side: Side, index: usize) -> Option<PlayerCard> {
        let input = self.input(side, index)?.trim();
        let player = self.players.get(input)?;
        let text = |field: &str| {
            player
                .get(field)
                .filter(|v| !v.is_empty())
                .unwrap_or(NOT_AVAILABLE)
                .to_string()
        };

        Some(PlayerCard {
            name: input.to_string(),
            image: headshot_path(input),
            rank: text("rank"),
            position: text("pos"),
            team: text("team"),
            team_name: player.get("team").and_then(team_name),
            position_name: player.get("pos").and_then(position_name),
        })
    }

    /// At least one recognized name on each side.
    pub fn can_compare(&self) -> bool {
        self.selected(Side::Trading).next().is_some()
            && self.selected(Side::Receiving).next().is_some()
    }

    /// Recompute both sides' totals from scratch and enable analysis.
    pub fn compare(&mut self) -> Option<&Comparison> {
        if !self.can_compare() {
            self.comparison = None;
            self.notifications
                .error("Select at least one player on each side to compare");
            return None;
        }

        let mut trading = ComparisonStats::default();
        for player in self.selected(Side::Trading) {
            trading.add_player(player);
        }
        let mut receiving = ComparisonStats::default();
        for player in self.selected(Side::Receiving) {
            receiving.add_player(player);
        }

        self.comparison = Some(Comparison::build(trading, receiving));
        self.comparison.as_ref()
    }

    pub fn comparison(&self) -> Option<&Comparison> {
        self.comparison.as_ref()
    }

    /// Analysis is offered only after a successful comparison.
    pub fn can_analyze(&self) -> bool {
        self.comparison.is_some()
    }

    /// One summary per filled slot, unknown names included with `N/A` stats.
    /// The server decides whether the counts are acceptable.
    pub fn analysis_request(&self) -> TradeAnalysisRequest {
        TradeAnalysisRequest {
            traded_players: self.summaries(Side::Trading),
            received_players: self.summaries(Side::Receiving),
        }
    }

    fn summaries(&self, side: Side) -> Vec<PlayerSummary> {
        self.slots(side)
            .iter()
            .map(|input| input.trim())
            .filter(|name| !name.is_empty())
            .map(|name| self.summary(name))
            .collect()
    }

    fn summary(&self, name: &str) -> PlayerSummary {
        let player = self.players.get(name);
        let stat = |fields: &[&str]| -> String {
            player
                .and_then(|p| fields.iter().find_map(|f| p.get(f).filter(|v| !v.is_empty())))
                .unwrap_or(NOT_AVAILABLE)
                .to_string()
        };

        PlayerSummary {
            name: name.to_string(),
            stats: SummaryStats {
                games_played: stat(&["games_played"]),
                minutes_per_game: stat(&["minutes_per_game"]),
                field_goal_percentage: stat(&["field_goal_percentage"]),
                points: stat(&["points_per_game", "points"]),
                rebounds: stat(&["rebounds_per_game", "rebounds"]),
                assists: stat(&["assists_per_game", "assists"]),
                turnovers: stat(&["turnovers_per_game", "turnovers"]),
                last_season_injuries: INJURY_PLACEHOLDER.to_string(),
            },
        }
    }

    /// Request an analysis. Failures become an error notification carrying
    /// the server's message.
    pub async fn analyze(&mut self, api: &PlayerApiClient) -> Option<String> {
        if !self.can_analyze() {
            self.notifications.error("Run a comparison before requesting analysis");
            return None;
        }

        match api.analyze_trade(&self.analysis_request()).await {
            Ok(text) => Some(text),
            Err(e) => {
                self.notifications.error(e.to_string());
                None
            }
        }
    }

    pub fn notifications(&self) -> &Notifications {
        &self.notifications
    }

    pub fn notifications_mut(&mut self) -> &mut Notifications {
        &mut self.notifications
    }

    pub fn player_count(&self) -> usize {
        self.names.len()
    }
}
