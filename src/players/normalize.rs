//! Raw sheet grid → player records.
//!
//! Row 0 is the header. Each header becomes a canonical key (lowercase,
//! spaces to underscores) and every data row is zipped against those keys.
//! A short row leaves its trailing fields `null`; duplicate canonical keys
//! collapse, the later column winning.

use thiserror::Error;
use tracing::debug;

use crate::players::numeric::format_fixed;
use crate::players::{PlayerCollection, PlayerRecord};

/// Stat fields reformatted to fixed precision.
pub const NUMERIC_FIELDS: &[&str] = &[
    "games_played",
    "minutes_per_game",
    "points",
    "rebounds",
    "assists",
    "steals",
    "blocks",
    "turnovers",
    "field_goal_percentage",
];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum NormalizeError {
    #[error("Invalid or empty sheet data ({rows} rows, need a header and at least one player)")]
    TooShort { rows: usize },
}

/// Canonical field key for a header cell.
pub fn canonical_key(header: &str) -> String {
    header.to_lowercase().replace(' ', "_")
}

/// Decimal places for an allow-listed stat field.
fn precision(field: &str) -> u32 {
    if field.contains("percentage") {
        1
    } else {
        2
    }
}

/// Fixed-precision formatting for allow-listed fields. Empty, missing and
/// non-numeric values pass through untouched.
pub fn format_stat(field: &str, raw: Option<&str>) -> Option<String> {
    let raw = raw?;
    if raw.is_empty() || !NUMERIC_FIELDS.contains(&field) {
        return Some(raw.to_string());
    }
    Some(format_fixed(raw, precision(field)).unwrap_or_else(|| raw.to_string()))
}

/// Build a player collection from a sheet grid.
pub fn normalize_grid(grid: &[Vec<String>]) -> Result<PlayerCollection, NormalizeError> {
    if grid.len() < 2 {
        return Err(NormalizeError::TooShort { rows: grid.len() });
    }

    let headers: Vec<String> = grid[0].iter().map(|h| canonical_key(h)).collect();

    let players: PlayerCollection = grid[1..]
        .iter()
        .map(|row| normalize_row(&headers, row))
        .collect();

    debug!(
        fields = headers.len(),
        players = players.len(),
        "Normalized sheet grid"
    );

    Ok(players)
}

fn normalize_row(headers: &[String], row: &[String]) -> PlayerRecord {
    let mut record = PlayerRecord::new();
    for (index, header) in headers.iter().enumerate() {
        let raw = row.get(index).map(String::as_str);
        record.insert(header.clone(), format_stat(header, raw));
    }
    record
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(rows: &[&[&str]]) -> Vec<Vec<String>> {
        rows.iter()
            .map(|row| row.iter().map(|c| c.to_string()).collect())
            .collect()
    }

    #[test]
    fn test_canonical_key() {
        assert_eq!(canonical_key("Games Played"), "games_played");
        assert_eq!(canonical_key("FG%"), "fg%");
        assert_eq!(canonical_key("Field Goal  Percentage"), "field_goal__percentage");
    }

    #[test]
    fn test_single_row_scenario() {
        let players =
            normalize_grid(&grid(&[&["Player", "Team", "Pos", "Points"], &["A", "BOS", "PG", "20.145"]]))
                .unwrap();

        assert_eq!(players.len(), 1);
        let json = serde_json::to_value(&players[0]).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"player": "A", "team": "BOS", "pos": "PG", "points": "20.15"})
        );
    }

    #[test]
    fn test_percentage_uses_one_decimal() {
        let players = normalize_grid(&grid(&[
            &["Player", "Field Goal Percentage", "Games Played"],
            &["A", "47.25", "70"],
        ]))
        .unwrap();
        assert_eq!(players[0].get("field_goal_percentage"), Some("47.3"));
        assert_eq!(players[0].get("games_played"), Some("70.00"));
    }

    #[test]
    fn test_unlisted_fields_are_not_formatted() {
        let players =
            normalize_grid(&grid(&[&["Player", "PTS"], &["A", "20.145"]])).unwrap();
        assert_eq!(players[0].get("pts"), Some("20.145"));
    }

    #[test]
    fn test_non_numeric_stat_passes_through() {
        let players = normalize_grid(&grid(&[&["Player", "Points"], &["A", "DNP"], &["B", ""]])).unwrap();
        assert_eq!(players[0].get("points"), Some("DNP"));
        assert_eq!(players[1].get("points"), Some(""));
    }

    #[test]
    fn test_short_row_yields_missing_fields() {
        let players = normalize_grid(&grid(&[
            &["Player", "Team", "Points"],
            &["A", "BOS"],
            &["B", "LAL", "10"],
        ]))
        .unwrap();

        assert!(players[0].contains_field("points"));
        assert_eq!(players[0].get("points"), None);
        assert_eq!(players[0].display("points"), "N/A");
        assert_eq!(players[1].get("points"), Some("10.00"));
    }

    #[test]
    fn test_every_record_has_header_key_set() {
        let players = normalize_grid(&grid(&[
            &["Rank", "Player", "Team", "Games Played"],
            &["1", "A"],
            &["2", "B", "LAL", "12", "extra"],
            &[],
        ]))
        .unwrap();

        let expected = vec!["rank", "player", "team", "games_played"];
        for player in &players {
            let fields: Vec<&str> = player.fields().collect();
            assert_eq!(fields, expected);
        }
    }

    #[test]
    fn test_duplicate_headers_later_column_wins() {
        let players =
            normalize_grid(&grid(&[&["Player", "Team", "team"], &["A", "BOS", "LAL"]])).unwrap();
        assert_eq!(players[0].len(), 2);
        assert_eq!(players[0].get("team"), Some("LAL"));
    }

    #[test]
    fn test_header_only_grid_is_an_error() {
        assert_eq!(
            normalize_grid(&grid(&[&["Player"]])),
            Err(NormalizeError::TooShort { rows: 1 })
        );
        assert_eq!(normalize_grid(&[]), Err(NormalizeError::TooShort { rows: 0 }));
    }
}
