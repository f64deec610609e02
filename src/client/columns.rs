//! Column metadata for the player table: labels, tooltips, default
//! visibility and the rating thresholds used to color stat cells.

use std::fmt;

/// Lower bounds for each rating tier, best first.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StatThresholds {
    pub elite: f64,
    pub very_good: f64,
    pub good: f64,
    pub average: f64,
    pub below_average: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatClass {
    Elite,
    VeryGood,
    Good,
    Average,
    BelowAverage,
    NotGood,
}

impl StatClass {
    pub fn css_class(self) -> &'static str {
        match self {
            StatClass::Elite => "stat-elite",
            StatClass::VeryGood => "stat-very-good",
            StatClass::Good => "stat-good",
            StatClass::Average => "stat-average",
            StatClass::BelowAverage => "stat-below-average",
            StatClass::NotGood => "stat-not-good",
        }
    }
}

impl fmt::Display for StatClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.css_class())
    }
}

impl StatThresholds {
    pub fn classify(&self, value: f64) -> StatClass {
        if value >= self.elite {
            StatClass::Elite
        } else if value >= self.very_good {
            StatClass::VeryGood
        } else if value >= self.good {
            StatClass::Good
        } else if value >= self.average {
            StatClass::Average
        } else if value >= self.below_average {
            StatClass::BelowAverage
        } else {
            StatClass::NotGood
        }
    }
}

const fn tiers(elite: f64, very_good: f64, good: f64, average: f64, below_average: f64) -> StatThresholds {
    StatThresholds {
        elite,
        very_good,
        good,
        average,
        below_average,
    }
}

const DISPLAY_NAMES: &[(&str, &str)] = &[
    ("rank", "#"),
    ("player", "Player"),
    ("pos", "Position"),
    ("team", "Team"),
    ("min", "MIN"),
    ("fgm", "FGM"),
    ("fga", "FGA"),
    ("fgp", "FG%"),
    ("fg%", "FG%"),
    ("ftm", "FTM"),
    ("fta", "FTA"),
    ("ftp", "FT%"),
    ("ft%", "FT%"),
    ("tpm", "3PTM"),
    ("3ptm", "3PTM"),
    ("pts", "PTS"),
    ("reb", "REB"),
    ("ast", "AST"),
    ("stl", "STL"),
    ("blk", "BLK"),
    ("to", "TO"),
    ("usage", "USG%"),
    ("ballhog", "Ball Hog Rating"),
    ("total", "TOTAL"),
];

/// Also the order of the column picker.
const TOOLTIPS: &[(&str, &str)] = &[
    ("rank", "Rank"),
    ("player", "Player Name"),
    ("pos", "Position"),
    ("team", "Team"),
    ("ballhog", "Ball Hog Rating"),
    ("usage", "Usage Percentage"),
    ("min", "Minutes"),
    ("fgm", "Field Goal per Minute"),
    ("fga", "Field Goal Average"),
    ("fg%", "Field Goal Percentage"),
    ("ftm", "Free Throw per Minute"),
    ("fta", "Free Throw Average"),
    ("ft%", "Free Throw Percentage"),
    ("3ptm", "Three Pointers Made"),
    ("pts", "Points"),
    ("reb", "Rebounds"),
    ("ast", "Assists"),
    ("stl", "Steals"),
    ("blk", "Blocks"),
    ("to", "Turnovers"),
    ("total", "Total Rating"),
];

const DEFAULT_COLUMNS: &[&str] = &[
    "rank", "player", "pos", "team", "min", "pts", "reb", "ast", "stl", "blk", "fg%", "ft%", "3ptm",
];

const RATINGS: &[(&str, StatThresholds)] = &[
    ("pts", tiers(27.0, 23.0, 18.0, 14.0, 10.0)),
    ("reb", tiers(12.0, 9.0, 7.0, 5.0, 3.0)),
    ("ast", tiers(9.0, 7.0, 5.0, 3.0, 2.0)),
    ("stl", tiers(2.2, 1.8, 1.4, 1.0, 0.6)),
    ("blk", tiers(2.2, 1.8, 1.4, 0.8, 0.4)),
    ("fg%", tiers(0.58, 0.53, 0.48, 0.44, 0.40)),
    ("ft%", tiers(0.90, 0.85, 0.80, 0.75, 0.70)),
    ("3ptm", tiers(3.5, 2.8, 2.2, 1.5, 1.0)),
];

const RANKING_STATS: &[&str] = &[
    "pts", "reb", "ast", "stl", "blk", "fg%", "ft%", "3ptm", "min", "usage", "ballhog",
];

/// Columns stored as fractions and shown as percentages.
const FRACTION_COLUMNS: &[&str] = &["fgp", "ftp"];

fn lookup<'a, T: Copy>(table: &'a [(&'a str, T)], key: &str) -> Option<T> {
    table.iter().find(|(k, _)| *k == key).map(|(_, v)| *v)
}

/// Everything the table controller needs to know about columns.
#[derive(Debug, Clone, Copy)]
pub struct ColumnConfig {
    pub display_names: &'static [(&'static str, &'static str)],
    pub tooltips: &'static [(&'static str, &'static str)],
    pub default_columns: &'static [&'static str],
    pub ratings: &'static [(&'static str, StatThresholds)],
    pub ranking_stats: &'static [&'static str],
    pub fraction_columns: &'static [&'static str],
}

impl Default for ColumnConfig {
    fn default() -> Self {
        Self::standard()
    }
}

impl ColumnConfig {
    /// The stock table layout.
    pub const fn standard() -> Self {
        Self {
            display_names: DISPLAY_NAMES,
            tooltips: TOOLTIPS,
            default_columns: DEFAULT_COLUMNS,
            ratings: RATINGS,
            ranking_stats: RANKING_STATS,
            fraction_columns: FRACTION_COLUMNS,
        }
    }

    /// Header label, falling back to the column key.
    pub fn display_name<'a>(&self, column: &'a str) -> &'a str {
        lookup(self.display_names, column).unwrap_or(column)
    }

    /// Long label, falling back to the column key.
    pub fn tooltip<'a>(&self, column: &'a str) -> &'a str {
        lookup(self.tooltips, column).unwrap_or(column)
    }

    /// Columns offered in the column picker.
    pub fn available_columns(&self) -> impl Iterator<Item = &'static str> {
        self.tooltips.iter().map(|(k, _)| *k)
    }

    pub fn is_fraction(&self, column: &str) -> bool {
        self.fraction_columns.contains(&column)
    }

    pub fn thresholds(&self, stat: &str) -> Option<StatThresholds> {
        lookup(self.ratings, stat)
    }

    /// Rating tier for a value, or `None` for unrated columns.
    pub fn stat_class(&self, stat: &str, value: f64) -> Option<StatClass> {
        self.thresholds(stat).map(|t| t.classify(value))
    }

    /// `(stat, label)` pairs for the stat-ranking dropdown, in picker order.
    pub fn ranking_options(&self) -> Vec<(&'static str, &'static str)> {
        self.tooltips
            .iter()
            .filter(|(k, _)| self.ranking_stats.contains(k))
            .copied()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_points_tiers() {
        let config = ColumnConfig::standard();
        assert_eq!(config.stat_class("pts", 30.1), Some(StatClass::Elite));
        assert_eq!(config.stat_class("pts", 27.0), Some(StatClass::Elite));
        assert_eq!(config.stat_class("pts", 22.9), Some(StatClass::Good));
        assert_eq!(config.stat_class("pts", 10.0), Some(StatClass::BelowAverage));
        assert_eq!(config.stat_class("pts", 4.2), Some(StatClass::NotGood));
        assert_eq!(config.stat_class("min", 36.0), None);
    }

    #[test]
    fn test_percentage_tiers_use_fractions() {
        let config = ColumnConfig::standard();
        assert_eq!(
            config.stat_class("fg%", 0.482).map(StatClass::css_class),
            Some("stat-good")
        );
        assert_eq!(
            config.stat_class("ft%", 0.91).map(StatClass::css_class),
            Some("stat-elite")
        );
    }

    #[test]
    fn test_labels_fall_back_to_key() {
        let config = ColumnConfig::standard();
        assert_eq!(config.display_name("usage"), "USG%");
        assert_eq!(config.tooltip("3ptm"), "Three Pointers Made");
        assert_eq!(config.display_name("games_played"), "games_played");
    }

    #[test]
    fn test_ranking_options_follow_picker_order() {
        let options = ColumnConfig::standard().ranking_options();
        let keys: Vec<&str> = options.iter().map(|(k, _)| *k).collect();
        assert_eq!(
            keys,
            vec!["ballhog", "usage", "min", "fg%", "ft%", "3ptm", "pts", "reb", "ast", "stl", "blk"]
        );
        assert_eq!(options[0].1, "Ball Hog Rating");
    }

    #[test]
    fn test_defaults_are_pickable() {
        let config = ColumnConfig::standard();
        let available: Vec<&str> = config.available_columns().collect();
        assert!(config.default_columns.iter().all(|c| available.contains(c)));
    }
}
