//! Query-string sorting for `/api/players`.

use std::cmp::Ordering;

use serde::Deserialize;

use crate::players::numeric::parse_number;
use crate::players::PlayerRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    /// Anything other than `"desc"` sorts ascending.
    pub fn from_query(order: Option<&str>) -> Self {
        match order {
            Some("desc") => SortOrder::Desc,
            _ => SortOrder::Asc,
        }
    }
}

/// Numeric key used by the API sort: missing or non-numeric counts as 0.
fn sort_key(record: &PlayerRecord, field: &str) -> f64 {
    record.number(field).unwrap_or(0.0)
}

/// Sort in place by a numeric field. Stable: ties keep their current order.
pub fn sort_by_field(players: &mut [PlayerRecord], field: &str, order: SortOrder) {
    players.sort_by(|a, b| {
        let ordering = sort_key(a, field).total_cmp(&sort_key(b, field));
        match order {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    });
}

/// Apply the optional `sort`/`order` query. Returns whether a sort happened.
///
/// A field missing from any record makes the sort a no-op.
pub fn apply_query_sort(players: &mut [PlayerRecord], sort: Option<&str>, order: Option<&str>) -> bool {
    let Some(field) = sort.filter(|f| !f.is_empty()) else {
        return false;
    };
    if players.is_empty() || !players.iter().all(|p| p.contains_field(field)) {
        return false;
    }
    sort_by_field(players, field, SortOrder::from_query(order));
    true
}

/// Comparator used by the table view: numeric when both sides are numbers,
/// text otherwise. Missing values sort before present ones.
pub fn compare_cells(a: Option<&str>, b: Option<&str>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => match (parse_number(a), parse_number(b)) {
            (Some(x), Some(y)) => x.total_cmp(&y),
            _ => a.cmp(b),
        },
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
