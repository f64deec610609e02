//! Player records as served by `/api/players`.

pub mod normalize;
pub mod numeric;
pub mod sort;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Canonical key of the player's full name, the de facto identity field.
pub const PLAYER_FIELD: &str = "player";

/// Display text for a field the sheet row did not provide.
pub const NOT_AVAILABLE: &str = "N/A";

/// One sheet row keyed by canonical field name.
///
/// Values are strings, or `null` when the row was shorter than the header.
/// Key order follows the header row.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerRecord(Map<String, Value>);

/// Ordered sequence of records, sheet row order unless sorted.
pub type PlayerCollection = Vec<PlayerRecord>;

impl PlayerRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a field. A later insert of the same key overwrites the value.
    pub fn insert(&mut self, field: impl Into<String>, value: Option<String>) {
        let value = value.map(Value::String).unwrap_or(Value::Null);
        self.0.insert(field.into(), value);
    }

    /// Text value of a field; `None` when the field is absent or missing.
    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).and_then(Value::as_str)
    }

    /// Numeric value using `parseFloat` leniency. JSON numbers are accepted
    /// too, for records that did not come from the normalizer.
    pub fn number(&self, field: &str) -> Option<f64> {
        match self.0.get(field)? {
            Value::String(s) => numeric::parse_float(s),
            Value::Number(n) => n.as_f64(),
            _ => None,
        }
    }

    /// Same leniency as [`number`](Self::number), kept exact for summing.
    pub fn decimal(&self, field: &str) -> Option<Decimal> {
        match self.0.get(field)? {
            Value::String(s) => numeric::parse_float_decimal(s),
            Value::Number(n) => numeric::parse_float_decimal(&n.to_string()),
            _ => None,
        }
    }

    /// Text for display: the value, or the not-available sentinel.
    pub fn display(&self, field: &str) -> String {
        match self.0.get(field) {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Number(n)) => n.to_string(),
            _ => NOT_AVAILABLE.to_string(),
        }
    }

    pub fn contains_field(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn name(&self) -> Option<&str> {
        self.get(PLAYER_FIELD)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for PlayerRecord {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut record = PlayerRecord::new();
        for (k, v) in iter {
            record.insert(k, Some(v.into()));
        }
        record
    }
}
