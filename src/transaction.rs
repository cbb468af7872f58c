use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single timestamped amount
///
/// On the wire the timestamp is epoch milliseconds:
/// `{"timestamp": 1704067200000, "amount": 12.3}`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// When the transaction happened
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub timestamp: DateTime<Utc>,
    /// Transaction amount
    pub amount: f64,
}

impl Transaction {
    /// Create a transaction
    pub fn new(timestamp: DateTime<Utc>, amount: f64) -> Self {
        Self { timestamp, amount }
    }
}
