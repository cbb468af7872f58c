use serde::{Deserialize, Serialize};

/// Bucketed sliding window over timestamped values
pub mod sliding_window;
/// Per-bucket partial aggregates
pub mod bucket;
/// Configuration types for the window
pub mod config;

pub use bucket::{Bucket, PartialAggregate};
pub use config::WindowConfig;
pub use sliding_window::WindowAggregator;

/// Summary of the values recorded inside the current window
///
/// All fields are zero when no value is in the window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Statistics {
    /// Sum of amounts
    pub sum: f64,
    /// Mean amount
    pub avg: f64,
    /// Largest amount
    pub max: f64,
    /// Smallest amount
    pub min: f64,
    /// Number of transactions
    pub count: u64,
}

impl Statistics {
    /// Whether no transaction contributed
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}
