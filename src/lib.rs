//! Sliding-window transaction statistics
//!
//! This library keeps sum, average, maximum, minimum and count over the
//! transactions of a trailing time window (60 seconds by default). Values are
//! folded into a fixed ring of time buckets, so memory stays constant no
//! matter how many transactions arrive, and expired buckets are dropped
//! lazily when touched instead of by a background sweeper.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use txstats::{TransactionService, WindowAggregator, WindowConfig};
//!
//! # fn example() -> txstats::Result<()> {
//! let aggregator = Arc::new(WindowAggregator::new(WindowConfig::from_secs(60, 1))?);
//! let service = TransactionService::new(aggregator);
//!
//! service.submit(chrono::Utc::now(), 12.3)?;
//!
//! let stats = service.current_statistics();
//! tracing::info!("sum={} count={}", stats.sum, stats.count);
//! # Ok(())
//! # }
//! ```
//!
//! # HTTP service
//!
//! ```no_run
//! use txstats::{HttpServer, ServiceConfig, TransactionService};
//!
//! # async fn example() -> txstats::Result<()> {
//! let config = ServiceConfig::default();
//! let service = TransactionService::from_config(config.window_config()?)?;
//!
//! HttpServer::new(service, config.http)?
//!     .run(async {
//!         let _ = tokio::signal::ctrl_c().await;
//!     })
//!     .await?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::all)]

// Re-export commonly used items
pub use aggregation::{Statistics, WindowAggregator, WindowConfig};
pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{Result, StatsError};
pub use service::{Admission, MetricsSnapshot, ServiceConfig, TransactionService};
#[cfg(feature = "service")]
pub use service::{HttpServer, HttpService, StatisticsResponse};
pub use transaction::Transaction;

/// Bucketed sliding-window aggregation
pub mod aggregation;

/// Time sources
pub mod clock;

/// Error types
pub mod error;

/// Service layer and HTTP transport
pub mod service;

/// Transaction event type
pub mod transaction;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize the tracing subscriber.
///
/// `RUST_LOG` takes precedence; otherwise events at `default_level` and above
/// are emitted. `json` switches the output to one JSON object per line.
pub fn init_tracing(json: bool, default_level: tracing::Level) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level.as_str().to_lowercase()));
    let registry = tracing_subscriber::registry().with(filter);

    if json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_matches_manifest() {
        assert_eq!(VERSION, env!("CARGO_PKG_VERSION"));
        assert!(!VERSION.is_empty());
    }
}
