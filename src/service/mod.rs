//! Transaction service: admission rules in front of the window aggregator

use crate::aggregation::{Statistics, WindowAggregator, WindowConfig};
use crate::clock::{Clock, SystemClock};
use crate::error::{Result, StatsError};
use crate::transaction::Transaction;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::debug;

/// Service configuration loaded from TOML
pub mod config;

/// Axum HTTP transport
#[cfg(feature = "service")]
pub mod http;

pub use config::{HttpConfig, ServiceConfig, WindowSettings};
#[cfg(feature = "service")]
pub use http::{HttpServer, HttpService, StatisticsResponse};

/// Outcome of a successful submission
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    /// Recorded and counted by the current window
    Recorded,
    /// Accepted, but already outside the current window
    Expired,
}

/// Counters kept by the service
#[derive(Debug, Default)]
struct ServiceMetrics {
    transactions_recorded: AtomicU64,
    transactions_expired: AtomicU64,
    transactions_rejected: AtomicU64,
    statistics_requests: AtomicU64,
}

impl ServiceMetrics {
    fn record_admission(&self, admission: Admission) {
        let counter = match admission {
            Admission::Recorded => &self.transactions_recorded,
            Admission::Expired => &self.transactions_expired,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    fn record_rejection(&self) {
        self.transactions_rejected.fetch_add(1, Ordering::Relaxed);
    }

    fn record_statistics_request(&self) {
        self.statistics_requests.fetch_add(1, Ordering::Relaxed);
    }

    fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            transactions_recorded: self.transactions_recorded.load(Ordering::Relaxed),
            transactions_expired: self.transactions_expired.load(Ordering::Relaxed),
            transactions_rejected: self.transactions_rejected.load(Ordering::Relaxed),
            statistics_requests: self.statistics_requests.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time copy of the service counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    /// Submissions counted by the window at admission time
    pub transactions_recorded: u64,
    /// Submissions accepted but already outside the window
    pub transactions_expired: u64,
    /// Submissions rejected by validation
    pub transactions_rejected: u64,
    /// Statistics reads served
    pub statistics_requests: u64,
}

/// Thin front for [`WindowAggregator`] applying the admission rules
#[derive(Clone, Debug)]
pub struct TransactionService {
    aggregator: Arc<WindowAggregator>,
    clock: Arc<dyn Clock>,
    metrics: Arc<ServiceMetrics>,
    start_time: Instant,
}

impl TransactionService {
    /// Create a service reading time from the system clock
    pub fn new(aggregator: Arc<WindowAggregator>) -> Self {
        Self::with_clock(aggregator, Arc::new(SystemClock))
    }

    /// Create a service reading time from `clock`
    pub fn with_clock(aggregator: Arc<WindowAggregator>, clock: Arc<dyn Clock>) -> Self {
        Self {
            aggregator,
            clock,
            metrics: Arc::new(ServiceMetrics::default()),
            start_time: Instant::now(),
        }
    }

    /// Build the aggregator from `config` and wrap it with the system clock
    pub fn from_config(config: WindowConfig) -> Result<Self> {
        Ok(Self::new(Arc::new(WindowAggregator::new(config)?)))
    }

    /// Admit a transaction.
    ///
    /// Future timestamps and non-finite amounts are rejected without touching
    /// the window. Anything else is forwarded, however old.
    pub fn submit(&self, timestamp: DateTime<Utc>, amount: f64) -> Result<Admission> {
        if !amount.is_finite() {
            self.metrics.record_rejection();
            return Err(StatsError::InvalidAmount(amount));
        }

        let now = self.clock.now();
        if timestamp > now {
            self.metrics.record_rejection();
            debug!(%timestamp, %now, "Rejected future transaction");
            return Err(StatsError::FutureTimestamp { timestamp, now });
        }

        // A discarded event is older than data already in its slot, so it is
        // outside the window at `now` as well; `is_live` covers both cases.
        let folded = self.aggregator.record(timestamp, amount);
        let admission = if folded && self.aggregator.is_live(timestamp, now) {
            Admission::Recorded
        } else {
            Admission::Expired
        };
        if !folded {
            debug!(%timestamp, "Transaction older than its bucket slot was discarded");
        }
        self.metrics.record_admission(admission);
        Ok(admission)
    }

    /// Admit a deserialized transaction
    pub fn submit_transaction(&self, transaction: &Transaction) -> Result<Admission> {
        self.submit(transaction.timestamp, transaction.amount)
    }

    /// Statistics over the window ending now
    pub fn current_statistics(&self) -> Statistics {
        self.metrics.record_statistics_request();
        self.aggregator.snapshot(self.clock.now())
    }

    /// Current counter values
    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    /// Time since the service was created
    pub fn uptime(&self) -> Duration {
        self.start_time.elapsed()
    }

    /// Underlying aggregator
    pub fn aggregator(&self) -> &Arc<WindowAggregator> {
        &self.aggregator
    }
}
