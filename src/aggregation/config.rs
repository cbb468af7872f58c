use crate::error::{Result, StatsError};
use std::time::Duration;

/// Default trailing window length
pub const DEFAULT_WINDOW: Duration = Duration::from_secs(60);

/// Default bucket width
pub const DEFAULT_GRANULARITY: Duration = Duration::from_secs(1);

/// Largest ring a window may be split into
pub const MAX_BUCKETS: u128 = 1_000_000;

/// Configuration for a bucketed sliding window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowConfig {
    /// Length of the trailing window
    pub window: Duration,
    /// Width of a single bucket
    pub granularity: Duration,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            window: DEFAULT_WINDOW,
            granularity: DEFAULT_GRANULARITY,
        }
    }
}

impl WindowConfig {
    /// Create a configuration from whole seconds
    pub fn from_secs(window_secs: u64, granularity_secs: u64) -> Self {
        Self {
            window: Duration::from_secs(window_secs),
            granularity: Duration::from_secs(granularity_secs),
        }
    }

    /// Set the window length
    pub fn with_window(mut self, window: Duration) -> Self {
        self.window = window;
        self
    }

    /// Set the bucket width
    pub fn with_granularity(mut self, granularity: Duration) -> Self {
        self.granularity = granularity;
        self
    }

    /// Bucket width in milliseconds
    pub fn granularity_millis(&self) -> Result<i64> {
        let millis = self.granularity.as_millis();
        if millis == 0 {
            return Err(StatsError::InvalidConfig(format!(
                "granularity must be at least 1ms, got {:?}",
                self.granularity
            )));
        }
        i64::try_from(millis).map_err(|_| {
            StatsError::InvalidConfig(format!("granularity {:?} is too large", self.granularity))
        })
    }

    /// Number of buckets the window is split into
    pub fn bucket_count(&self) -> Result<usize> {
        self.validate()?;
        let count = self.window.as_nanos() / self.granularity.as_nanos();
        usize::try_from(count).map_err(|_| {
            StatsError::InvalidConfig(format!("window {:?} needs too many buckets", self.window))
        })
    }

    /// Check that the window can be represented as a ring of equal buckets
    pub fn validate(&self) -> Result<()> {
        if self.window.is_zero() {
            return Err(StatsError::InvalidConfig(
                "window length must be non-zero".to_string(),
            ));
        }
        self.granularity_millis()?;
        if self.granularity.subsec_nanos() % 1_000_000 != 0 {
            return Err(StatsError::InvalidConfig(format!(
                "granularity {:?} must be a whole number of milliseconds",
                self.granularity
            )));
        }
        if self.window < self.granularity {
            return Err(StatsError::InvalidConfig(format!(
                "window {:?} is shorter than granularity {:?}",
                self.window, self.granularity
            )));
        }
        if self.window.as_nanos() % self.granularity.as_nanos() != 0 {
            return Err(StatsError::InvalidConfig(format!(
                "window {:?} is not a multiple of granularity {:?}",
                self.window, self.granularity
            )));
        }
        let buckets = self.window.as_nanos() / self.granularity.as_nanos();
        if buckets > MAX_BUCKETS {
            return Err(StatsError::InvalidConfig(format!(
                "window {:?} at granularity {:?} needs {} buckets, at most {} allowed",
                self.window, self.granularity, buckets, MAX_BUCKETS
            )));
        }
        Ok(())
    }
}
