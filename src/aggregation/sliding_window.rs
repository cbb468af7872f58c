use super::{Bucket, PartialAggregate, Statistics, WindowConfig};
use crate::error::Result;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use std::ops::RangeInclusive;
use tracing::{debug, trace};

/// Fixed-size ring of time buckets answering sum/avg/max/min/count over a
/// trailing window.
///
/// Bucket `k` covers `[k * granularity, (k + 1) * granularity)` and lives in
/// slot `k mod N`. At instant `now` the live keys are
/// `(key(now) - N, key(now)]`, so an event is counted while it lies in the
/// half-open window `(now - window, now]` measured in whole buckets. Expired
/// buckets are reset the next time they are touched; nothing runs in the
/// background.
#[derive(Debug)]
pub struct WindowAggregator {
    config: WindowConfig,
    granularity_millis: i64,
    bucket_count: usize,
    buckets: Mutex<Box<[Bucket]>>,
}

impl WindowAggregator {
    /// Create an aggregator with every bucket empty
    pub fn new(config: WindowConfig) -> Result<Self> {
        let bucket_count = config.bucket_count()?;
        let granularity_millis = config.granularity_millis()?;
        debug!(
            window = ?config.window,
            granularity = ?config.granularity,
            bucket_count,
            "Allocated window ring"
        );
        Ok(Self {
            config,
            granularity_millis,
            bucket_count,
            buckets: Mutex::new(vec![Bucket::Empty; bucket_count].into_boxed_slice()),
        })
    }

    /// Fold `value` into the bucket `timestamp` belongs to.
    ///
    /// Callers must not pass timestamps after the current instant. Returns
    /// `false` when the event is discarded because its slot already holds a
    /// newer bucket, which only happens for events at least one full window
    /// older than data already recorded.
    pub fn record(&self, timestamp: DateTime<Utc>, value: f64) -> bool {
        let key = self.bucket_key(timestamp);
        let slot = self.slot(key);

        let mut buckets = self.buckets.lock();
        let bucket = &mut buckets[slot];
        match bucket.key() {
            Some(current) if current == key => {}
            Some(current) if current > key => {
                trace!(key, current, "Discarding event older than its slot");
                return false;
            }
            stale => {
                if let Some(old) = stale {
                    trace!(slot, old, key, "Recycling stale bucket");
                }
                bucket.restart(key, value);
                return true;
            }
        }

        if let Bucket::Populated { aggregate, .. } = bucket {
            aggregate.fold(value);
        }
        true
    }

    /// Statistics over every bucket live at `now`.
    ///
    /// Expired buckets found during the scan are reset. Buckets newer than
    /// `now` are skipped but kept, so querying a past instant loses nothing.
    pub fn snapshot(&self, now: DateTime<Utc>) -> Statistics {
        let live = self.live_range(now);
        let mut total = PartialAggregate::EMPTY;
        let mut evicted = 0usize;

        let mut buckets = self.buckets.lock();
        for bucket in buckets.iter_mut() {
            let Bucket::Populated { key, aggregate } = *bucket else {
                continue;
            };
            if key < *live.start() {
                bucket.reset();
                evicted += 1;
            } else if key <= *live.end() {
                total.merge(&aggregate);
            }
        }
        drop(buckets);

        if evicted > 0 {
            trace!(evicted, "Evicted expired buckets");
        }
        total.to_statistics()
    }

    /// Whether an event at `timestamp` is counted by `snapshot(now)`
    pub fn is_live(&self, timestamp: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        self.live_range(now).contains(&self.bucket_key(timestamp))
    }

    /// Window configuration
    pub fn config(&self) -> &WindowConfig {
        &self.config
    }

    /// Number of buckets in the ring
    pub fn bucket_count(&self) -> usize {
        self.bucket_count
    }

    fn bucket_key(&self, timestamp: DateTime<Utc>) -> i64 {
        timestamp.timestamp_millis().div_euclid(self.granularity_millis)
    }

    fn slot(&self, key: i64) -> usize {
        key.rem_euclid(self.bucket_count as i64) as usize
    }

    fn live_range(&self, now: DateTime<Utc>) -> RangeInclusive<i64> {
        let current = self.bucket_key(now);
        current.saturating_sub(self.bucket_count as i64 - 1)..=current
    }
}
