use super::Statistics;

/// Folded sum/count/max/min over a set of values
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PartialAggregate {
    /// Sum of folded values
    pub sum: f64,
    /// Number of folded values
    pub count: u64,
    /// Largest folded value, `-inf` when empty
    pub max: f64,
    /// Smallest folded value, `+inf` when empty
    pub min: f64,
}

impl PartialAggregate {
    /// Aggregate with nothing folded in
    pub const EMPTY: PartialAggregate = PartialAggregate {
        sum: 0.0,
        count: 0,
        max: f64::NEG_INFINITY,
        min: f64::INFINITY,
    };

    /// Fold a single value
    #[inline]
    pub fn fold(&mut self, value: f64) {
        self.sum += value;
        self.count += 1;
        self.max = self.max.max(value);
        self.min = self.min.min(value);
    }

    /// Fold another partial aggregate
    #[inline]
    pub fn merge(&mut self, other: &PartialAggregate) {
        if other.count == 0 {
            return;
        }
        self.sum += other.sum;
        self.count += other.count;
        self.max = self.max.max(other.max);
        self.min = self.min.min(other.min);
    }

    /// Whether nothing has been folded in
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Finalize into statistics, clamping the empty case to zeros
    pub fn to_statistics(&self) -> Statistics {
        if self.is_empty() {
            return Statistics::default();
        }
        Statistics {
            sum: self.sum,
            avg: self.sum / self.count as f64,
            max: self.max,
            min: self.min,
            count: self.count,
        }
    }
}

impl Default for PartialAggregate {
    fn default() -> Self {
        Self::EMPTY
    }
}

/// One slot of the ring: empty, or populated for a specific bucket key
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Bucket {
    /// Never written, or reset after going stale
    #[default]
    Empty,
    /// Holds the partial aggregate for the time slice `key`
    Populated {
        /// `floor(timestamp / granularity)` of every folded event
        key: i64,
        /// Folded values for this time slice
        aggregate: PartialAggregate,
    },
}

impl Bucket {
    /// Key of the time slice this bucket represents, if any
    pub fn key(&self) -> Option<i64> {
        match self {
            Bucket::Empty => None,
            Bucket::Populated { key, .. } => Some(*key),
        }
    }

    /// Reset to empty
    pub fn reset(&mut self) {
        *self = Bucket::Empty;
    }

    /// Start a fresh time slice and fold its first value
    pub fn restart(&mut self, key: i64, value: f64) {
        let mut aggregate = PartialAggregate::EMPTY;
        aggregate.fold(value);
        *self = Bucket::Populated { key, aggregate };
    }
}
