//! Bounded latency history per target
//!
//! A fixed-capacity sliding window of recent latency samples in
//! milliseconds, oldest first. When the window is full, the oldest
//! sample is evicted.

use std::collections::VecDeque;

/// Latency samples kept per target unless configured otherwise
pub const DEFAULT_HISTORY_CAPACITY: usize = 50;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LatencyHistory {
    samples: VecDeque<u64>,
    capacity: usize,
}

impl LatencyHistory {
    pub fn new(capacity: usize) -> Self {
        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Seed a history from persisted samples, keeping only the newest
    /// `capacity` of them.
    pub fn from_samples(samples: impl IntoIterator<Item = u64>, capacity: usize) -> Self {
        let mut history = Self::new(capacity);
        for sample in samples {
            history.push(sample);
        }
        history
    }

    /// Record the sample of one probe. Failed probes pass `None` and leave
    /// the window untouched.
    pub fn record(&mut self, sample: Option<u64>) {
        if let Some(sample) = sample {
            self.push(sample);
        }
    }

    fn push(&mut self, sample: u64) {
        self.samples.push_back(sample);
        while self.samples.len() > self.capacity {
            self.samples.pop_front();
        }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn iter(&self) -> impl Iterator<Item = &u64> {
        self.samples.iter()
    }

    pub fn to_vec(&self) -> Vec<u64> {
        self.samples.iter().copied().collect()
    }
}

/// Append an optional sample to a plain history, evicting from the front
/// until it fits `capacity`.
pub fn append(history: &[u64], sample: Option<u64>, capacity: usize) -> Vec<u64> {
    let mut window = LatencyHistory::from_samples(history.iter().copied(), capacity);
    window.record(sample);
    window.to_vec()
}
