//! Running totals of time spent classifying and summarizing.

use serde::Serialize;

/// Process-wide running totals, updated once per batch, never reset
/// during a run.
///
/// Owned exclusively by the controller; under the one-batch-in-flight
/// model no locking is needed. If batch processing is ever pipelined,
/// these additions must become atomic.
#[derive(Debug, Default)]
pub struct MetricsAccumulator {
    classification_ms: u64,
    summarization_ms: u64,
}

impl MetricsAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_classification(&mut self, ms: u64) {
        self.classification_ms += ms;
    }

    pub fn add_summarization(&mut self, ms: u64) {
        self.summarization_ms += ms;
    }

    /// Current totals, without resetting them.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            classification_ms: self.classification_ms,
            summarization_ms: self.summarization_ms,
        }
    }
}

/// Point-in-time view of the cumulative totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub classification_ms: u64,
    pub summarization_ms: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn totals_accumulate_without_reset() {
        let mut metrics = MetricsAccumulator::new();
        metrics.add_classification(5);
        metrics.add_summarization(2);
        let first = metrics.snapshot();
        assert_eq!(first.classification_ms, 5);
        assert_eq!(first.summarization_ms, 2);

        metrics.add_classification(3);
        let second = metrics.snapshot();
        assert_eq!(second.classification_ms, 8);
        assert_eq!(second.summarization_ms, 2);
        // snapshot() does not reset
        assert_eq!(metrics.snapshot(), second);
    }

    #[test]
    fn totals_are_monotonic() {
        let mut metrics = MetricsAccumulator::new();
        let mut previous = metrics.snapshot();
        for ms in [0, 1, 10, 0, 7] {
            metrics.add_classification(ms);
            metrics.add_summarization(ms);
            let current = metrics.snapshot();
            assert!(current.classification_ms >= previous.classification_ms);
            assert!(current.summarization_ms >= previous.summarization_ms);
            previous = current;
        }
    }
}
