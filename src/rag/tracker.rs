//! Running query statistics
//!
//! Accuracy and time reduction are heuristic estimates: accuracy is derived
//! from the top retrieval score and time reduction is measured against a
//! fixed baseline, not against a real pre-optimisation system.

use std::sync::Mutex;
use std::time::Duration;

use serde::Serialize;

/// Reported accuracy (percent) before any sample is recorded
pub const DEFAULT_ACCURACY_PCT: f64 = 92.0;

/// Accuracy estimate for a query whose best document scored `top_score`
pub fn estimate_accuracy(top_score: f32) -> f64 {
    if top_score > 0.7 {
        0.95
    } else if top_score > 0.5 {
        0.90
    } else {
        0.85
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PerformanceStats {
    pub total_queries: u64,
    pub successful_queries: u64,
    /// Percent
    pub success_rate: f64,
    /// Seconds
    pub avg_query_time: f64,
    /// Percent, clamped to [0, 100]
    pub time_reduction: f64,
    /// Percent
    pub accuracy: f64,
}

#[derive(Debug, Default)]
struct Counters {
    total_queries: u64,
    successful_queries: u64,
    total_time_secs: f64,
    accuracy_sum: f64,
    accuracy_samples: u64,
}

/// Thread-safe accumulator shared by concurrent requests
#[derive(Debug)]
pub struct PerformanceTracker {
    baseline_secs: f64,
    counters: Mutex<Counters>,
}

impl PerformanceTracker {
    pub fn new(baseline_secs: f64) -> Self {
        Self {
            baseline_secs,
            counters: Mutex::new(Counters::default()),
        }
    }

    pub fn record(&self, duration: Duration, succeeded: bool, accuracy: Option<f64>) {
        let mut counters = self
            .counters
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        counters.total_queries += 1;
        counters.total_time_secs += duration.as_secs_f64();
        if succeeded {
            counters.successful_queries += 1;
        }
        if let Some(accuracy) = accuracy {
            counters.accuracy_sum += accuracy;
            counters.accuracy_samples += 1;
        }
    }

    pub fn stats(&self) -> PerformanceStats {
        let counters = self
            .counters
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);

        let (success_rate, avg_query_time, time_reduction) = if counters.total_queries == 0 {
            (0.0, 0.0, 0.0)
        } else {
            let total = counters.total_queries as f64;
            let avg = counters.total_time_secs / total;
            let reduction = (self.baseline_secs - avg) / self.baseline_secs * 100.0;
            (
                counters.successful_queries as f64 / total * 100.0,
                avg,
                reduction.clamp(0.0, 100.0),
            )
        };

        let accuracy = if counters.accuracy_samples == 0 {
            DEFAULT_ACCURACY_PCT
        } else {
            counters.accuracy_sum / counters.accuracy_samples as f64 * 100.0
        };

        PerformanceStats {
            total_queries: counters.total_queries,
            successful_queries: counters.successful_queries,
            success_rate,
            avg_query_time,
            time_reduction,
            accuracy,
        }
    }
}

impl Default for PerformanceTracker {
    fn default() -> Self {
        Self::new(10.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_stats() {
        let stats = PerformanceTracker::default().stats();
        assert_eq!(stats.total_queries, 0);
        assert_eq!(stats.success_rate, 0.0);
        assert_eq!(stats.time_reduction, 0.0);
        assert_eq!(stats.accuracy, DEFAULT_ACCURACY_PCT);
    }

    #[test]
    fn test_recorded_stats() {
        let tracker = PerformanceTracker::new(10.0);
        tracker.record(Duration::from_secs(1), true, Some(0.95));
        tracker.record(Duration::from_secs(3), false, None);

        let stats = tracker.stats();
        assert_eq!(stats.total_queries, 2);
        assert_eq!(stats.successful_queries, 1);
        assert!((stats.success_rate - 50.0).abs() < 1e-9);
        assert!((stats.avg_query_time - 2.0).abs() < 1e-9);
        assert!((stats.time_reduction - 80.0).abs() < 1e-9);
        assert!((stats.accuracy - 95.0).abs() < 1e-9);
    }

    #[test]
    fn test_time_reduction_is_clamped() {
        let tracker = PerformanceTracker::new(1.0);
        tracker.record(Duration::from_secs(5), true, None);
        assert_eq!(tracker.stats().time_reduction, 0.0);
    }

    #[test]
    fn test_accuracy_thresholds() {
        assert_eq!(estimate_accuracy(0.71), 0.95);
        assert_eq!(estimate_accuracy(0.7), 0.90);
        assert_eq!(estimate_accuracy(0.51), 0.90);
        assert_eq!(estimate_accuracy(0.5), 0.85);
        assert_eq!(estimate_accuracy(12.0), 0.95);
    }

    #[test]
    fn test_concurrent_records_are_not_lost() {
        let tracker = std::sync::Arc::new(PerformanceTracker::default());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let tracker = tracker.clone();
                std::thread::spawn(move || {
                    for _ in 0..100 {
                        tracker.record(Duration::from_millis(1), true, Some(0.9));
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(tracker.stats().total_queries, 800);
    }
}
