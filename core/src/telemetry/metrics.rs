use std::sync::Mutex;

/// Counters shared across repeated pipeline runs.
pub struct MetricsRecorder {
    inner: Mutex<Metrics>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub captures: usize,
    pub failures: usize,
    pub chirps: usize,
}

#[derive(Default)]
struct Metrics {
    captures: usize,
    failures: usize,
    chirps: usize,
}

impl MetricsRecorder {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Metrics::default()),
        }
    }

    pub fn record_capture(&self, chirps: usize) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.captures += 1;
            metrics.chirps += chirps;
        }
    }

    pub fn record_failure(&self) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.failures += 1;
        }
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        if let Ok(metrics) = self.inner.lock() {
            MetricsSnapshot {
                captures: metrics.captures,
                failures: metrics.failures,
                chirps: metrics.chirps,
            }
        } else {
            MetricsSnapshot::default()
        }
    }
}

impl Default for MetricsRecorder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recorder_accumulates_counts() {
        let recorder = MetricsRecorder::new();
        recorder.record_capture(49);
        recorder.record_capture(10);
        recorder.record_failure();
        assert_eq!(
            recorder.snapshot(),
            MetricsSnapshot {
                captures: 2,
                failures: 1,
                chirps: 59
            }
        );
    }
}
