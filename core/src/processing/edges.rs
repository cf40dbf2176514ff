use crate::math::stats::StatsHelper;
use crate::prelude::{PipelineError, PipelineResult};
use crate::telemetry::log::LogManager;

/// Minimum number of full chirp windows the two-pulse canceller needs.
pub const MIN_CHIRPS: usize = 2;

/// Rising edges found in a sync trace.
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeSet {
    /// Midpoint threshold the trace was compared against.
    pub threshold: f64,
    /// Ascending sample indices of every low-to-high crossing.
    pub raw: Vec<usize>,
}

impl EdgeSet {
    /// Keeps edges followed by a complete `window`-sample chirp in a
    /// `length`-sample capture, `i + window <= length`.
    pub fn valid(&self, window: usize, length: usize) -> Vec<usize> {
        self.raw
            .iter()
            .copied()
            .filter(|&index| index + window <= length)
            .collect()
    }
}

/// Finds chirp starts as midpoint-threshold rising edges of the sync pulse.
pub struct EdgeDetector {
    logger: LogManager,
}

impl EdgeDetector {
    pub fn new() -> Self {
        Self {
            logger: LogManager::new("edge-detector"),
        }
    }

    /// Reports every index `i` where `sync[i] > thr` and `sync[i - 1] <= thr`.
    ///
    /// Index 0 never reports an edge, even when the trace starts high.
    pub fn detect(&self, sync: &[f64]) -> PipelineResult<EdgeSet> {
        let threshold = StatsHelper::extrema(sync)
            .map(|(lo, hi)| (hi + lo) / 2.0)
            .unwrap_or(0.0);

        let mut raw = Vec::new();
        let mut was_above = true;
        for (index, &value) in sync.iter().enumerate() {
            let above = value > threshold;
            if above && !was_above {
                raw.push(index);
            }
            was_above = above;
        }

        self.logger.record(&format!(
            "{} rising edges (threshold {:.4})",
            raw.len(),
            threshold
        ));
        self.logger.detail(|| format!("edge indices {:?}", raw));

        if raw.is_empty() {
            return Err(PipelineError::NoEdgesDetected {
                threshold,
                samples: sync.len(),
            });
        }
        Ok(EdgeSet { threshold, raw })
    }

    /// Runs [`EdgeDetector::detect`] and keeps edges with a full chirp window.
    ///
    /// Fails with `InsufficientChirps` when fewer than two edges survive.
    pub fn detect_valid(
        &self,
        sync: &[f64],
        window: usize,
    ) -> PipelineResult<(EdgeSet, Vec<usize>)> {
        let edges = self.detect(sync)?;
        let valid = edges.valid(window, sync.len());
        let dropped = edges.raw.len() - valid.len();
        if dropped > 0 {
            self.logger.caution(&format!(
                "dropped {} trailing edge(s) without a full {}-sample window",
                dropped, window
            ));
        }
        if valid.len() < MIN_CHIRPS {
            return Err(PipelineError::InsufficientChirps {
                valid: valid.len(),
                raw: edges.raw.len(),
                required: MIN_CHIRPS,
                window,
            });
        }
        self.logger.record(&format!("{} valid chirp edges", valid.len()));
        Ok((edges, valid))
    }
}

impl Default for EdgeDetector {
    fn default() -> Self {
        Self::new()
    }
}
