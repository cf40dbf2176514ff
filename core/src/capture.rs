use crate::prelude::{PipelineError, PipelineResult};
use serde::{Deserialize, Serialize};

/// Sample rate reported by the acquisition device after negotiation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CaptureResult {
    pub achieved_fs: f64,
    /// True when the device could not honour the requested rate.
    pub was_coerced: bool,
}

impl CaptureResult {
    pub fn exact(fs: f64) -> Self {
        Self {
            achieved_fs: fs,
            was_coerced: false,
        }
    }
}

/// Validated beat/sync pair sharing one sample rate. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct CapturedWaveforms {
    beat: Vec<f64>,
    sync: Vec<f64>,
    capture: CaptureResult,
}

impl CapturedWaveforms {
    pub fn new(beat: Vec<f64>, sync: Vec<f64>, capture: CaptureResult) -> PipelineResult<Self> {
        if beat.len() != sync.len() {
            return Err(PipelineError::ShapeMismatch {
                beat: beat.len(),
                sync: sync.len(),
            });
        }
        if !(capture.achieved_fs.is_finite() && capture.achieved_fs > 0.0) {
            return Err(PipelineError::InvalidParameter {
                name: "sample_rate_hz",
                value: capture.achieved_fs,
            });
        }
        Ok(Self {
            beat,
            sync,
            capture,
        })
    }

    pub fn beat(&self) -> &[f64] {
        &self.beat
    }

    pub fn sync(&self) -> &[f64] {
        &self.sync
    }

    pub fn fs(&self) -> f64 {
        self.capture.achieved_fs
    }

    pub fn capture(&self) -> CaptureResult {
        self.capture
    }

    pub fn len(&self) -> usize {
        self.beat.len()
    }

    pub fn is_empty(&self) -> bool {
        self.beat.is_empty()
    }

    pub fn duration_s(&self) -> f64 {
        self.len() as f64 / self.fs()
    }

    /// Leading `max_samples` of both traces with `t[i] = i / fs`.
    pub fn diagnostic_trace(&self, max_samples: usize) -> DiagnosticTrace {
        let count = max_samples.min(self.len());
        let fs = self.fs();
        DiagnosticTrace {
            time_s: (0..count).map(|i| i as f64 / fs).collect(),
            beat: self.beat[..count].to_vec(),
            sync: self.sync[..count].to_vec(),
        }
    }
}

/// Time-domain slice of a capture handed to the renderer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DiagnosticTrace {
    pub time_s: Vec<f64>,
    pub beat: Vec<f64>,
    pub sync: Vec<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mismatched_lengths_are_rejected() {
        let err = CapturedWaveforms::new(vec![0.0; 4], vec![0.0; 3], CaptureResult::exact(10.0))
            .unwrap_err();
        assert_eq!(err, PipelineError::ShapeMismatch { beat: 4, sync: 3 });
    }

    #[test]
    fn non_positive_rate_is_rejected() {
        let err = CapturedWaveforms::new(vec![0.0; 2], vec![0.0; 2], CaptureResult::exact(0.0))
            .unwrap_err();
        assert!(matches!(err, PipelineError::InvalidParameter { .. }));
    }

    #[test]
    fn diagnostic_trace_uses_sample_period() {
        let capture = CapturedWaveforms::new(
            vec![1.0, 2.0, 3.0],
            vec![0.0, 1.0, 0.0],
            CaptureResult::exact(4.0),
        )
        .unwrap();
        let trace = capture.diagnostic_trace(10);
        assert_eq!(trace.time_s, vec![0.0, 0.25, 0.5]);
        assert_eq!(trace.beat, vec![1.0, 2.0, 3.0]);
        assert_eq!(capture.duration_s(), 0.75);
    }
}
