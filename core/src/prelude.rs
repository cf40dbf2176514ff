use serde::{Deserialize, Serialize};

/// Which edge of a cancelled chirp pair timestamps its RTI row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeAlignment {
    /// Edge of the later chirp in the pair.
    #[default]
    Later,
    /// Edge of the earlier chirp in the pair.
    Earlier,
    /// Midpoint between the two edges.
    Midpoint,
}

/// Immutable radar parameters shared by every processing stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RadarConfig {
    /// Chirp duration `Tp` in seconds.
    pub chirp_duration_s: f64,
    /// Sweep bandwidth `B` in Hz.
    pub bandwidth_hz: f64,
    /// Propagation speed `c` in m/s.
    pub propagation_speed_mps: f64,
    pub time_alignment: TimeAlignment,
}

impl Default for RadarConfig {
    fn default() -> Self {
        Self {
            chirp_duration_s: 20e-3,
            bandwidth_hz: 50e6,
            propagation_speed_mps: 3e8,
            time_alignment: TimeAlignment::Later,
        }
    }
}

impl RadarConfig {
    pub fn validate(&self) -> PipelineResult<()> {
        positive("chirp_duration_s", self.chirp_duration_s)?;
        positive("bandwidth_hz", self.bandwidth_hz)?;
        positive("propagation_speed_mps", self.propagation_speed_mps)?;
        Ok(())
    }

    /// Number of samples spanned by one full chirp, `N0 = floor(Tp * fs)`.
    pub fn samples_per_chirp(&self, fs: f64) -> PipelineResult<usize> {
        positive("sample_rate_hz", fs)?;
        let span = (self.chirp_duration_s * fs).floor();
        if span < 1.0 {
            return Err(PipelineError::DegenerateChirpWindow {
                fs,
                chirp_duration_s: self.chirp_duration_s,
            });
        }
        Ok(span as usize)
    }

    /// Converts a beat frequency to range: `c * Tp * f / (2 * B)`.
    pub fn beat_to_range(&self, beat_hz: f64) -> f64 {
        self.propagation_speed_mps * self.chirp_duration_s * beat_hz / (2.0 * self.bandwidth_hz)
    }

    /// Inverse of [`RadarConfig::beat_to_range`].
    pub fn range_to_beat(&self, range_m: f64) -> f64 {
        2.0 * self.bandwidth_hz * range_m / (self.propagation_speed_mps * self.chirp_duration_s)
    }
}

fn positive(name: &'static str, value: f64) -> PipelineResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(PipelineError::InvalidParameter { name, value })
    }
}

/// Fatal pipeline failures. None of these are retried.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum PipelineError {
    #[error("no rising edges detected in sync trace of {samples} samples (threshold {threshold:.4})")]
    NoEdgesDetected { threshold: f64, samples: usize },
    #[error(
        "insufficient chirps: {valid} of {raw} edges have a full {window}-sample window, need at least {required}"
    )]
    InsufficientChirps {
        valid: usize,
        raw: usize,
        required: usize,
        window: usize,
    },
    #[error("degenerate chirp window: fs {fs} Hz * Tp {chirp_duration_s} s spans less than one sample")]
    DegenerateChirpWindow { fs: f64, chirp_duration_s: f64 },
    #[error("shape mismatch: beat has {beat} samples, sync has {sync}")]
    ShapeMismatch { beat: usize, sync: usize },
    #[error("invalid parameter {name}: {value} (must be finite and positive)")]
    InvalidParameter { name: &'static str, value: f64 },
}

pub type PipelineResult<T> = Result<T, PipelineError>;
