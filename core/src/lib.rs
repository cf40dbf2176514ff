//! Core signal-processing pipeline for FMCW range-time-intensity (RTI) analysis.
//!
//! A capture is a synchronously sampled pair of waveforms: the radar beat
//! signal and the chirp-sync pulse train. The pipeline finds chirp starts in
//! the sync trace, cuts one fixed-length window of beat samples per chirp,
//! cancels static clutter by differencing consecutive chirps, and transforms
//! each difference row into a range profile with physical range and time axes.

pub mod capture;
pub mod math;
pub mod prelude;
pub mod processing;
pub mod telemetry;

pub use capture::{CaptureResult, CapturedWaveforms};
pub use prelude::{PipelineError, PipelineResult, RadarConfig, TimeAlignment};
pub use processing::{PipelineOutput, RtiPipeline};
