use crate::generator::template::{chirp_timing, tone};
use fmcwcore::prelude::RadarConfig;
use fmcwcore::CaptureResult;
use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Configuration for generating a synthetic beat/sync capture.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub duration_s: f64,
    /// Time of the first rising sync edge.
    pub sync_offset_s: f64,
    /// Fraction of each chirp period the sync pulse stays high.
    pub sync_duty: f64,
    pub sync_high_v: f64,
    pub sync_low_v: f64,
    /// Static reflector range and amplitude.
    pub clutter_range_m: f64,
    pub clutter_amplitude: f64,
    /// Moving reflector range at capture start, radial velocity and amplitude.
    pub target_range_m: f64,
    pub target_velocity_mps: f64,
    pub target_amplitude: f64,
    /// RF carrier used for the per-chirp target phase.
    pub carrier_hz: f64,
    pub noise: f64,
    pub seed: u64,
    /// Rates the simulated device accepts; empty accepts any rate.
    pub supported_rates_hz: Vec<f64>,
    pub description: Option<String>,
    pub scenario: Option<String>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            duration_s: 1.0,
            sync_offset_s: 0.01,
            sync_duty: 0.1,
            sync_high_v: 3.3,
            sync_low_v: 0.0,
            clutter_range_m: 6.0,
            clutter_amplitude: 1.0,
            target_range_m: 12.0,
            target_velocity_mps: 2.0,
            target_amplitude: 0.5,
            carrier_hz: 2.4e9,
            noise: 0.01,
            seed: 0,
            supported_rates_hz: Vec::new(),
            description: None,
            scenario: None,
        }
    }
}

/// Picks the device rate for a request: the request itself when supported,
/// otherwise the nearest supported rate.
pub fn negotiate_rate(requested_fs: f64, supported: &[f64]) -> CaptureResult {
    let nearest = supported
        .iter()
        .copied()
        .min_by(|a, b| (a - requested_fs).abs().total_cmp(&(b - requested_fs).abs()));
    match nearest {
        Some(rate) if (rate - requested_fs).abs() > f64::EPSILON * requested_fs.abs() => {
            CaptureResult {
                achieved_fs: rate,
                was_coerced: true,
            }
        }
        _ => CaptureResult::exact(requested_fs),
    }
}

/// Synthesises one capture of an FMCW scene with a static clutter return and
/// a moving target, sampled at `fs`.
pub fn synthesize(
    config: &GeneratorConfig,
    radar: &RadarConfig,
    fs: f64,
) -> anyhow::Result<(Vec<f64>, Vec<f64>)> {
    anyhow::ensure!(
        config.duration_s.is_finite() && config.duration_s > 0.0,
        "capture duration must be positive, got {}",
        config.duration_s
    );
    anyhow::ensure!(
        fs.is_finite() && fs > 0.0,
        "sample rate must be positive, got {}",
        fs
    );

    let period = radar.chirp_duration_s;
    anyhow::ensure!(
        period * fs >= 1.0,
        "chirp period {} s is shorter than one sample at {} Hz",
        period,
        fs
    );

    let length = (config.duration_s * fs).round() as usize;
    let period_samples = (period * fs).round() as usize;
    let offset_samples = (config.sync_offset_s.max(0.0) * fs).round() as usize;
    let high_samples = (config.sync_duty * period_samples as f64).round() as usize;
    let wavelength = radar.propagation_speed_mps / config.carrier_hz;
    let clutter_hz = radar.range_to_beat(config.clutter_range_m);

    let mut rng = StdRng::seed_from_u64(config.seed);
    let mut beat = Vec::with_capacity(length);
    let mut sync = Vec::with_capacity(length);

    for i in 0..length {
        let (chirp, elapsed) = chirp_timing(i, offset_samples, period_samples);
        let tau = elapsed as f64 / fs;

        sync.push(if elapsed < high_samples {
            config.sync_high_v
        } else {
            config.sync_low_v
        });

        let range = config.target_range_m + config.target_velocity_mps * chirp as f64 * period;
        let target_phase = 4.0 * PI * range / wavelength;
        let jitter = if config.noise > 0.0 {
            rng.gen_range(-config.noise..config.noise)
        } else {
            0.0
        };
        beat.push(
            tone(config.clutter_amplitude, clutter_hz, tau, 0.0)
                + tone(config.target_amplitude, radar.range_to_beat(range), tau, target_phase)
                + jitter,
        );
    }

    Ok((beat, sync))
}
