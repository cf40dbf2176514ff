use crate::generator::scene::{negotiate_rate, synthesize, GeneratorConfig};
use anyhow::Context;
use fmcwcore::prelude::RadarConfig;
use fmcwcore::CapturedWaveforms;
use log::{info, warn};

/// Something that yields one complete beat/sync capture.
pub trait CaptureSource {
    fn acquire(&mut self, requested_fs: f64) -> anyhow::Result<CapturedWaveforms>;
}

/// Simulated instrument producing a deterministic FMCW scene.
pub struct SyntheticSource {
    generator: GeneratorConfig,
    radar: RadarConfig,
}

impl SyntheticSource {
    pub fn new(generator: GeneratorConfig, radar: RadarConfig) -> Self {
        Self { generator, radar }
    }
}

impl CaptureSource for SyntheticSource {
    fn acquire(&mut self, requested_fs: f64) -> anyhow::Result<CapturedWaveforms> {
        let result = negotiate_rate(requested_fs, &self.generator.supported_rates_hz);
        if result.was_coerced {
            warn!(
                "requested {:.1} Hz, device coerced to {:.1} Hz",
                requested_fs, result.achieved_fs
            );
        }
        if let Some(description) = &self.generator.description {
            info!("scene: {}", description);
        }
        let (beat, sync) = synthesize(&self.generator, &self.radar, result.achieved_fs)
            .context("synthesizing capture")?;
        let capture =
            CapturedWaveforms::new(beat, sync, result).context("validating synthetic capture")?;
        info!(
            "synthetic capture {} samples ({:.3} s) at {:.1} Hz ({})",
            capture.len(),
            capture.duration_s(),
            capture.fs(),
            self.generator.scenario.as_deref().unwrap_or("default scene")
        );
        Ok(capture)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn synthetic_source_reports_coerced_rate() {
        let generator = GeneratorConfig {
            duration_s: 0.1,
            supported_rates_hz: vec![40_000.0, 80_000.0],
            ..Default::default()
        };
        let mut source = SyntheticSource::new(generator, RadarConfig::default());
        let capture = source.acquire(100_000.0).unwrap();
        assert_eq!(capture.fs(), 80_000.0);
        assert!(capture.capture().was_coerced);
        assert_eq!(capture.len(), 8_000);
        assert!((capture.duration_s() - 0.1).abs() < 1e-12);
    }
}
