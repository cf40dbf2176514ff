use crate::capture::CapturedWaveforms;
use crate::prelude::{PipelineResult, RadarConfig};
use crate::processing::edges::{EdgeDetector, EdgeSet};
use crate::processing::rti::{RtiProcessor, RtiProduct};
use crate::processing::spectrum::{ChirpSpectrum, SpectralAnalyzer};
use crate::processing::windower::ChirpWindower;
use crate::telemetry::log::LogManager;

/// Everything computed for one capture.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineOutput {
    /// Samples per chirp window, `N0`.
    pub window: usize,
    pub edges: EdgeSet,
    /// Edges with a complete chirp window, in capture order.
    pub valid_edges: Vec<usize>,
    /// Spectrum of the first valid chirp.
    pub spectrum: ChirpSpectrum,
    pub rti: RtiProduct,
}

/// Offline FMCW pipeline: edge detection, chirp windowing, single-chirp
/// spectrum and RTI formation over one complete capture.
pub struct RtiPipeline {
    config: RadarConfig,
    detector: EdgeDetector,
    logger: LogManager,
}

impl RtiPipeline {
    pub fn new(config: RadarConfig) -> PipelineResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            detector: EdgeDetector::new(),
            logger: LogManager::new("pipeline"),
        })
    }

    pub fn run(&self, capture: &CapturedWaveforms) -> PipelineResult<PipelineOutput> {
        let fs = capture.fs();
        if capture.capture().was_coerced {
            self.logger
                .caution(&format!("device coerced sample rate to {:.1} Hz", fs));
        }

        let window = self.config.samples_per_chirp(fs)?;
        self.logger.record(&format!(
            "{} samples at {:.1} Hz, chirp window {} samples",
            capture.len(),
            fs,
            window
        ));

        let (edges, valid_edges) = self.detector.detect_valid(capture.sync(), window)?;

        let windower = ChirpWindower::new(window);
        let profiles = windower.stack(capture.beat(), &valid_edges);

        let mut analyzer = SpectralAnalyzer::new(window, fs);
        let spectrum = analyzer.analyze(windower.profile(capture.beat(), valid_edges[0]));

        let mut processor = RtiProcessor::new(self.config.clone(), fs, window);
        let rti = processor.process(profiles.view(), &valid_edges);

        Ok(PipelineOutput {
            window,
            edges,
            valid_edges,
            spectrum,
            rti,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::CaptureResult;
    use crate::prelude::PipelineError;
    use std::f64::consts::PI;

    const FS: f64 = 100_000.0;
    const PERIOD: usize = 2000;

    /// One second of sync pulses every 20 ms, first rising edge at `offset`.
    fn scenario(offset: usize, beat_hz: f64) -> CapturedWaveforms {
        let length = 100_000;
        let sync: Vec<f64> = (0..length)
            .map(|i| {
                let phase = (i + PERIOD - offset % PERIOD) % PERIOD;
                if phase < PERIOD / 10 {
                    1.0
                } else {
                    0.0
                }
            })
            .collect();
        let beat: Vec<f64> = (0..length)
            .map(|i| {
                let chirp = (i + PERIOD - offset) / PERIOD;
                let t = ((i + PERIOD - offset) % PERIOD) as f64 / FS;
                (1.0 + 0.1 * chirp as f64) * (2.0 * PI * beat_hz * t).sin()
            })
            .collect();
        CapturedWaveforms::new(beat, sync, CaptureResult::exact(FS)).unwrap()
    }

    #[test]
    fn one_second_capture_produces_expected_shapes() {
        let pipeline = RtiPipeline::new(RadarConfig::default()).unwrap();
        let output = pipeline.run(&scenario(1000, 1_000.0)).unwrap();
        assert_eq!(output.window, 2000);
        assert_eq!(output.edges.raw.len(), 50);
        assert_eq!(output.valid_edges.len(), 49);
        assert_eq!(output.rti.range_profiles.dim(), (48, 2000));
        assert_eq!(output.rti.magnitude_db.dim(), (48, 1000));
        assert_eq!(output.rti.time_axis.len(), 48);
        assert_eq!(output.rti.range_axis.len(), 1000);
        assert_eq!(output.rti.time_axis[0], 3000.0 / FS);
    }

    #[test]
    fn spectrum_peak_tracks_beat_tone() {
        let pipeline = RtiPipeline::new(RadarConfig::default()).unwrap();
        let output = pipeline.run(&scenario(1000, 1_000.0)).unwrap();
        let bin_width = FS / (4 * output.window) as f64;
        assert!((output.spectrum.peak_frequency_hz - 1_000.0).abs() <= bin_width);
        assert_eq!(output.spectrum.magnitude_db.len(), 2 * output.window);
    }

    #[test]
    fn repeated_runs_are_bit_identical() {
        let pipeline = RtiPipeline::new(RadarConfig::default()).unwrap();
        let capture = scenario(700, 2_500.0);
        let first = pipeline.run(&capture).unwrap();
        let second = pipeline.run(&capture).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn capture_without_sync_pulses_fails() {
        let pipeline = RtiPipeline::new(RadarConfig::default()).unwrap();
        let capture =
            CapturedWaveforms::new(vec![0.0; 5000], vec![0.2; 5000], CaptureResult::exact(FS))
                .unwrap();
        assert!(matches!(
            pipeline.run(&capture),
            Err(PipelineError::NoEdgesDetected { .. })
        ));
    }

    #[test]
    fn capture_with_one_full_chirp_fails() {
        let pipeline = RtiPipeline::new(RadarConfig::default()).unwrap();
        let mut sync = vec![0.0; 3500];
        sync[100..200].iter_mut().for_each(|v| *v = 1.0);
        sync[2100..2200].iter_mut().for_each(|v| *v = 1.0);
        let capture =
            CapturedWaveforms::new(vec![0.0; 3500], sync, CaptureResult::exact(FS)).unwrap();
        assert!(matches!(
            pipeline.run(&capture),
            Err(PipelineError::InsufficientChirps { valid: 1, raw: 2, .. })
        ));
    }

    #[test]
    fn low_sample_rate_yields_degenerate_window() {
        let pipeline = RtiPipeline::new(RadarConfig::default()).unwrap();
        let capture =
            CapturedWaveforms::new(vec![0.0; 8], vec![0.0; 8], CaptureResult::exact(20.0)).unwrap();
        assert!(matches!(
            pipeline.run(&capture),
            Err(PipelineError::DegenerateChirpWindow { .. })
        ));
    }

    #[test]
    fn invalid_config_is_rejected_up_front() {
        let config = RadarConfig {
            chirp_duration_s: -1.0,
            ..Default::default()
        };
        assert!(RtiPipeline::new(config).is_err());
    }
}
