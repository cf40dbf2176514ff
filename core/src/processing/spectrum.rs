use crate::math::fft::{fft_frequencies, FftHelper};
use crate::math::stats::StatsHelper;
use crate::math::window::hann;
use crate::telemetry::log::LogManager;
use serde::{Deserialize, Serialize};

/// Zero-padding factor applied before the single-chirp FFT.
pub const ZERO_PAD_FACTOR: usize = 4;

/// Positive-frequency spectrum of one chirp.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChirpSpectrum {
    pub frequency_hz: Vec<f64>,
    pub magnitude_db: Vec<f64>,
    /// Frequency of the strongest bin.
    pub peak_frequency_hz: f64,
}

/// Diagnostic spectrum of a single chirp: detrend, Hann taper, 4x
/// zero-padded FFT, magnitude in dB over the positive half.
pub struct SpectralAnalyzer {
    window: Vec<f64>,
    fft: FftHelper,
    fs: f64,
    logger: LogManager,
}

impl SpectralAnalyzer {
    pub fn new(chirp_len: usize, fs: f64) -> Self {
        Self {
            window: hann(chirp_len),
            fft: FftHelper::forward(ZERO_PAD_FACTOR * chirp_len),
            fs,
            logger: LogManager::new("spectral-analyzer"),
        }
    }

    pub fn analyze(&mut self, profile: &[f64]) -> ChirpSpectrum {
        let mean = StatsHelper::mean(profile);
        let tapered: Vec<f64> = profile
            .iter()
            .zip(&self.window)
            .map(|(&sample, &weight)| (sample - mean) * weight)
            .collect();

        let padded_len = self.fft.len();
        let half = padded_len / 2;
        let spectrum = self.fft.process_real(&tapered);
        let magnitude_db: Vec<f64> = spectrum[..half]
            .iter()
            .map(|bin| StatsHelper::magnitude_db(bin.norm()))
            .collect();
        let mut frequency_hz = fft_frequencies(padded_len, self.fs);
        frequency_hz.truncate(half);

        let peak_frequency_hz = magnitude_db
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.total_cmp(b.1))
            .map(|(bin, _)| frequency_hz[bin])
            .unwrap_or(0.0);

        self.logger.record(&format!(
            "chirp spectrum {} bins, peak {:.1} Hz",
            half, peak_frequency_hz
        ));

        ChirpSpectrum {
            frequency_hz,
            magnitude_db,
            peak_frequency_hz,
        }
    }
}
