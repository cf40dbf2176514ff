use crate::math::fft::{fft_frequencies, FftHelper};
use crate::math::matrix::MatrixHelper;
use crate::math::stats::StatsHelper;
use crate::prelude::{RadarConfig, TimeAlignment};
use crate::telemetry::log::LogManager;
use ndarray::{s, Array2, ArrayView2};
use num_complex::Complex64;
use rustfft::num_traits::Zero;
use serde::{Deserialize, Serialize};

/// Lower display percentile of the RTI magnitude.
pub const DISPLAY_LOW_PERCENTILE: f64 = 5.0;
/// Upper display percentile of the RTI magnitude.
pub const DISPLAY_HIGH_PERCENTILE: f64 = 99.0;

/// Colour-scale bounds in dB for rendering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DisplayBounds {
    pub vmin: f64,
    pub vmax: f64,
}

/// Range-time-intensity result for one capture.
#[derive(Debug, Clone, PartialEq)]
pub struct RtiProduct {
    /// Complex range profiles, `(K - 1, N0)`.
    pub range_profiles: Array2<Complex64>,
    /// `20*log10(|profile| + 1e-12)` over the non-negative range half, `(K - 1, N0 / 2)`.
    pub magnitude_db: Array2<f64>,
    /// Seconds since capture start for each row.
    pub time_axis: Vec<f64>,
    /// Metres for each of the `N0 / 2` usable columns.
    pub range_axis: Vec<f64>,
    pub display: DisplayBounds,
}

impl RtiProduct {
    pub fn rows(&self) -> usize {
        self.range_profiles.nrows()
    }

    /// Number of non-negative range bins, `N0 / 2`.
    pub fn usable_bins(&self) -> usize {
        self.range_axis.len()
    }

    /// Complex profiles restricted to the non-negative range half.
    pub fn usable_profiles(&self) -> ArrayView2<'_, Complex64> {
        self.range_profiles.slice(s![.., ..self.usable_bins()])
    }

    /// Column count covering ranges up to `cutoff_m`: the index of the
    /// first range bin exceeding the cutoff.
    pub fn cutoff_index(&self, cutoff_m: f64) -> usize {
        self.range_axis.partition_point(|&range| range <= cutoff_m)
    }

    /// Columns `[0, cutoff_index)` of the magnitude matrix, sharing the
    /// full product's display bounds.
    pub fn zoom(&self, cutoff_m: f64) -> RangeZoom {
        let columns = self.cutoff_index(cutoff_m);
        RangeZoom {
            cutoff_m,
            magnitude_db: self.magnitude_db.slice(s![.., ..columns]).to_owned(),
            range_axis: self.range_axis[..columns].to_vec(),
        }
    }
}

/// RTI magnitude restricted to a near-range sub-window.
#[derive(Debug, Clone, PartialEq)]
pub struct RangeZoom {
    pub cutoff_m: f64,
    pub magnitude_db: Array2<f64>,
    pub range_axis: Vec<f64>,
}

/// Two-pulse canceller followed by a per-row inverse FFT over fast time.
pub struct RtiProcessor {
    config: RadarConfig,
    fs: f64,
    window: usize,
    ifft: FftHelper,
    logger: LogManager,
}

impl RtiProcessor {
    pub fn new(config: RadarConfig, fs: f64, window: usize) -> Self {
        Self {
            config,
            fs,
            window,
            ifft: FftHelper::inverse(window),
            logger: LogManager::new("rti-processor"),
        }
    }

    /// `profiles` is the `(K, N0)` chirp stack, `edges` the `K` valid edges
    /// it was cut from.
    pub fn process(&mut self, profiles: ArrayView2<f64>, edges: &[usize]) -> RtiProduct {
        debug_assert_eq!(profiles.nrows(), edges.len());
        debug_assert_eq!(profiles.ncols(), self.window);

        let difference = MatrixHelper::consecutive_difference(profiles);
        let range_profiles = self.range_profiles(difference.view());
        let usable = self.window / 2;

        let full_db = range_profiles.mapv(|bin| StatsHelper::magnitude_db(bin.norm()));
        let display = DisplayBounds {
            vmin: StatsHelper::percentile(full_db.iter().copied(), DISPLAY_LOW_PERCENTILE),
            vmax: StatsHelper::percentile(full_db.iter().copied(), DISPLAY_HIGH_PERCENTILE),
        };
        let magnitude_db = full_db.slice(s![.., ..usable]).to_owned();

        let time_axis = self.time_axis(edges);
        let range_axis = self.range_axis();

        self.logger.record(&format!(
            "RTI {}x{} (usable {}), display {:.1}..{:.1} dB, max range {:.2} m",
            range_profiles.nrows(),
            range_profiles.ncols(),
            usable,
            display.vmin,
            display.vmax,
            range_axis.last().copied().unwrap_or(0.0)
        ));

        RtiProduct {
            range_profiles,
            magnitude_db,
            time_axis,
            range_axis,
            display,
        }
    }

    fn range_profiles(&mut self, difference: ArrayView2<f64>) -> Array2<Complex64> {
        let mut output = Array2::from_elem(difference.dim(), Complex64::zero());
        let mut buffer = vec![Complex64::zero(); self.window];
        for (mut out_row, diff_row) in output.rows_mut().into_iter().zip(difference.rows()) {
            for (slot, &value) in buffer.iter_mut().zip(diff_row.iter()) {
                *slot = Complex64::new(value, 0.0);
            }
            self.ifft.process_in_place(&mut buffer);
            for (target, &value) in out_row.iter_mut().zip(buffer.iter()) {
                *target = value;
            }
        }
        output
    }

    /// Timestamp of each cancelled pair `(edges[j], edges[j + 1])`.
    pub fn time_axis(&self, edges: &[usize]) -> Vec<f64> {
        edges
            .windows(2)
            .map(|pair| {
                let sample = match self.config.time_alignment {
                    TimeAlignment::Later => pair[1] as f64,
                    TimeAlignment::Earlier => pair[0] as f64,
                    TimeAlignment::Midpoint => (pair[0] + pair[1]) as f64 / 2.0,
                };
                sample / self.fs
            })
            .collect()
    }

    /// Range of each non-negative beat-frequency bin, `c * Tp * f / (2 * B)`.
    pub fn range_axis(&self) -> Vec<f64> {
        fft_frequencies(self.window, self.fs)
            .into_iter()
            .take(self.window / 2)
            .map(|beat_hz| self.config.beat_to_range(beat_hz))
            .collect()
    }
}
