use num_complex::Complex64;
use rustfft::{num_traits::Zero, Fft, FftDirection, FftPlanner};
use std::sync::Arc;

/// Helper that wraps a planned `rustfft` transform of a fixed length.
///
/// Real input shorter than the planned length is zero-padded. The inverse
/// transform is normalised by `1/N` so a forward/inverse pair is an identity.
pub struct FftHelper {
    fft: Arc<dyn Fft<f64>>,
    direction: FftDirection,
    size: usize,
    scratch: Vec<Complex64>,
}

impl FftHelper {
    pub fn forward(size: usize) -> Self {
        Self::planned(size, FftDirection::Forward)
    }

    pub fn inverse(size: usize) -> Self {
        Self::planned(size, FftDirection::Inverse)
    }

    fn planned(size: usize, direction: FftDirection) -> Self {
        let mut planner = FftPlanner::<f64>::new();
        let fft = planner.plan_fft(size, direction);
        let scratch = vec![Complex64::zero(); fft.get_inplace_scratch_len()];
        Self {
            fft,
            direction,
            size,
            scratch,
        }
    }

    pub fn len(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Transforms real samples, truncating or zero-padding to the planned length.
    pub fn process_real(&mut self, input: &[f64]) -> Vec<Complex64> {
        let size = self.len();
        let mut buffer: Vec<Complex64> = input
            .iter()
            .take(size)
            .map(|&value| Complex64::new(value, 0.0))
            .collect();
        buffer.resize(size, Complex64::zero());
        self.process_in_place(&mut buffer);
        buffer
    }

    pub fn process_in_place(&mut self, buffer: &mut [Complex64]) {
        if self.size == 0 {
            return;
        }
        self.fft.process_with_scratch(buffer, &mut self.scratch);
        if self.direction == FftDirection::Inverse {
            let scale = 1.0 / self.size as f64;
            buffer.iter_mut().for_each(|value| *value *= scale);
        }
    }
}

/// Standard DFT sample frequencies for a length-`n` transform at rate `fs`.
///
/// Bins `0..=(n-1)/2` are non-negative; the remainder wrap to negative
/// frequencies.
pub fn fft_frequencies(n: usize, fs: f64) -> Vec<f64> {
    if n == 0 {
        return Vec::new();
    }
    let spacing = fs / n as f64;
    let positive_end = (n - 1) / 2;
    (0..n)
        .map(|k| {
            if k <= positive_end {
                k as f64 * spacing
            } else {
                -((n - k) as f64) * spacing
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forward_pads_to_planned_length() {
        let mut helper = FftHelper::forward(8);
        let output = helper.process_real(&[1.0, 0.0, -1.0, 0.0]);
        assert_eq!(output.len(), 8);
    }

    #[test]
    fn inverse_of_impulse_spectrum_is_normalised() {
        let mut helper = FftHelper::inverse(4);
        let output = helper.process_real(&[4.0, 0.0, 0.0, 0.0]);
        for value in output {
            assert!((value.re - 1.0).abs() < 1e-12);
            assert!(value.im.abs() < 1e-12);
        }
    }

    #[test]
    fn forward_then_inverse_recovers_input() {
        let input = [0.5, -1.25, 3.0, 2.0, 0.0];
        let mut forward = FftHelper::forward(input.len());
        let mut inverse = FftHelper::inverse(input.len());
        let mut spectrum = forward.process_real(&input);
        inverse.process_in_place(&mut spectrum);
        for (value, expected) in spectrum.iter().zip(input) {
            assert!((value.re - expected).abs() < 1e-12);
        }
    }

    #[test]
    fn frequencies_follow_dft_convention() {
        assert_eq!(fft_frequencies(4, 8.0), vec![0.0, 2.0, -4.0, -2.0]);
        assert_eq!(fft_frequencies(5, 5.0), vec![0.0, 1.0, 2.0, -2.0, -1.0]);
        assert!(fft_frequencies(0, 1.0).is_empty());
    }
}
