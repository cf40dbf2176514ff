use std::f64::consts::PI;

/// Symmetric Hann window, `0.5 * (1 - cos(2*pi*n / (N - 1)))`.
///
/// Both end points are exactly zero. A length-1 window is `[1.0]`.
pub fn hann(length: usize) -> Vec<f64> {
    match length {
        0 => Vec::new(),
        1 => vec![1.0],
        _ => {
            let denominator = (length - 1) as f64;
            (0..length)
                .map(|n| 0.5 * (1.0 - (2.0 * PI * n as f64 / denominator).cos()))
                .collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hann_tapers_to_zero_at_both_ends() {
        let window = hann(9);
        assert_eq!(window.len(), 9);
        assert!(window[0].abs() < 1e-15);
        assert!(window[8].abs() < 1e-15);
        assert!((window[4] - 1.0).abs() < 1e-15);
    }

    #[test]
    fn hann_is_symmetric() {
        let window = hann(16);
        for i in 0..8 {
            assert!((window[i] - window[15 - i]).abs() < 1e-12);
        }
    }

    #[test]
    fn hann_degenerate_lengths() {
        assert!(hann(0).is_empty());
        assert_eq!(hann(1), vec![1.0]);
    }
}
