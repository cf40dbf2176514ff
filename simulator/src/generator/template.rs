use std::f64::consts::PI;

/// Position of `sample` inside a periodic chirp train whose first chirp
/// starts at sample `offset`: the chirp index (negative before the first
/// edge) and the samples elapsed since that chirp started.
pub fn chirp_timing(sample: usize, offset: usize, period: usize) -> (i64, usize) {
    let relative = sample as i64 - offset as i64;
    let period = period.max(1) as i64;
    (
        relative.div_euclid(period),
        relative.rem_euclid(period) as usize,
    )
}

pub fn tone(amplitude: f64, frequency_hz: f64, t: f64, phase: f64) -> f64 {
    amplitude * (2.0 * PI * frequency_hz * t + phase).sin()
}
