use crate::math::matrix::MatrixHelper;
use crate::math::stats::StatsHelper;
use crate::telemetry::log::LogManager;
use ndarray::Array2;

/// Cuts fixed-length chirp profiles out of the beat trace.
pub struct ChirpWindower {
    window: usize,
    logger: LogManager,
}

impl ChirpWindower {
    pub fn new(window: usize) -> Self {
        Self {
            window,
            logger: LogManager::new("chirp-windower"),
        }
    }

    /// `beat[edge..edge + N0]`. Callers pass only validated edges.
    pub fn profile<'a>(&self, beat: &'a [f64], edge: usize) -> &'a [f64] {
        &beat[edge..edge + self.window]
    }

    /// Stacks one profile per edge into a `(K, N0)` array, in edge order.
    pub fn stack(&self, beat: &[f64], edges: &[usize]) -> Array2<f64> {
        let profiles: Vec<&[f64]> = edges.iter().map(|&edge| self.profile(beat, edge)).collect();
        let stack = MatrixHelper::stack_rows(&profiles, self.window);
        self.logger.record(&format!(
            "profile stack {}x{} (beat RMS {:.4})",
            stack.nrows(),
            stack.ncols(),
            StatsHelper::rms(stack.as_slice().unwrap_or_default())
        ));
        stack
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profile_is_unmodified_slice() {
        let beat: Vec<f64> = (0..10).map(f64::from).collect();
        let windower = ChirpWindower::new(3);
        assert_eq!(windower.profile(&beat, 4), &[4.0, 5.0, 6.0]);
    }

    #[test]
    fn stack_has_one_row_per_edge() {
        let beat: Vec<f64> = (0..12).map(f64::from).collect();
        let windower = ChirpWindower::new(4);
        let stack = windower.stack(&beat, &[1, 5, 8]);
        assert_eq!(stack.dim(), (3, 4));
        assert_eq!(stack.row(2).to_vec(), vec![8.0, 9.0, 10.0, 11.0]);
    }
}
