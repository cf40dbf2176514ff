use ndarray::{s, Array2, ArrayView1, ArrayView2};

pub struct MatrixHelper;

impl MatrixHelper {
    /// Stacks equal-length rows into a `(rows.len(), width)` array.
    pub fn stack_rows(rows: &[&[f64]], width: usize) -> Array2<f64> {
        let mut stacked = Array2::zeros((rows.len(), width));
        for (mut target, source) in stacked.rows_mut().into_iter().zip(rows) {
            target.assign(&ArrayView1::from(*source));
        }
        stacked
    }

    /// `out[j] = input[j + 1] - input[j]`, one row fewer than the input.
    pub fn consecutive_difference(input: ArrayView2<f64>) -> Array2<f64> {
        if input.nrows() < 2 {
            return Array2::zeros((0, input.ncols()));
        }
        &input.slice(s![1.., ..]) - &input.slice(s![..-1, ..])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn stack_rows_preserves_order() {
        let a = [1.0, 2.0];
        let b = [3.0, 4.0];
        let stacked = MatrixHelper::stack_rows(&[&a[..], &b[..]], 2);
        assert_eq!(stacked, array![[1.0, 2.0], [3.0, 4.0]]);
    }

    #[test]
    fn consecutive_difference_subtracts_previous_row() {
        let input = array![[1.0, 1.0], [3.0, 0.0], [3.0, 5.0]];
        let diff = MatrixHelper::consecutive_difference(input.view());
        assert_eq!(diff, array![[2.0, -1.0], [0.0, 5.0]]);
    }

    #[test]
    fn consecutive_difference_of_single_row_is_empty() {
        let input = array![[1.0, 2.0, 3.0]];
        assert_eq!(MatrixHelper::consecutive_difference(input.view()).dim(), (0, 3));
    }
}
