use nalgebra::{DMatrix, DVector};

/// Added to every row and column sum before dividing.
pub const SINKHORN_EPSILON: f64 = 1e-8;

struct SinkhornStep {
    row_denoms: DVector<f64>,
    row_scaled: DMatrix<f64>,
    col_denoms: DVector<f64>,
    output: DMatrix<f64>,
}

/// Alternating row/column rescaling of a positive matrix, recorded so the
/// gradient can be propagated back to the input.
///
/// Each iteration divides every row by its sum, then every column by its sum
/// (each sum offset by [`SINKHORN_EPSILON`]). Rectangular inputs never become
/// doubly stochastic; after any iteration the columns sum to just under one.
pub struct SinkhornTape {
    input: DMatrix<f64>,
    steps: Vec<SinkhornStep>,
}

impl SinkhornTape {
    pub fn record(kernel: DMatrix<f64>, iterations: usize) -> Self {
        let mut steps: Vec<SinkhornStep> = Vec::with_capacity(iterations);
        for _ in 0..iterations {
            let next = normalize_once(steps.last().map_or(&kernel, |s| &s.output));
            steps.push(next);
        }
        Self {
            input: kernel,
            steps,
        }
    }

    pub fn output(&self) -> &DMatrix<f64> {
        self.steps.last().map_or(&self.input, |s| &s.output)
    }

    pub fn into_output(mut self) -> DMatrix<f64> {
        match self.steps.pop() {
            Some(step) => step.output,
            None => self.input,
        }
    }

    /// Maps the gradient with respect to the output onto the input kernel.
    pub fn backward(&self, grad_output: &DMatrix<f64>) -> DMatrix<f64> {
        let (rows, cols) = grad_output.shape();
        let mut grad = grad_output.clone();

        for step in self.steps.iter().rev() {
            let col_dots: Vec<f64> = (0..cols)
                .map(|j| grad.column(j).dot(&step.output.column(j)))
                .collect();
            let grad_row_scaled = DMatrix::from_fn(rows, cols, |i, j| {
                (grad[(i, j)] - col_dots[j]) / step.col_denoms[j]
            });

            let row_dots: Vec<f64> = (0..rows)
                .map(|i| grad_row_scaled.row(i).dot(&step.row_scaled.row(i)))
                .collect();
            grad = DMatrix::from_fn(rows, cols, |i, j| {
                (grad_row_scaled[(i, j)] - row_dots[i]) / step.row_denoms[i]
            });
        }
        grad
    }
}

fn normalize_once(matrix: &DMatrix<f64>) -> SinkhornStep {
    let (rows, cols) = matrix.shape();

    let row_denoms =
        DVector::from_iterator(rows, matrix.row_iter().map(|r| r.sum() + SINKHORN_EPSILON));
    let row_scaled = DMatrix::from_fn(rows, cols, |i, j| matrix[(i, j)] / row_denoms[i]);

    let col_denoms = DVector::from_iterator(
        cols,
        row_scaled.column_iter().map(|c| c.sum() + SINKHORN_EPSILON),
    );
    let output = DMatrix::from_fn(rows, cols, |i, j| row_scaled[(i, j)] / col_denoms[j]);

    SinkhornStep {
        row_denoms,
        row_scaled,
        col_denoms,
        output,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kernel(rows: usize, cols: usize) -> DMatrix<f64> {
        DMatrix::from_fn(rows, cols, |i, j| {
            1.0 + ((i * 7 + j * 3) % 5) as f64 * 0.8 + (i as f64 - j as f64).abs() * 0.1
        })
    }

    fn max_row_deviation(m: &DMatrix<f64>) -> f64 {
        m.row_iter().map(|r| (r.sum() - 1.0).abs()).fold(0.0, f64::max)
    }

    #[test]
    fn zero_iterations_return_input_unchanged() {
        let input = kernel(3, 4);
        let tape = SinkhornTape::record(input.clone(), 0);
        assert_eq!(tape.output(), &input);
        assert_eq!(tape.backward(&input), input);
    }

    #[test]
    fn columns_sum_to_one_after_each_iteration() {
        for iterations in [1, 3, 10] {
            let tape = SinkhornTape::record(kernel(5, 8), iterations);
            for column in tape.output().column_iter() {
                assert!((column.sum() - 1.0).abs() < 1e-6);
            }
        }
    }

    #[test]
    fn square_rows_approach_unit_sums_as_iterations_grow() {
        let few = SinkhornTape::record(kernel(6, 6), 1).into_output();
        let many = SinkhornTape::record(kernel(6, 6), 50).into_output();
        assert!(max_row_deviation(&many) < max_row_deviation(&few));
        assert!(max_row_deviation(&many) < 1e-3);
    }

    #[test]
    fn output_stays_non_negative() {
        let output = SinkhornTape::record(kernel(4, 7), 10).into_output();
        assert!(output.iter().all(|&v| v >= 0.0));
    }

    #[test]
    fn backward_matches_finite_differences() {
        let input = kernel(3, 4);
        let weights = DMatrix::from_fn(3, 4, |i, j| (i as f64 + 1.0) * 0.5 - j as f64 * 0.3);
        let objective =
            |m: &DMatrix<f64>| SinkhornTape::record(m.clone(), 4).output().dot(&weights);

        let analytic = SinkhornTape::record(input.clone(), 4).backward(&weights);
        let h = 1e-6;
        for i in 0..3 {
            for j in 0..4 {
                let mut plus = input.clone();
                let mut minus = input.clone();
                plus[(i, j)] += h;
                minus[(i, j)] -= h;
                let numeric = (objective(&plus) - objective(&minus)) / (2.0 * h);
                assert!(
                    (numeric - analytic[(i, j)]).abs() < 1e-7,
                    "entry ({}, {}): {} vs {}",
                    i,
                    j,
                    numeric,
                    analytic[(i, j)]
                );
            }
        }
    }
}
