//! Small dense linear algebra helpers for least-squares estimation

use crate::{MathError, Result};

/// Solve the ridge-regularised least-squares problem `min ||X b - y||^2 + lambda ||b||^2`.
///
/// `rows` holds the design matrix row by row. The penalty is `ridge` scaled by
/// the mean diagonal of `X'X`, so it only matters for (near-)singular
/// designs such as a constant series.
pub fn solve_least_squares(rows: &[Vec<f64>], targets: &[f64], ridge: f64) -> Result<Vec<f64>> {
    if rows.is_empty() {
        return Err(MathError::InsufficientData(
            "Least squares needs at least one row".to_string(),
        ));
    }

    if rows.len() != targets.len() {
        return Err(MathError::InvalidInput(format!(
            "Design matrix has {} rows but {} targets were given",
            rows.len(),
            targets.len()
        )));
    }

    let k = rows[0].len();
    if rows.iter().any(|row| row.len() != k) {
        return Err(MathError::InvalidInput(
            "Design matrix rows must all have the same length".to_string(),
        ));
    }

    // Normal equations: (X'X + lambda I) b = X'y
    let mut gram = vec![vec![0.0; k]; k];
    let mut moment = vec![0.0; k];
    for (row, &y) in rows.iter().zip(targets) {
        for i in 0..k {
            moment[i] += row[i] * y;
            for j in i..k {
                gram[i][j] += row[i] * row[j];
            }
        }
    }
    for i in 0..k {
        for j in 0..i {
            gram[i][j] = gram[j][i];
        }
    }

    let trace: f64 = (0..k).map(|i| gram[i][i]).sum();
    let lambda = if trace > 0.0 {
        ridge * trace / k as f64
    } else {
        ridge
    };
    for (i, row) in gram.iter_mut().enumerate() {
        row[i] += lambda;
    }

    solve_linear_system(gram, moment)
}

/// Solve `a x = b` by Gaussian elimination with partial pivoting
pub fn solve_linear_system(mut a: Vec<Vec<f64>>, mut b: Vec<f64>) -> Result<Vec<f64>> {
    let n = b.len();
    if a.len() != n || a.iter().any(|row| row.len() != n) {
        return Err(MathError::InvalidInput(format!(
            "Expected a {}x{} system",
            n, n
        )));
    }

    for col in 0..n {
        let pivot_row = (col..n)
            .max_by(|&i, &j| a[i][col].abs().total_cmp(&a[j][col].abs()))
            .unwrap_or(col);

        let pivot = a[pivot_row][col];
        if pivot == 0.0 || !pivot.is_finite() {
            return Err(MathError::CalculationError(
                "Linear system is singular".to_string(),
            ));
        }

        a.swap(col, pivot_row);
        b.swap(col, pivot_row);

        for row in col + 1..n {
            let factor = a[row][col] / a[col][col];
            if factor == 0.0 {
                continue;
            }
            for k in col..n {
                a[row][k] -= factor * a[col][k];
            }
            b[row] -= factor * b[col];
        }
    }

    // Back substitution
    let mut x = vec![0.0; n];
    for row in (0..n).rev() {
        let tail: f64 = (row + 1..n).map(|k| a[row][k] * x[k]).sum();
        x[row] = (b[row] - tail) / a[row][row];
    }

    Ok(x)
}
