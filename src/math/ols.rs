//! Least-squares helpers for the modulus regression.
//!
//! The elastic-modulus search repeatedly fits the straight line
//! `σ = a + b·ε` over many candidate strain windows, so the solver is kept
//! small and allocation-light.
//!
//! Implementation choices:
//! - We use SVD to solve the least-squares problem robustly even when the
//!   design matrix is tall (more rows than columns).
//!   (Nalgebra's `QR::solve` is intended for square systems and will panic
//!   for non-square matrices.)
//! - With only two columns, SVD cost is negligible next to building the
//!   candidate windows.

use nalgebra::{DMatrix, DVector};

/// Solve a least squares problem using SVD.
///
/// Returns `None` if the system is too ill-conditioned to solve robustly.
pub fn solve_least_squares(x: &DMatrix<f64>, y: &DVector<f64>) -> Option<DVector<f64>> {
    let svd = x.clone().svd(true, true);

    // Try progressively looser tolerances if strict solve fails. Strain
    // windows on noisy data can produce nearly collinear columns when the
    // strain span is tiny.
    for &tol in &[1e-10, 1e-8, 1e-6] {
        if let Ok(beta) = svd.solve(y, tol) {
            if beta.iter().all(|v| v.is_finite()) {
                return Some(beta);
            }
        }
    }

    None
}

/// A fitted straight line with its goodness of fit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineFit {
    pub slope: f64,
    pub intercept: f64,
    pub r_squared: f64,
}

/// Fit `y = intercept + slope·x` over paired slices.
///
/// Returns `None` when fewer than two points are given, when any value is
/// non-finite, or when the solver rejects the system.
pub fn fit_line(x: &[f64], y: &[f64]) -> Option<LineFit> {
    let n = x.len();
    if n < 2 || y.len() != n {
        return None;
    }
    if x.iter().chain(y.iter()).any(|v| !v.is_finite()) {
        return None;
    }

    let mut design = DMatrix::<f64>::zeros(n, 2);
    let mut obs = DVector::<f64>::zeros(n);
    for i in 0..n {
        design[(i, 0)] = 1.0;
        design[(i, 1)] = x[i];
        obs[i] = y[i];
    }

    let beta = solve_least_squares(&design, &obs)?;
    let intercept = beta[0];
    let slope = beta[1];

    // R² against the mean model.
    let mean = y.iter().sum::<f64>() / n as f64;
    let mut ss_res = 0.0;
    let mut ss_tot = 0.0;
    for i in 0..n {
        let fit = intercept + slope * x[i];
        ss_res += (y[i] - fit) * (y[i] - fit);
        ss_tot += (y[i] - mean) * (y[i] - mean);
    }
    let r_squared = if ss_tot <= f64::EPSILON {
        // Flat data: a perfect fit only if the residuals are flat too.
        if ss_res <= f64::EPSILON { 1.0 } else { 0.0 }
    } else {
        1.0 - ss_res / ss_tot
    };

    if !(slope.is_finite() && intercept.is_finite() && r_squared.is_finite()) {
        return None;
    }

    Some(LineFit {
        slope,
        intercept,
        r_squared,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn least_squares_solves_simple_system() {
        // Fit y = 2 + 3x on x = [0,1,2]
        let x = DMatrix::from_row_slice(3, 2, &[1.0, 0.0, 1.0, 1.0, 1.0, 2.0]);
        let y = DVector::from_row_slice(&[2.0, 5.0, 8.0]);

        let beta = solve_least_squares(&x, &y).unwrap();
        assert!((beta[0] - 2.0).abs() < 1e-10);
        assert!((beta[1] - 3.0).abs() < 1e-10);
    }

    #[test]
    fn fit_line_exact() {
        let x = [0.0, 0.001, 0.002, 0.003];
        let y: Vec<f64> = x.iter().map(|&e| 200_000.0 * e).collect();
        let fit = fit_line(&x, &y).unwrap();
        assert!((fit.slope - 200_000.0).abs() < 1e-6);
        assert!(fit.intercept.abs() < 1e-9);
        assert!((fit.r_squared - 1.0).abs() < 1e-12);
    }

    #[test]
    fn fit_line_rejects_degenerate_input() {
        assert!(fit_line(&[1.0], &[2.0]).is_none());
        assert!(fit_line(&[1.0, f64::NAN], &[2.0, 3.0]).is_none());
    }
}
