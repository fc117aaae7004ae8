//! Linear interpolation and trapezoidal integration over sampled curves.

/// Linearly interpolate between `(x0, y0)` and `(x1, y1)` at `x`.
///
/// Degenerate spans (`x1 ≈ x0`) return `y0`.
pub fn lerp(a: (f64, f64), b: (f64, f64), x: f64) -> f64 {
    let (x0, y0) = a;
    let (x1, y1) = b;
    if (x1 - x0).abs() < 1e-15 {
        return y0;
    }
    let u = (x - x0) / (x1 - x0);
    y0 + u * (y1 - y0)
}

/// Sample `y(x)` from an ordered piecewise-linear curve.
///
/// Values outside the sampled range clamp to the edge samples. Returns `None`
/// on an empty curve.
pub fn sample_piecewise(xs: &[f64], ys: &[f64], x: f64) -> Option<f64> {
    if xs.is_empty() || xs.len() != ys.len() {
        return None;
    }
    if x <= xs[0] {
        return Some(ys[0]);
    }
    if x >= xs[xs.len() - 1] {
        return Some(ys[ys.len() - 1]);
    }
    for i in 1..xs.len() {
        if x <= xs[i] {
            return Some(lerp((xs[i - 1], ys[i - 1]), (xs[i], ys[i]), x));
        }
    }
    Some(ys[ys.len() - 1])
}

/// Trapezoidal integral of `y dx` over ordered samples.
///
/// Segments where `x` does not advance contribute nothing, so repeated
/// strain samples cannot inflate the result.
pub fn trapezoid(xs: &[f64], ys: &[f64]) -> f64 {
    if xs.len() < 2 || xs.len() != ys.len() {
        return 0.0;
    }
    let mut area = 0.0;
    for i in 1..xs.len() {
        let dx = xs[i] - xs[i - 1];
        if dx > 0.0 {
            area += 0.5 * (ys[i] + ys[i - 1]) * dx;
        }
    }
    area
}
