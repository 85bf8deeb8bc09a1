/// Piecewise-linear interpolation over an ascending abscissa.
///
/// Outside `[xs[0], xs[n-1]]` the nearest end value is returned. A query
/// exactly on a node returns that node's value unchanged.
///
/// `xs` must be strictly increasing. Only the first `min(xs.len(), ys.len())`
/// points are used. An empty table or a `NaN` query yields `NaN`.
pub fn interp_clamped(x: f64, xs: &[f64], ys: &[f64]) -> f64 {
    let n = xs.len().min(ys.len());
    let (xs, ys) = (&xs[..n], &ys[..n]);
    if n == 0 || x.is_nan() {
        return f64::NAN;
    }
    if x <= xs[0] {
        return ys[0];
    }
    if x >= xs[n - 1] {
        return ys[n - 1];
    }

    // first index with xs[i] > x, so xs[i - 1] <= x < xs[i]
    let i = xs.partition_point(|&xi| xi <= x);
    let (x0, x1) = (xs[i - 1], xs[i]);
    let (y0, y1) = (ys[i - 1], ys[i]);
    if x == x0 {
        return y0;
    }
    y0 + (x - x0) * (y1 - y0) / (x1 - x0)
}

/// Like [`interp_clamped`] but `None` outside the abscissa range.
pub fn interp_within(x: f64, xs: &[f64], ys: &[f64]) -> Option<f64> {
    match (xs.first(), xs.last()) {
        (Some(&lo), Some(&hi)) if x >= lo && x <= hi => Some(interp_clamped(x, xs, ys)),
        _ => None,
    }
}
