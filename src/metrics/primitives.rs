//! Stateless numeric primitives used by the metrics engine.
//!
//! These are pure functions over slices of `f64`. NaN values are skipped, and
//! an input with no usable values yields `None` rather than a made-up zero.

use ordered_float::OrderedFloat;

fn valid(values: &[f64]) -> impl Iterator<Item = f64> + '_ {
    values.iter().copied().filter(|v| !v.is_nan())
}

/// Sum of the available (non-NaN) values.
pub fn sum(values: &[f64]) -> Option<f64> {
    let mut count = 0usize;
    let total = valid(values).fold(0.0, |acc, value| {
        count += 1;
        acc + value
    });
    (count > 0).then_some(total)
}

/// Arithmetic mean of the available (non-NaN) values.
pub fn mean(values: &[f64]) -> Option<f64> {
    let mut count = 0usize;
    let total = valid(values).fold(0.0, |acc, value| {
        count += 1;
        acc + value
    });
    (count > 0).then(|| total / count as f64)
}

/// Quantile with linear interpolation between closest ranks.
///
/// `q` is clamped to `[0, 1]`. For sorted values `v` of length `n` the result
/// is `v[i] + (v[i + 1] - v[i]) * f` where `i + f = q * (n - 1)`.
pub fn quantile(values: &[f64], q: f64) -> Option<f64> {
    let mut sorted: Vec<OrderedFloat<f64>> = valid(values).map(OrderedFloat).collect();
    if sorted.is_empty() || q.is_nan() {
        return None;
    }
    sorted.sort_unstable();

    let position = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    let fraction = position - lower as f64;

    let low = sorted[lower].into_inner();
    let high = sorted[upper].into_inner();
    Some(low + (high - low) * fraction)
}

/// Least-squares line through `(index, value)` points.
///
/// Returns `(slope, intercept)`. A single point yields a flat line through it.
pub fn linear_fit(values: &[f64]) -> Option<(f64, f64)> {
    let points: Vec<(f64, f64)> = values
        .iter()
        .enumerate()
        .filter(|(_, v)| !v.is_nan())
        .map(|(i, v)| (i as f64, *v))
        .collect();

    match points.len() {
        0 => None,
        1 => Some((0.0, points[0].1)),
        n => {
            let n = n as f64;
            let mean_x = points.iter().map(|(x, _)| x).sum::<f64>() / n;
            let mean_y = points.iter().map(|(_, y)| y).sum::<f64>() / n;
            let covariance: f64 = points
                .iter()
                .map(|(x, y)| (x - mean_x) * (y - mean_y))
                .sum();
            let variance: f64 = points.iter().map(|(x, _)| (x - mean_x).powi(2)).sum();
            let slope = covariance / variance;
            Some((slope, mean_y - slope * mean_x))
        }
    }
}
