//! Simple and exponential moving averages.

/// Rolling mean over `window` observations.
///
/// An entry is `None` until at least `min_periods` observations are in
/// the window (a `min_periods` of 0 or 1 yields partial-window means from
/// the first element onward).
pub fn simple_moving_average(
    values: &[f64],
    window: usize,
    min_periods: usize,
) -> Vec<Option<f64>> {
    let required = min_periods.max(1);
    let mut output = Vec::with_capacity(values.len());

    for i in 0..values.len() {
        let start = (i + 1).saturating_sub(window);
        let slice = &values[start..=i];
        if slice.len() >= required {
            output.push(Some(slice.iter().sum::<f64>() / slice.len() as f64));
        } else {
            output.push(None);
        }
    }

    output
}

/// Exponentially weighted mean with span-based decay, weights adjusted
/// over the growing history (alpha = 2 / (span + 1)).
pub fn exponential_moving_average(values: &[f64], span: usize) -> Vec<f64> {
    let alpha = 2.0 / (span as f64 + 1.0);
    let decay = 1.0 - alpha;

    let mut output = Vec::with_capacity(values.len());
    let mut numerator = 0.0;
    let mut denominator = 0.0;

    for &value in values {
        numerator = value + decay * numerator;
        denominator = 1.0 + decay * denominator;
        output.push(numerator / denominator);
    }

    output
}
