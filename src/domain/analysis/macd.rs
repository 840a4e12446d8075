//! Moving Average Convergence Divergence.

use super::moving_average::exponential_moving_average;

#[derive(Debug, Clone, PartialEq)]
pub struct MacdSeries {
    pub macd: Vec<f64>,
    pub signal: Vec<f64>,
    pub histogram: Vec<f64>,
}

/// MACD line (fast EMA minus slow EMA), its signal EMA, and the
/// histogram between the two. Conventional periods are 12/26/9.
pub fn macd(closes: &[f64], fast: usize, slow: usize, signal_span: usize) -> MacdSeries {
    let ema_fast = exponential_moving_average(closes, fast);
    let ema_slow = exponential_moving_average(closes, slow);

    let macd_line: Vec<f64> = ema_fast
        .iter()
        .zip(&ema_slow)
        .map(|(f, s)| f - s)
        .collect();
    let signal = exponential_moving_average(&macd_line, signal_span);
    let histogram: Vec<f64> = macd_line.iter().zip(&signal).map(|(m, s)| m - s).collect();

    MacdSeries {
        macd: macd_line,
        signal,
        histogram,
    }
}
