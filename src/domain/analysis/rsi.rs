//! Relative Strength Index.
//!
//! Up/down moves are smoothed with alpha = 1/window (not the span-based
//! 2/(n+1)), then RSI = 100 - 100 / (1 + RS).

/// RSI over closing prices. The first value treats the initial close as
/// an upward move from zero, so the series starts at 100 and settles as
/// history accumulates.
pub fn relative_strength_index(closes: &[f64], window: usize) -> Vec<f64> {
    if closes.is_empty() || window == 0 {
        return Vec::new();
    }

    let alpha = 1.0 / window as f64;
    let mut output = Vec::with_capacity(closes.len());
    let mut smma_up = 0.0;
    let mut smma_down = 0.0;

    for (i, &close) in closes.iter().enumerate() {
        let prev = if i == 0 { 0.0 } else { closes[i - 1] };
        let up = (close - prev).max(0.0);
        let down = (prev - close).max(0.0);

        if i == 0 {
            smma_up = up;
            smma_down = down;
        } else {
            smma_up = (1.0 - alpha) * smma_up + alpha * up;
            smma_down = (1.0 - alpha) * smma_down + alpha * down;
        }

        let rsi = if smma_down == 0.0 {
            100.0
        } else {
            let rs = smma_up / smma_down;
            100.0 - 100.0 / (1.0 + rs)
        };
        output.push(rsi);
    }

    output
}

/// Days on which the RSI crosses a threshold line while rising.
pub fn rsi_rise_signals(rsi: &[f64], cross_line: f64) -> Vec<bool> {
    cross_signals(rsi, cross_line, true)
}

/// Days on which the RSI crosses a threshold line while falling.
pub fn rsi_fall_signals(rsi: &[f64], cross_line: f64) -> Vec<bool> {
    cross_signals(rsi, cross_line, false)
}

fn cross_signals(rsi: &[f64], cross_line: f64, rising: bool) -> Vec<bool> {
    let mut output = vec![false; rsi.len()];
    for i in 1..rsi.len() {
        output[i] = if rising {
            rsi[i - 1] < cross_line && rsi[i] >= cross_line
        } else {
            rsi[i - 1] > cross_line && rsi[i] <= cross_line
        };
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input() {
        assert!(relative_strength_index(&[], 14).is_empty());
    }

    #[test]
    fn all_gains_stay_at_100() {
        let closes = [1.0, 2.0, 3.0, 4.0];
        let rsi = relative_strength_index(&closes, 14);
        for v in rsi {
            assert!((v - 100.0).abs() < f64::EPSILON);
        }
    }

    #[test]
    fn losses_pull_rsi_below_50() {
        let closes = [100.0, 90.0, 80.0, 70.0];
        let rsi = relative_strength_index(&closes, 14);
        // First value counts the initial close as a gain; after that the
        // steady losses dominate.
        assert!(rsi[3] < 50.0);
    }

    #[test]
    fn rsi_bounded() {
        let closes = [100.0, 105.0, 95.0, 110.0, 90.0, 100.0];
        for v in relative_strength_index(&closes, 3) {
            assert!((0.0..=100.0).contains(&v));
        }
    }

    #[test]
    fn rise_signal_on_upward_cross() {
        let rsi = [20.0, 25.0, 35.0, 40.0];
        let signals = rsi_rise_signals(&rsi, 30.0);
        assert_eq!(signals, vec![false, false, true, false]);
    }

    #[test]
    fn fall_signal_on_downward_cross() {
        let rsi = [80.0, 75.0, 65.0, 60.0];
        let signals = rsi_fall_signals(&rsi, 70.0);
        assert_eq!(signals, vec![false, false, true, false]);
    }
}
