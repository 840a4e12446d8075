//! Heikin-Ashi candle transformation.

use crate::domain::ohlc::OhlcBar;

/// Derive Heikin-Ashi candles from raw OHLC bars.
///
/// Each candle's close is the mean of the source bar's OHLC; its open is
/// the mean of the previous source bar's open and close. The first input
/// bar only seeds its successor's open, so the output is one bar shorter.
pub fn heikin_ashi(bars: &[OhlcBar]) -> Vec<OhlcBar> {
    bars.windows(2)
        .map(|pair| {
            let (prev, bar) = (&pair[0], &pair[1]);
            let close = (bar.open + bar.high + bar.low + bar.close) / 4.0;
            let open = (prev.open + prev.close) / 2.0;
            OhlcBar {
                date: bar.date,
                open,
                high: bar.high.max(open).max(close),
                low: bar.low.min(open).min(close),
                close,
                volume: bar.volume,
            }
        })
        .collect()
}
