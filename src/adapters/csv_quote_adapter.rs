//! CSV quote data adapter.
//!
//! Loads one `TICKER.csv` file per ticker from a base directory into
//! memory and serves day-level price lookups from it. File layout:
//! `date,open,high,low,close,volume` with a header row.

use chrono::NaiveDate;
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};

use crate::domain::error::MarketsimError;
use crate::domain::ohlc::OhlcBar;
use crate::ports::quote_port::{PriceField, QuotePort};

#[derive(Debug)]
pub struct CsvQuoteAdapter {
    series: HashMap<String, BTreeMap<NaiveDate, OhlcBar>>,
}

impl CsvQuoteAdapter {
    /// Load the given tickers from `base_path`. Every ticker must have a
    /// readable, well-formed file; gaps within a file are fine.
    pub fn load<P: AsRef<Path>>(base_path: P, tickers: &[String]) -> Result<Self, MarketsimError> {
        let mut series = HashMap::new();
        for ticker in tickers {
            let path = csv_path(base_path.as_ref(), ticker);
            let bars = read_bars(&path)?;
            series.insert(ticker.clone(), bars);
        }
        Ok(Self { series })
    }

    /// Full bar history for a ticker, for indicator precomputation.
    pub fn bars(&self, ticker: &str) -> Vec<OhlcBar> {
        self.series
            .get(ticker)
            .map(|s| s.values().cloned().collect())
            .unwrap_or_default()
    }
}

impl QuotePort for CsvQuoteAdapter {
    fn price(&self, ticker: &str, date: NaiveDate, field: PriceField) -> Option<f64> {
        let bar = self.series.get(ticker)?.get(&date)?;
        Some(match field {
            PriceField::Open => bar.open,
            PriceField::High => bar.high,
            PriceField::Low => bar.low,
            PriceField::Close => bar.close,
        })
    }

    fn tickers(&self) -> Vec<String> {
        let mut tickers: Vec<String> = self.series.keys().cloned().collect();
        tickers.sort();
        tickers
    }
}

fn csv_path(base_path: &Path, ticker: &str) -> PathBuf {
    base_path.join(format!("{ticker}.csv"))
}

fn read_bars(path: &Path) -> Result<BTreeMap<NaiveDate, OhlcBar>, MarketsimError> {
    let content = fs::read_to_string(path).map_err(|e| MarketsimError::Data {
        reason: format!("failed to read {}: {}", path.display(), e),
    })?;

    let mut rdr = csv::Reader::from_reader(content.as_bytes());
    let mut bars = BTreeMap::new();

    for result in rdr.records() {
        let record = result.map_err(|e| MarketsimError::Data {
            reason: format!("CSV parse error in {}: {}", path.display(), e),
        })?;

        let date_str = field(&record, 0, "date", path)?;
        let date = NaiveDate::parse_from_str(&date_str, "%Y-%m-%d").map_err(|e| {
            MarketsimError::Data {
                reason: format!("invalid date in {}: {}", path.display(), e),
            }
        })?;

        let bar = OhlcBar {
            date,
            open: parse_num(&record, 1, "open", path)?,
            high: parse_num(&record, 2, "high", path)?,
            low: parse_num(&record, 3, "low", path)?,
            close: parse_num(&record, 4, "close", path)?,
            volume: parse_num::<i64>(&record, 5, "volume", path)?,
        };
        bars.insert(date, bar);
    }

    Ok(bars)
}

fn field(
    record: &csv::StringRecord,
    index: usize,
    name: &str,
    path: &Path,
) -> Result<String, MarketsimError> {
    record
        .get(index)
        .map(str::to_string)
        .ok_or_else(|| MarketsimError::Data {
            reason: format!("missing {} column in {}", name, path.display()),
        })
}

fn parse_num<T: std::str::FromStr>(
    record: &csv::StringRecord,
    index: usize,
    name: &str,
    path: &Path,
) -> Result<T, MarketsimError>
where
    T::Err: std::fmt::Display,
{
    field(record, index, name, path)?
        .parse()
        .map_err(|e| MarketsimError::Data {
            reason: format!("invalid {} value in {}: {}", name, path.display(), e),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn setup_test_data() -> TempDir {
        let dir = TempDir::new().unwrap();
        let csv_content = "date,open,high,low,close,volume\n\
            2024-01-15,100.0,110.0,90.0,105.0,50000\n\
            2024-01-16,105.0,115.0,100.0,110.0,60000\n\
            2024-01-18,110.0,120.0,105.0,115.0,55000\n";
        fs::write(dir.path().join("CCC.csv"), csv_content).unwrap();
        fs::write(
            dir.path().join("DDD.csv"),
            "date,open,high,low,close,volume\n2024-01-15,10.0,11.0,9.0,10.5,1000\n",
        )
        .unwrap();
        dir
    }

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    #[test]
    fn price_lookup_by_field() {
        let dir = setup_test_data();
        let adapter = CsvQuoteAdapter::load(dir.path(), &["CCC".into()]).unwrap();

        assert_eq!(adapter.price("CCC", date(15), PriceField::Open), Some(100.0));
        assert_eq!(adapter.price("CCC", date(15), PriceField::High), Some(110.0));
        assert_eq!(adapter.price("CCC", date(15), PriceField::Low), Some(90.0));
        assert_eq!(adapter.price("CCC", date(15), PriceField::Close), Some(105.0));
    }

    #[test]
    fn missing_day_returns_none() {
        let dir = setup_test_data();
        let adapter = CsvQuoteAdapter::load(dir.path(), &["CCC".into()]).unwrap();
        // 2024-01-17 has no row, a gap in the source data.
        assert_eq!(adapter.price("CCC", date(17), PriceField::Open), None);
    }

    #[test]
    fn unknown_ticker_returns_none() {
        let dir = setup_test_data();
        let adapter = CsvQuoteAdapter::load(dir.path(), &["CCC".into()]).unwrap();
        assert_eq!(adapter.price("XYZ", date(15), PriceField::Open), None);
    }

    #[test]
    fn missing_file_is_a_data_error() {
        let dir = setup_test_data();
        let err = CsvQuoteAdapter::load(dir.path(), &["XYZ".into()]).unwrap_err();
        assert!(matches!(err, MarketsimError::Data { .. }));
    }

    #[test]
    fn malformed_row_is_a_data_error() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("BAD.csv"),
            "date,open,high,low,close,volume\n2024-01-15,not_a_number,1,1,1,1\n",
        )
        .unwrap();
        let err = CsvQuoteAdapter::load(dir.path(), &["BAD".into()]).unwrap_err();
        assert!(matches!(err, MarketsimError::Data { reason } if reason.contains("open")));
    }

    #[test]
    fn tickers_sorted() {
        let dir = setup_test_data();
        let adapter = CsvQuoteAdapter::load(dir.path(), &["DDD".into(), "CCC".into()]).unwrap();
        assert_eq!(adapter.tickers(), vec!["CCC", "DDD"]);
    }

    #[test]
    fn bars_sorted_by_date() {
        let dir = setup_test_data();
        let adapter = CsvQuoteAdapter::load(dir.path(), &["CCC".into()]).unwrap();
        let bars = adapter.bars("CCC");
        assert_eq!(bars.len(), 3);
        assert_eq!(bars[0].date, date(15));
        assert_eq!(bars[2].date, date(18));
    }
}
