//! CSV output for valuation history.

use std::fs::File;
use std::path::Path;

use crate::domain::error::MarketsimError;
use crate::domain::simulator::ValuationSnapshot;

/// Write the day-by-day portfolio value as `date,total_value` rows.
pub fn write_history<P: AsRef<Path>>(
    path: P,
    history: &[ValuationSnapshot],
) -> Result<(), MarketsimError> {
    let file = File::create(path.as_ref())?;
    let mut wtr = csv::Writer::from_writer(file);

    wtr.write_record(["date", "total_value"])
        .map_err(csv_error)?;
    for snapshot in history {
        wtr.write_record([
            snapshot.date.format("%Y-%m-%d").to_string(),
            format!("{:.2}", snapshot.total_value),
        ])
        .map_err(csv_error)?;
    }
    wtr.flush()?;
    Ok(())
}

fn csv_error(e: csv::Error) -> MarketsimError {
    MarketsimError::Data {
        reason: format!("CSV write error: {e}"),
    }
}
