//! Tabular export of the selected forecast

use crate::error::Result;
use crate::models::ForecastResult;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Date format used in the export
pub const EXPORT_DATE_FORMAT: &str = "%Y-%m-%d";

/// One export row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastRecord {
    /// Forecast date, `YYYY-MM-DD`
    pub ds: String,
    /// Forecast value
    pub yhat: f64,
}

/// Export rows for a model's forecast
pub fn records_from_result(result: &ForecastResult) -> Vec<ForecastRecord> {
    result
        .points
        .iter()
        .map(|point| ForecastRecord {
            ds: point.date.format(EXPORT_DATE_FORMAT).to_string(),
            yhat: point.value,
        })
        .collect()
}

/// Write records as `ds,yhat` CSV, replacing any existing file
pub fn write_forecast_csv<P: AsRef<Path>>(path: P, records: &[ForecastRecord]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;
    Ok(())
}

/// Read records written by [`write_forecast_csv`]
pub fn read_forecast_csv<P: AsRef<Path>>(path: P) -> Result<Vec<ForecastRecord>> {
    let mut reader = csv::Reader::from_path(path)?;
    let records = reader
        .deserialize()
        .collect::<std::result::Result<Vec<ForecastRecord>, csv::Error>>()?;
    Ok(records)
}
