//! Loading and preparing uploaded observations

use crate::calendar::{add_months, month_start};
use crate::error::{ForecastError, Result};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::Cursor;
use std::path::Path;
use tracing::debug;

const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];

const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
];

/// A single dated observation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub date: NaiveDate,
    pub value: f64,
}

/// Monthly series with one observation per month start and no gaps
#[derive(Debug, Clone, PartialEq)]
pub struct ObservationTable {
    dates: Vec<NaiveDate>,
    values: Vec<f64>,
}

/// Data loader for uploaded CSV tables
#[derive(Debug)]
pub struct DataLoader;

impl DataLoader {
    /// Load a CSV file with a header row
    pub fn from_csv<P: AsRef<Path>>(path: P) -> Result<DataFrame> {
        let file = File::open(path)?;
        let df = CsvReader::new(file)
            .infer_schema(None)
            .has_header(true)
            .finish()?;

        Ok(df)
    }

    /// Parse an in-memory CSV upload with a header row
    pub fn read_csv_bytes(bytes: &[u8]) -> Result<DataFrame> {
        let df = CsvReader::new(Cursor::new(bytes.to_vec()))
            .infer_schema(None)
            .has_header(true)
            .finish()?;

        Ok(df)
    }
}

/// Parse a timestamp in one of the accepted formats, keeping only the date
pub fn parse_date(raw: &str) -> Result<NaiveDate> {
    let text = raw.trim();

    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(text, format) {
            return Ok(date);
        }
    }

    for format in DATETIME_FORMATS {
        if let Ok(datetime) = NaiveDateTime::parse_from_str(text, format) {
            return Ok(datetime.date());
        }
    }

    if let Ok(datetime) = DateTime::parse_from_rfc3339(text) {
        return Ok(datetime.date_naive());
    }

    // Year-month only
    if let Ok(date) = NaiveDate::parse_from_str(&format!("{}-01", text), "%Y-%m-%d") {
        return Ok(date);
    }

    Err(ForecastError::DataError(format!(
        "Unrecognised date '{}'",
        raw
    )))
}

impl ObservationTable {
    /// Prepare the designated columns of an uploaded table.
    ///
    /// Rows missing either a timestamp or a value are dropped, the rest are
    /// sorted and bucketed to month starts (the last row in a month wins),
    /// and months without data are forward-filled from the previous month.
    pub fn prepare(df: &DataFrame, date_column: &str, value_column: &str) -> Result<Self> {
        let column_names = df.get_column_names();
        for name in [date_column, value_column] {
            if !column_names.contains(&name) {
                return Err(ForecastError::MissingColumn(name.to_string()));
            }
        }

        let dates = df.column(date_column)?.cast(&DataType::Utf8)?;
        let values = df.column(value_column)?.cast(&DataType::Float64)?;

        let mut observations = Vec::with_capacity(df.height());
        for (date, value) in dates.utf8()?.into_iter().zip(values.f64()?.into_iter()) {
            let (Some(date), Some(value)) = (date, value) else {
                continue;
            };
            if date.trim().is_empty() || !value.is_finite() {
                continue;
            }

            observations.push(Observation {
                date: parse_date(date)?,
                value,
            });
        }

        debug!(
            rows = df.height(),
            kept = observations.len(),
            "Cleaned uploaded observations"
        );

        Self::from_observations(observations)
    }

    /// Build a monthly table from observations in any order
    pub fn from_observations(mut observations: Vec<Observation>) -> Result<Self> {
        // Stable, so rows sharing a date keep upload order
        observations.sort_by_key(|o| o.date);

        let mut by_month = BTreeMap::new();
        for observation in &observations {
            by_month.insert(month_start(observation.date), observation.value);
        }

        let (first, last) = match (by_month.keys().next(), by_month.keys().next_back()) {
            (Some(first), Some(last)) => (*first, *last),
            _ => return Err(ForecastError::EmptyData),
        };

        let mut dates = Vec::new();
        let mut values = Vec::new();
        let mut current = first;
        let mut carried = by_month[&first];
        while current <= last {
            if let Some(value) = by_month.get(&current) {
                carried = *value;
            }
            dates.push(current);
            values.push(carried);
            current = add_months(current, 1)?;
        }

        Ok(Self { dates, values })
    }

    /// Month-start dates
    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    /// Observed values aligned with `dates`
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Date of the final observation
    pub fn last_date(&self) -> Option<NaiveDate> {
        self.dates.last().copied()
    }

    /// Final observed value
    pub fn last_value(&self) -> Option<f64> {
        self.values.last().copied()
    }

    /// Observations as dated pairs
    pub fn observations(&self) -> Vec<Observation> {
        self.dates
            .iter()
            .zip(&self.values)
            .map(|(&date, &value)| Observation { date, value })
            .collect()
    }

    /// Number of months in the table
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if the table is empty
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn prepare(csv: &str) -> Result<ObservationTable> {
        let df = DataLoader::read_csv_bytes(csv.as_bytes())?;
        ObservationTable::prepare(&df, "date", "sales")
    }

    #[rstest]
    #[case("2023-04-15", date(2023, 4, 15))]
    #[case("2023/04/15", date(2023, 4, 15))]
    #[case("04/15/2023", date(2023, 4, 15))]
    #[case("2023-04", date(2023, 4, 1))]
    #[case("2023-04-15 10:30:00", date(2023, 4, 15))]
    #[case("2023-04-15T10:30:00", date(2023, 4, 15))]
    #[case("2023-04-15T10:30:00.250", date(2023, 4, 15))]
    #[case("2023-04-15T10:30:00+02:00", date(2023, 4, 15))]
    #[case("  2023-04-15 ", date(2023, 4, 15))]
    fn test_parse_date(#[case] raw: &str, #[case] expected: NaiveDate) {
        assert_eq!(parse_date(raw).unwrap(), expected);
    }

    #[test]
    fn test_parse_date_rejects_garbage() {
        let err = parse_date("yesterday").unwrap_err();
        assert!(err.to_string().contains("yesterday"));
    }

    #[test]
    fn test_prepare_buckets_to_month_start() {
        let table = prepare("date,sales\n2023-01-15,10\n2023-02-03,20\n2023-03-28,30\n").unwrap();

        assert_eq!(
            table.dates(),
            &[date(2023, 1, 1), date(2023, 2, 1), date(2023, 3, 1)]
        );
        assert_eq!(table.values(), &[10.0, 20.0, 30.0]);
    }

    #[test]
    fn test_prepare_forward_fills_gaps_and_sorts() {
        let table = prepare("date,sales\n2023-04-01,40\n2023-01-01,10\n").unwrap();

        assert_eq!(table.len(), 4);
        assert_eq!(table.values(), &[10.0, 10.0, 10.0, 40.0]);
        assert_eq!(table.last_date(), Some(date(2023, 4, 1)));
    }

    #[test]
    fn test_last_row_in_month_wins() {
        let table = prepare("date,sales\n2023-01-01,1\n2023-01-20,2\n2023-02-01,3\n").unwrap();
        assert_eq!(table.values(), &[2.0, 3.0]);
    }

    #[test]
    fn test_prepare_drops_missing_rows() {
        let table = prepare("date,sales\n2023-01-01,1\n,5\n2023-02-01,\n2023-03-01,3\n").unwrap();
        assert_eq!(table.values(), &[1.0, 1.0, 3.0]);
    }

    #[test]
    fn test_missing_column() {
        let err = prepare("when,sales\n2023-01-01,1\n").unwrap_err();
        assert!(matches!(err, ForecastError::MissingColumn(name) if name == "date"));
    }

    #[test]
    fn test_unparseable_date_is_data_error() {
        let err = prepare("date,sales\nnot-a-date,1\n").unwrap_err();
        assert!(matches!(err, ForecastError::DataError(_)));
    }

    #[test]
    fn test_empty_after_cleaning() {
        assert!(matches!(
            ObservationTable::from_observations(Vec::new()),
            Err(ForecastError::EmptyData)
        ));
    }
}
