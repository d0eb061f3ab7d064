//! Month arithmetic for monthly series

use crate::error::{ForecastError, Result};
use chrono::{Datelike, Months, NaiveDate};

/// First day of the month containing `date`
pub fn month_start(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// Shift a date by a number of months
pub fn add_months(date: NaiveDate, months: u32) -> Result<NaiveDate> {
    date.checked_add_months(Months::new(months))
        .ok_or_else(|| ForecastError::DataError(format!("Date out of range: {}", date)))
}

/// Whole months from `from` to `to`, ignoring days
pub fn months_between(from: NaiveDate, to: NaiveDate) -> i64 {
    (to.year() as i64 - from.year() as i64) * 12 + to.month() as i64 - from.month() as i64
}

/// Step in months between the last two dates; one month when it cannot be inferred
pub fn infer_step_months(dates: &[NaiveDate]) -> u32 {
    match dates {
        [.., previous, last] => match months_between(*previous, *last) {
            step if step >= 1 => step as u32,
            _ => 1,
        },
        _ => 1,
    }
}

/// The `horizon` dates following the last observation at the observed cadence.
///
/// Fails with `InvalidHorizon` when the final date falls outside the
/// representable calendar.
pub fn forecast_dates(dates: &[NaiveDate], horizon: usize) -> Result<Vec<NaiveDate>> {
    let last = dates
        .last()
        .copied()
        .ok_or(ForecastError::EmptyData)?;
    let step = infer_step_months(dates);
    let start = month_start(last);

    let out_of_range = || {
        ForecastError::InvalidHorizon(format!(
            "{} periods after {} is beyond the supported date range",
            horizon, last
        ))
    };
    let span = u32::try_from(horizon)
        .ok()
        .and_then(|h| h.checked_mul(step))
        .ok_or_else(out_of_range)?;
    start
        .checked_add_months(Months::new(span))
        .ok_or_else(out_of_range)?;

    let mut result = Vec::new();
    let mut current = start;
    for _ in 0..horizon {
        current = add_months(current, step)?;
        result.push(current);
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[rstest]
    #[case(date(2023, 3, 17), date(2023, 3, 1))]
    #[case(date(2024, 2, 29), date(2024, 2, 1))]
    #[case(date(2024, 1, 1), date(2024, 1, 1))]
    fn test_month_start(#[case] input: NaiveDate, #[case] expected: NaiveDate) {
        assert_eq!(month_start(input), expected);
    }

    #[test]
    fn test_forecast_dates_cross_year() {
        let history = vec![date(2023, 11, 1), date(2023, 12, 1)];
        let dates = forecast_dates(&history, 3).unwrap();
        assert_eq!(dates, vec![date(2024, 1, 1), date(2024, 2, 1), date(2024, 3, 1)]);
    }

    #[test]
    fn test_single_date_defaults_to_monthly() {
        let dates = forecast_dates(&[date(2020, 5, 1)], 2).unwrap();
        assert_eq!(dates, vec![date(2020, 6, 1), date(2020, 7, 1)]);
    }

    #[test]
    fn test_infer_step() {
        assert_eq!(infer_step_months(&[]), 1);
        assert_eq!(infer_step_months(&[date(2020, 1, 1), date(2020, 4, 1)]), 3);
        assert_eq!(infer_step_months(&[date(2020, 4, 1), date(2020, 4, 1)]), 1);
        assert_eq!(months_between(date(2022, 11, 1), date(2023, 2, 1)), 3);
    }

    #[test]
    fn test_horizon_past_calendar_end() {
        let history = vec![date(2023, 11, 1), date(2023, 12, 1)];
        for horizon in [usize::MAX, u32::MAX as usize, 4_000_000] {
            assert!(matches!(
                forecast_dates(&history, horizon),
                Err(ForecastError::InvalidHorizon(_))
            ));
        }
    }

    #[test]
    fn test_empty_history() {
        assert!(matches!(
            forecast_dates(&[], 3),
            Err(ForecastError::EmptyData)
        ));
    }
}
