use crate::models::{DueDate, DueTime};
use chrono::{NaiveDate, NaiveDateTime};
use thiserror::Error;

pub const DEFAULT_DUE_HOUR: u32 = 23;
pub const DEFAULT_DUE_MINUTE: u32 = 59;

#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
#[error("invalid due instant {year:04}-{month:02}-{day:02} {hour:02}:{minute:02}")]
pub struct InvalidDueDate {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub hour: u32,
    pub minute: u32,
}

/// Resolve a due date/time descriptor into a local wall-clock instant.
///
/// Returns `Ok(None)` when there is no due date. A missing time, or a missing
/// hour/minute within it, falls back to 23:59.
pub fn resolve(
    due_date: Option<&DueDate>,
    due_time: Option<&DueTime>,
) -> Result<Option<NaiveDateTime>, InvalidDueDate> {
    let Some(date) = due_date else {
        return Ok(None);
    };

    let hour = due_time.and_then(|t| t.hours).unwrap_or(DEFAULT_DUE_HOUR);
    let minute = due_time.and_then(|t| t.minutes).unwrap_or(DEFAULT_DUE_MINUTE);

    let invalid = InvalidDueDate {
        year: date.year,
        month: date.month,
        day: date.day,
        hour,
        minute,
    };

    NaiveDate::from_ymd_opt(date.year, date.month, date.day)
        .and_then(|d| d.and_hms_opt(hour, minute, 0))
        .map(Some)
        .ok_or(invalid)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(year: i32, month: u32, day: u32) -> DueDate {
        DueDate { year, month, day }
    }

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    }

    #[test]
    fn absent_date_is_absent() {
        let time = DueTime { hours: Some(10), minutes: Some(0) };
        assert_eq!(resolve(None, Some(&time)), Ok(None));
        assert_eq!(resolve(None, None), Ok(None));
    }

    #[test]
    fn missing_time_defaults_to_end_of_day() {
        let resolved = resolve(Some(&date(2024, 1, 10)), None).unwrap();
        assert_eq!(resolved, Some(at(2024, 1, 10, 23, 59)));
    }

    #[test]
    fn month_is_one_indexed() {
        let resolved = resolve(Some(&date(2024, 12, 31)), None).unwrap();
        assert_eq!(resolved, Some(at(2024, 12, 31, 23, 59)));
    }

    #[test]
    fn explicit_time_is_used() {
        let time = DueTime { hours: Some(9), minutes: Some(30) };
        let resolved = resolve(Some(&date(2024, 3, 5)), Some(&time)).unwrap();
        assert_eq!(resolved, Some(at(2024, 3, 5, 9, 30)));
    }

    #[test]
    fn missing_fields_default_individually() {
        let hours_only = DueTime { hours: Some(14), minutes: None };
        assert_eq!(
            resolve(Some(&date(2024, 3, 5)), Some(&hours_only)).unwrap(),
            Some(at(2024, 3, 5, 14, 59))
        );

        let minutes_only = DueTime { hours: None, minutes: Some(15) };
        assert_eq!(
            resolve(Some(&date(2024, 3, 5)), Some(&minutes_only)).unwrap(),
            Some(at(2024, 3, 5, 23, 15))
        );

        assert_eq!(
            resolve(Some(&date(2024, 3, 5)), Some(&DueTime::default())).unwrap(),
            Some(at(2024, 3, 5, 23, 59))
        );
    }

    #[test]
    fn out_of_range_fields_are_invalid() {
        assert!(resolve(Some(&date(2024, 13, 1)), None).is_err());
        assert!(resolve(Some(&date(2023, 2, 29)), None).is_err());

        let bad_time = DueTime { hours: Some(24), minutes: Some(0) };
        let err = resolve(Some(&date(2024, 1, 1)), Some(&bad_time)).unwrap_err();
        assert_eq!(err.hour, 24);
    }
}
