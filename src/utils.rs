use crate::Result;
use time::{Date, Month, OffsetDateTime};

fn year_bounds(year: i32) -> Result<(OffsetDateTime, OffsetDateTime)> {
    let start = Date::from_calendar_date(year, Month::January, 1)?;
    let end = Date::from_calendar_date(year + 1, Month::January, 1)?;
    Ok((start.midnight().assume_utc(), end.midnight().assume_utc()))
}

// Convert from year in decimal form (2020.5) to unix timestamp
pub fn decimal_year_to_unix_timestamp(decimal_year: f64) -> Result<i64> {
    let year = decimal_year.floor();
    let (start, end) = year_bounds(year as i32)?;
    let seconds_in_year = (end - start).whole_seconds() as f64;
    Ok(start.unix_timestamp() + ((decimal_year - year) * seconds_in_year) as i64)
}

pub fn unix_timestamp_to_decimal_year(unix: i64) -> Result<f64> {
    unix_millis_to_decimal_year(unix.saturating_mul(1000))
}

pub fn unix_millis_to_decimal_year(time_ms: i64) -> Result<f64> {
    let at = OffsetDateTime::from_unix_timestamp_nanos(time_ms as i128 * 1_000_000)?;
    let (start, end) = year_bounds(at.year())?;
    let fraction = (at - start).as_seconds_f64() / (end - start).as_seconds_f64();
    Ok(at.year() as f64 + fraction)
}
