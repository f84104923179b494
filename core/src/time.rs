use chrono::{Duration, Local, NaiveDate, NaiveTime, Timelike, Weekday, Datelike};

use crate::error::ValidationError;

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Current local time, truncated to the minute.
pub fn now_minute() -> NaiveTime {
    let now = Local::now().time();
    NaiveTime::from_hms_opt(now.hour(), now.minute(), 0).unwrap_or(now)
}

pub fn parse_report_date(input: &str) -> Result<NaiveDate, ValidationError> {
    parse_report_date_from(input, today())
}

/// Accepts `today`, `yesterday`, `-Nd`, a weekday (most recent one, today included)
/// and `YYYY-MM-DD`.
pub fn parse_report_date_from(input: &str, today: NaiveDate) -> Result<NaiveDate, ValidationError> {
    let trimmed = input.trim();
    let invalid = || ValidationError::InvalidDate(input.to_string());

    // 1. Reserved keywords
    match trimmed.to_lowercase().as_str() {
        "today" | "tod" => return Ok(today),
        "yesterday" | "yest" => return Ok(today - Duration::days(1)),
        _ => {}
    }

    // 2. Relative format (-Nd)
    if let Some(rest) = trimmed.strip_prefix('-') {
        if let Some(num_str) = rest.strip_suffix('d') {
            let days: i64 = num_str.parse().map_err(|_| invalid())?;
            return Duration::try_days(days)
                .and_then(|delta| today.checked_sub_signed(delta))
                .ok_or_else(invalid);
        }
        return Err(invalid());
    }

    // 3. Weekday
    if let Ok(weekday) = parse_weekday_str(trimmed) {
        let back = (today.weekday().num_days_from_monday() as i64
            - weekday.num_days_from_monday() as i64)
            .rem_euclid(7);
        return Ok(today - Duration::days(back));
    }

    // 4. Fallback to ISO
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d").map_err(|_| invalid())
}

pub fn parse_entry_time(input: &str) -> Result<NaiveTime, ValidationError> {
    let trimmed = input.trim();
    if trimmed.eq_ignore_ascii_case("now") {
        return Ok(now_minute());
    }
    NaiveTime::parse_from_str(trimmed, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(trimmed, "%H.%M"))
        .map_err(|_| ValidationError::InvalidTime(input.to_string()))
}

fn parse_weekday_str(s: &str) -> Result<Weekday, ()> {
    match s.to_lowercase().as_str() {
        "mon" | "monday" => Ok(Weekday::Mon),
        "tue" | "tuesday" => Ok(Weekday::Tue),
        "wed" | "wednesday" => Ok(Weekday::Wed),
        "thu" | "thursday" => Ok(Weekday::Thu),
        "fri" | "friday" => Ok(Weekday::Fri),
        "sat" | "saturday" => Ok(Weekday::Sat),
        "sun" | "sunday" => Ok(Weekday::Sun),
        _ => Err(()),
    }
}
