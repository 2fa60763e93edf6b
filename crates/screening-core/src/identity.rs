//! Identity normalization.
//!
//! Every pipeline that compares patients (source loading, corrections, the
//! write-back lookup) goes through [`normalize`]. Two records describe the same
//! patient iff their normalized identities are equal, so this module must stay
//! deterministic: the same raw input always yields the same key.

use jiff::civil::{Date, DateTime, Time};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::IdentityError;

/// The join key used to correlate records across independently submitted forms.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Identity {
    /// Trimmed, case preserved.
    pub full_name: String,
    pub date_of_birth: Date,
}

impl Identity {
    /// Calendar age of this patient on `today`.
    pub fn age_on(&self, today: Date) -> u32 {
        age_on(self.date_of_birth, today)
    }

    /// Date of birth in the `DD.MM.YYYY` form used by the forms and the
    /// correction sheet.
    pub fn display_date_of_birth(&self) -> String {
        display_date(self.date_of_birth)
    }
}

/// Normalize a raw name and date of birth into an [`Identity`].
///
/// The name is trimmed; the date is parsed day-first (see
/// [`parse_date_day_first`]). An empty name or an unparsable date makes the
/// record unidentifiable.
pub fn normalize(raw_name: &str, raw_date: &str) -> Result<Identity, IdentityError> {
    let full_name = raw_name.trim();
    if full_name.is_empty() {
        return Err(IdentityError::MissingName);
    }

    let date_of_birth = parse_date_day_first(raw_date)?;

    Ok(Identity {
        full_name: full_name.to_string(),
        date_of_birth,
    })
}

/// Parse a date written day-first.
///
/// Accepts `D.M.YYYY`, `D/M/YYYY` and `D-M-YYYY`, plus ISO `YYYY-MM-DD` so an
/// already-normalized date parses back to itself. A trailing time component
/// (`01.02.1970 00:00:00`, `1970-02-01T00:00`) is ignored.
pub fn parse_date_day_first(raw: &str) -> Result<Date, IdentityError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(IdentityError::MissingDate);
    }

    let (date_part, _) = split_date_time(trimmed);
    parse_date_part(date_part).ok_or_else(|| IdentityError::UnparsableDate(trimmed.to_string()))
}

/// Parse a form submission timestamp (`18.10.2026 14:05:33`).
///
/// Returns `None` when either part is unreadable. A missing time part means
/// midnight.
pub fn parse_timestamp(raw: &str) -> Option<DateTime> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    let (date_part, time_part) = split_date_time(trimmed);
    let date = parse_date_part(date_part)?;
    let time = match time_part {
        Some(t) => parse_time_part(t)?,
        None => Time::midnight(),
    };
    Some(date.to_datetime(time))
}

/// Calendar age: years elapsed, minus one if the birthday has not happened yet
/// this year. Birth dates after `today` give 0.
pub fn age_on(date_of_birth: Date, today: Date) -> u32 {
    let mut age = i32::from(today.year()) - i32::from(date_of_birth.year());
    if (today.month(), today.day()) < (date_of_birth.month(), date_of_birth.day()) {
        age -= 1;
    }
    u32::try_from(age).unwrap_or(0)
}

/// Format a date as `DD.MM.YYYY`.
pub fn display_date(date: Date) -> String {
    date.strftime("%d.%m.%Y").to_string()
}

fn split_date_time(raw: &str) -> (&str, Option<&str>) {
    match raw.find([' ', 'T']) {
        Some(idx) => {
            let time = raw[idx + 1..].trim();
            (&raw[..idx], (!time.is_empty()).then_some(time))
        }
        None => (raw, None),
    }
}

fn parse_date_part(raw: &str) -> Option<Date> {
    let parts: Vec<&str> = raw.split(['.', '/', '-']).collect();
    if parts.len() != 3
        || parts
            .iter()
            .any(|p| p.is_empty() || !p.chars().all(|c| c.is_ascii_digit()))
    {
        return None;
    }

    // Year-first only when the first field is a full year; everything else is
    // read day-first.
    let (year, month, day) = if parts[0].len() == 4 {
        (parts[0], parts[1], parts[2])
    } else if parts[2].len() == 4 {
        (parts[2], parts[1], parts[0])
    } else {
        return None;
    };

    let year: i16 = year.parse().ok()?;
    let month: i8 = month.parse().ok()?;
    let day: i8 = day.parse().ok()?;
    Date::new(year, month, day).ok()
}

fn parse_time_part(raw: &str) -> Option<Time> {
    let mut fields = raw.split(':');
    let hour: i8 = fields.next()?.trim().parse().ok()?;
    let minute: i8 = fields.next()?.trim().parse().ok()?;
    let second: i8 = match fields.next() {
        // Drop fractional seconds.
        Some(s) => s.trim().split('.').next()?.parse().ok()?,
        None => 0,
    };
    if fields.next().is_some() {
        return None;
    }
    Time::new(hour, minute, second, 0).ok()
}
