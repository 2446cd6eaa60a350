//! Date parsing and display formatting for forecast values.
//!
//! The API sends two date granularities: `YYYY-MM-DD` for daily series and
//! `YYYY-MM-DDTHH:mm` for current conditions. Neither carries an offset; both
//! are read as naive UTC so day and hour values never move with the host's
//! local timezone.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};

use crate::types::WeatherError;

const DAILY_FORMAT: &str = "%Y-%m-%d";
const INSTANT_FORMAT: &str = "%Y-%m-%dT%H:%M";

// `d` stands for one ASCII digit, every other byte must match literally.
const DAILY_SHAPE: &str = "dddd-dd-dd";
const INSTANT_SHAPE: &str = "dddd-dd-ddTdd:dd";

fn matches_shape(s: &str, shape: &str) -> bool {
    s.len() == shape.len()
        && s.bytes().zip(shape.bytes()).all(|(c, p)| match p {
            b'd' => c.is_ascii_digit(),
            _ => c == p,
        })
}

/// Parse a daily series date (`YYYY-MM-DD`).
pub fn parse_daily_date(s: &str) -> Result<NaiveDate, WeatherError> {
    if !matches_shape(s, DAILY_SHAPE) {
        return Err(WeatherError::MalformedDate(format!("expected YYYY-MM-DD, got {s:?}")));
    }
    NaiveDate::parse_from_str(s, DAILY_FORMAT)
        .map_err(|e| WeatherError::MalformedDate(format!("{s:?}: {e}")))
}

/// Parse a current-conditions timestamp (`YYYY-MM-DDTHH:mm`) as UTC.
pub fn parse_instant(s: &str) -> Result<DateTime<Utc>, WeatherError> {
    if !matches_shape(s, INSTANT_SHAPE) {
        return Err(WeatherError::MalformedDate(format!(
            "expected YYYY-MM-DDTHH:mm, got {s:?}"
        )));
    }
    let naive = NaiveDateTime::parse_from_str(s, INSTANT_FORMAT)
        .map_err(|e| WeatherError::MalformedDate(format!("{s:?}: {e}")))?;
    Ok(Utc.from_utc_datetime(&naive))
}

/// Whole hours and remaining minutes of a duration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HoursMinutes {
    pub hours: u64,
    pub minutes: u64,
}

impl std::fmt::Display for HoursMinutes {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}h {}min", self.hours, self.minutes)
    }
}

/// Split a number of seconds into hours and minutes, truncating leftovers.
///
/// Negative and non-finite inputs count as zero.
pub fn seconds_to_hours_minutes(total_seconds: f64) -> HoursMinutes {
    if !total_seconds.is_finite() || total_seconds <= 0.0 {
        return HoursMinutes::default();
    }
    let total = total_seconds.trunc() as u64;
    HoursMinutes {
        hours: total / 3600,
        minutes: (total % 3600) / 60,
    }
}

/// Round to a whole number for display, e.g. `12.6` -> `"13"`.
pub fn format_rounded(n: f64) -> String {
    normalize_negative_zero(format!("{n:.0}"))
}

/// One decimal followed by a degree sign, e.g. `"12.3°"`.
pub fn format_temperature(n: f64) -> String {
    format!("{}°", format_one_decimal(n))
}

/// One decimal, used for rain amounts and wind speed.
pub fn format_one_decimal(n: f64) -> String {
    normalize_negative_zero(format!("{n:.1}"))
}

/// Two decimals, used for pressure.
pub fn format_pressure(n: f64) -> String {
    normalize_negative_zero(format!("{n:.2}"))
}

/// `dd-MM-yyyy--HH:mm`
pub fn format_timestamp(time: &DateTime<Utc>) -> String {
    time.format("%d-%m-%Y--%H:%M").to_string()
}

fn normalize_negative_zero(s: String) -> String {
    if s.starts_with('-') && s[1..].bytes().all(|b| b == b'0' || b == b'.') {
        s[1..].to_string()
    } else {
        s
    }
}

/// `deserialize_with` adapters for the two API date formats.
pub(crate) mod serde_dates {
    use chrono::{DateTime, NaiveDate, Utc};
    use serde::{Deserialize, Deserializer};

    pub fn instant<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        super::parse_instant(&s).map_err(serde::de::Error::custom)
    }

    pub fn daily_dates<'de, D>(deserializer: D) -> Result<Vec<NaiveDate>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Vec::<String>::deserialize(deserializer)?;
        raw.iter()
            .map(|s| super::parse_daily_date(s).map_err(serde::de::Error::custom))
            .collect()
    }
}
