//! Clock strings.
//!
//! Subtitle cues (`01:02:03,450`, `02:03.5`, `12`) become seconds, and
//! window bounds (`18:30`) become a [`NaiveTime`].

use chrono::NaiveTime;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum TimestampError {
    #[error("Timestamp cannot be empty")]
    Empty,

    #[error("Timestamp cannot be negative")]
    Negative,

    #[error("Bad {0} field in timestamp: {1}")]
    InvalidValue(&'static str, String),

    #[error("Unrecognised timestamp '{0}'")]
    InvalidFormat(String),
}

const FIELDS: [&str; 3] = ["hours", "minutes", "seconds"];

/// Seconds represented by a cue timestamp.
///
/// Up to three colon-separated fields are read from the right, so `90`,
/// `1:30` and `0:01:30` agree. A comma works as the decimal point.
///
/// ```
/// use reelcut_models::timestamp::parse_timestamp;
/// assert_eq!(parse_timestamp("00:00:01,500").unwrap(), 1.5);
/// assert_eq!(parse_timestamp("1:30").unwrap(), 90.0);
/// ```
pub fn parse_timestamp(ts: &str) -> Result<f64, TimestampError> {
    let ts = ts.trim();
    if ts.is_empty() {
        return Err(TimestampError::Empty);
    }

    let dotted = ts.replace(',', ".");
    let fields: Vec<&str> = dotted.split(':').collect();
    let Some(skip) = FIELDS.len().checked_sub(fields.len()) else {
        return Err(TimestampError::InvalidFormat(ts.to_string()));
    };

    fields
        .iter()
        .zip(&FIELDS[skip..])
        .try_fold(0.0, |acc, (field, name)| {
            let value: f64 = field
                .parse()
                .map_err(|_| TimestampError::InvalidValue(name, field.to_string()))?;
            if value < 0.0 {
                return Err(TimestampError::Negative);
            }
            Ok(acc * 60.0 + value)
        })
}

/// A 24-hour `HH:MM` wall-clock time.
pub fn parse_time_of_day(s: &str) -> Result<NaiveTime, TimestampError> {
    match s.trim() {
        "" => Err(TimestampError::Empty),
        s => NaiveTime::parse_from_str(s, "%H:%M")
            .map_err(|_| TimestampError::InvalidFormat(s.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cue_timestamps() {
        assert_eq!(parse_timestamp("01:30:45").unwrap(), 5445.0);
        assert_eq!(parse_timestamp("05:30").unwrap(), 330.0);
        assert_eq!(parse_timestamp(" 7 ").unwrap(), 7.0);
        assert!((parse_timestamp("00:01:02,250").unwrap() - 62.25).abs() < 1e-9);
    }

    #[test]
    fn test_bad_cue_timestamps() {
        assert_eq!(parse_timestamp(""), Err(TimestampError::Empty));
        assert_eq!(parse_timestamp("-5"), Err(TimestampError::Negative));
        assert!(matches!(parse_timestamp("1:2:3:4"), Err(TimestampError::InvalidFormat(_))));
        assert!(matches!(
            parse_timestamp("00:xx:01"),
            Err(TimestampError::InvalidValue("minutes", _))
        ));
    }

    #[test]
    fn test_time_of_day() {
        assert_eq!(
            parse_time_of_day("18:30").unwrap(),
            NaiveTime::from_hms_opt(18, 30, 0).unwrap()
        );
        assert!(parse_time_of_day("24:00").is_err());
        assert_eq!(parse_time_of_day("  "), Err(TimestampError::Empty));
    }
}
