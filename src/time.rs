//! Timestamp parsing for Timesheet exports.
//!
//! Timesheet writes local times with a numeric UTC offset, e.g.
//! `2020-01-01T10:00:00-0300`. The offset may or may not carry a colon; both
//! forms normalize to `±HH:MM` before parsing.

use crate::error::{ConvertError, ConvertResult};
use chrono::{DateTime, FixedOffset};

const DATETIME_LEN: usize = "YYYY-MM-DDTHH:MM:SS".len();

/// Parse a source timestamp into an absolute instant with its UTC offset.
pub fn parse_timestamp(value: &str) -> ConvertResult<DateTime<FixedOffset>> {
    let normalized = normalize_offset(value)?;
    DateTime::parse_from_str(&normalized, "%Y-%m-%dT%H:%M:%S%:z")
        .map_err(|e| ConvertError::timestamp(value, e.to_string()))
}

/// Rewrite the trailing offset as `±HH:MM`.
fn normalize_offset(value: &str) -> ConvertResult<String> {
    if !value.is_ascii() || value.len() <= DATETIME_LEN {
        return Err(ConvertError::timestamp(value, "missing UTC offset"));
    }
    let (datetime, offset) = value.split_at(DATETIME_LEN);

    let digits: String = match offset.len() {
        // ±HHMM
        5 => offset[1..].to_string(),
        // ±HH:MM
        6 if offset.as_bytes()[3] == b':' => format!("{}{}", &offset[1..3], &offset[4..]),
        _ => return Err(ConvertError::timestamp(value, "offset must be ±HHMM")),
    };

    let sign = &offset[..1];
    if (sign != "+" && sign != "-") || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ConvertError::timestamp(value, "offset must be ±HHMM"));
    }

    Ok(format!("{}{}{}:{}", datetime, sign, &digits[..2], &digits[2..]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    #[test]
    fn test_parse_offset_without_colon() {
        let dt = parse_timestamp("2020-01-01T10:00:00-0300").unwrap();
        assert_eq!(dt.offset().local_minus_utc(), -3 * 3600);
        // 13:00 UTC
        assert_eq!(dt.timestamp_millis(), 1_577_883_600_000);
    }

    #[test]
    fn test_parse_offset_with_colon() {
        let a = parse_timestamp("2017-10-28T09:15:30+05:30").unwrap();
        let b = parse_timestamp("2017-10-28T09:15:30+0530").unwrap();
        assert_eq!(a, b);
        assert_eq!(a.offset().local_minus_utc(), 5 * 3600 + 30 * 60);
    }

    #[test]
    fn test_rejects_other_shapes() {
        for bad in [
            "",
            "2020-01-01T10:00:00",
            "2020-01-01T10:00:00Z",
            "2020-01-01T10:00:00-03",
            "2020-01-01 10:00:00-0300",
            "2020-13-01T10:00:00-0300",
            "2020-01-01T10:00:00*0300",
            "2020-01-01T10:00:00-03a0",
        ] {
            let err = parse_timestamp(bad).unwrap_err();
            assert_eq!(err.code(), ErrorCode::TimestampFormat, "accepted {:?}", bad);
        }
    }
}
