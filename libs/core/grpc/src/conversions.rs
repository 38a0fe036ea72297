//! Generic protobuf ↔ domain conversions
//!
//! Timestamps travel as `google.protobuf.Timestamp` and live in the domain as
//! `DateTime<Utc>`. PostgreSQL `timestamptz` keeps microseconds, so every
//! conversion truncates to microsecond precision; a value written and read
//! back compares equal.
//!
//! ## Usage
//!
//! ```ignore
//! use core_grpc::conversions::*;
//! use chrono::Utc;
//!
//! let timestamp = datetime_to_timestamp(Utc::now());
//! let dt_back = timestamp_to_datetime(&timestamp)?;
//! ```

use chrono::{DateTime, SubsecRound, Utc};
use prost_types::Timestamp;

/// Sub-second digits kept on every conversion (microseconds).
const PRECISION_DIGITS: u16 = 6;

// ============================================================================
// Timestamp Conversions (google.protobuf.Timestamp ↔ DateTime<Utc>)
// ============================================================================

/// Convert DateTime<Utc> to a protobuf Timestamp, truncated to microseconds
pub fn datetime_to_timestamp(dt: DateTime<Utc>) -> Timestamp {
  let dt = dt.trunc_subsecs(PRECISION_DIGITS);
  Timestamp {
    seconds: dt.timestamp(),
    nanos: dt.timestamp_subsec_nanos() as i32,
  }
}

/// Convert a protobuf Timestamp to DateTime<Utc>, truncated to microseconds
///
/// Returns an error for negative nanos or a value outside chrono's range.
pub fn timestamp_to_datetime(ts: &Timestamp) -> Result<DateTime<Utc>, String> {
  let nanos = u32::try_from(ts.nanos)
    .map_err(|_| format!("Invalid timestamp nanos: {}", ts.nanos))?;
  if nanos >= 1_000_000_000 {
    return Err(format!("Invalid timestamp nanos: {}", ts.nanos));
  }

  DateTime::from_timestamp(ts.seconds, nanos)
    .map(|dt| dt.trunc_subsecs(PRECISION_DIGITS))
    .ok_or_else(|| format!("Timestamp out of range: {}s", ts.seconds))
}

/// Convert optional DateTime<Utc> to optional protobuf Timestamp
pub fn opt_datetime_to_timestamp(dt: Option<DateTime<Utc>>) -> Option<Timestamp> {
  dt.map(datetime_to_timestamp)
}

/// Convert optional protobuf Timestamp to optional DateTime<Utc>
///
/// Returns an error if the timestamp is present but invalid.
pub fn opt_timestamp_to_datetime(ts: Option<&Timestamp>) -> Result<Option<DateTime<Utc>>, String> {
  ts.map(timestamp_to_datetime).transpose()
}

#[cfg(test)]
mod tests {
  use super::*;
  use chrono::TimeZone;

  #[test]
  fn test_timestamp_roundtrip_keeps_micros() {
    let dt = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
      + chrono::Duration::microseconds(123_456);
    let ts = datetime_to_timestamp(dt);
    assert_eq!(ts.seconds, 1_704_067_200);
    assert_eq!(ts.nanos, 123_456_000);
    assert_eq!(timestamp_to_datetime(&ts).unwrap(), dt);
  }

  #[test]
  fn test_nanos_are_truncated() {
    let ts = Timestamp {
      seconds: 1_704_067_200,
      nanos: 123_456_789,
    };
    let dt = timestamp_to_datetime(&ts).unwrap();
    assert_eq!(dt.timestamp_subsec_nanos(), 123_456_000);
  }

  #[test]
  fn test_negative_nanos_rejected() {
    let ts = Timestamp {
      seconds: 0,
      nanos: -1,
    };
    assert!(timestamp_to_datetime(&ts).is_err());
  }

  #[test]
  fn test_out_of_range_rejected() {
    let ts = Timestamp {
      seconds: i64::MAX,
      nanos: 0,
    };
    assert!(timestamp_to_datetime(&ts).is_err());

    let ts = Timestamp {
      seconds: 0,
      nanos: 1_000_000_000,
    };
    assert!(timestamp_to_datetime(&ts).is_err());
  }

  #[test]
  fn test_optional_variants() {
    assert!(opt_datetime_to_timestamp(None).is_none());
    assert_eq!(opt_timestamp_to_datetime(None).unwrap(), None);

    let ts = Timestamp {
      seconds: 10,
      nanos: 0,
    };
    let dt = opt_timestamp_to_datetime(Some(&ts)).unwrap().unwrap();
    assert_eq!(dt.timestamp(), 10);
  }
}
