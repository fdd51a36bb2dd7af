use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::deposit::DepositDate;
use crate::error::TypeError;

/// UTC wall-clock instant at millisecond precision.
///
/// The textual form is RFC 3339 with exactly three fractional digits and a
/// `Z` suffix, e.g. `2025-11-27T08:15:30.123Z`. This form feeds block
/// hashing, so it must survive a save/load cycle byte for byte: sub-millisecond
/// precision is dropped at construction.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// The current instant, truncated to milliseconds.
    pub fn now() -> Self {
        Self::from_datetime(Utc::now())
    }

    pub fn from_datetime(at: DateTime<Utc>) -> Self {
        Self(at.trunc_subsecs(3))
    }

    /// 1970-01-01T00:00:00.000Z.
    pub fn epoch() -> Self {
        Self(DateTime::<Utc>::default())
    }

    /// Build from milliseconds since the UNIX epoch.
    pub fn from_millis(ms: i64) -> Result<Self, TypeError> {
        DateTime::<Utc>::from_timestamp_millis(ms)
            .map(Self)
            .ok_or_else(|| TypeError::InvalidTimestamp(ms.to_string()))
    }

    pub fn as_datetime(&self) -> DateTime<Utc> {
        self.0
    }

    pub fn millis(&self) -> i64 {
        self.0.timestamp_millis()
    }

    /// Calendar day (UTC) this instant falls on.
    pub fn date(&self) -> DepositDate {
        DepositDate::from(self.0.date_naive())
    }

    /// Canonical RFC 3339 text used for hashing and persistence.
    pub fn to_rfc3339(&self) -> String {
        self.0.to_rfc3339_opts(SecondsFormat::Millis, true)
    }
}

impl FromStr for Timestamp {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DateTime::parse_from_rfc3339(s)
            .map(|dt| Self::from_datetime(dt.with_timezone(&Utc)))
            .map_err(|e| TypeError::InvalidTimestamp(format!("{s}: {e}")))
    }
}

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_rfc3339())
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

impl fmt::Debug for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Timestamp({})", self.to_rfc3339())
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_rfc3339())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn display_uses_millis_and_zulu() {
        let ts = Timestamp::from_millis(1_764_230_130_123).unwrap();
        assert_eq!(ts.to_string(), "2025-11-27T07:55:30.123Z");
    }

    #[test]
    fn now_has_no_sub_millisecond_part() {
        let ts = Timestamp::now();
        assert_eq!(ts.as_datetime().timestamp_subsec_nanos() % 1_000_000, 0);
    }

    #[test]
    fn parse_accepts_offsets_and_normalizes() {
        let ts: Timestamp = "2025-11-27T09:55:30.123+02:00".parse().unwrap();
        assert_eq!(ts.to_string(), "2025-11-27T07:55:30.123Z");
    }

    #[test]
    fn epoch_is_zero_millis() {
        assert_eq!(Timestamp::epoch().millis(), 0);
        assert_eq!(Timestamp::epoch().to_string(), "1970-01-01T00:00:00.000Z");
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!("yesterday".parse::<Timestamp>().is_err());
    }

    #[test]
    fn date_is_utc_calendar_day() {
        let ts: Timestamp = "2025-11-27T23:59:59.999Z".parse().unwrap();
        assert_eq!(ts.date().to_string(), "20251127");
    }

    #[test]
    fn serde_uses_canonical_text() {
        let ts = Timestamp::from_millis(0).unwrap();
        let json = serde_json::to_string(&ts).unwrap();
        assert_eq!(json, "\"1970-01-01T00:00:00.000Z\"");
    }

    proptest! {
        #[test]
        fn text_form_survives_reparse(ms in 0i64..4_102_444_800_000) {
            let ts = Timestamp::from_millis(ms).unwrap();
            let reparsed: Timestamp = ts.to_string().parse().unwrap();
            prop_assert_eq!(ts, reparsed);
            prop_assert_eq!(ts.to_string(), reparsed.to_string());
        }
    }
}
