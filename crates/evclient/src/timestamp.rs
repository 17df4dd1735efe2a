// Timestamp (de)serialization
//
// The API is not consistent about how it writes instants. Timeseries use
// RFC 3339, datasets come straight out of PostgreSQL (`2021-10-01
// 12:26:26.42555+02`), and `epoch=1` queries return Unix seconds. Zoned
// values are decoded into `DateTime<FixedOffset>` and written back as
// RFC 3339.
//
// Timeseries also accept local times without an offset; the server then
// applies the domain's configured timezone. `Timestamp` carries either form.

use std::fmt;

use chrono::{DateTime, FixedOffset, NaiveDateTime, SecondsFormat, Utc};
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize, Serializer};

const POSTGRES_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f%#z";
const LOCAL_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";
const LOCAL_FORMAT_SPACED: &str = "%Y-%m-%d %H:%M:%S%.f";

/// Parse any of the textual formats the API emits.
pub fn parse(raw: &str) -> Result<DateTime<FixedOffset>, chrono::ParseError> {
    let raw = raw.trim();
    DateTime::parse_from_rfc3339(raw).or_else(|_| DateTime::parse_from_str(raw, POSTGRES_FORMAT))
}

/// Format as RFC 3339, keeping the original offset.
pub fn format(ts: &DateTime<FixedOffset>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::AutoSi, false)
}

fn from_epoch(secs: f64) -> Option<DateTime<FixedOffset>> {
    if !secs.is_finite() {
        return None;
    }
    #[allow(clippy::cast_possible_truncation, clippy::as_conversions)]
    let whole = secs.floor() as i64;
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::as_conversions
    )]
    let nanos = ((secs - secs.floor()) * 1e9).round() as u32;
    DateTime::<Utc>::from_timestamp(whole, nanos.min(999_999_999)).map(|dt| dt.fixed_offset())
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Wire {
    Text(String),
    Seconds(f64),
}

impl Wire {
    fn decode<E: de::Error>(self) -> Result<DateTime<FixedOffset>, E> {
        match self {
            Self::Text(s) => parse(&s).map_err(|e| E::custom(format!("invalid timestamp '{s}': {e}"))),
            Self::Seconds(n) => {
                from_epoch(n).ok_or_else(|| E::custom(format!("epoch timestamp out of range: {n}")))
            }
        }
    }
}

// ── Zoned or domain-local ───────────────────────────────────────────

/// A timeseries instant, either pinned to an offset or in the domain's
/// local time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Timestamp {
    Zoned(DateTime<FixedOffset>),
    /// No offset on the wire; the server resolves it with the domain timezone.
    Local(NaiveDateTime),
}

impl Timestamp {
    /// Parse zoned text first, then offset-less local time.
    pub fn parse(raw: &str) -> Result<Self, chrono::ParseError> {
        let raw = raw.trim();
        parse(raw).map(Self::Zoned).or_else(|err| {
            NaiveDateTime::parse_from_str(raw, LOCAL_FORMAT)
                .or_else(|_| NaiveDateTime::parse_from_str(raw, LOCAL_FORMAT_SPACED))
                .map(Self::Local)
                .map_err(|_| err)
        })
    }

    pub fn as_zoned(&self) -> Option<&DateTime<FixedOffset>> {
        match self {
            Self::Zoned(ts) => Some(ts),
            Self::Local(_) => None,
        }
    }

    pub fn is_local(&self) -> bool {
        matches!(self, Self::Local(_))
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Zoned(ts) => f.write_str(&format(ts)),
            Self::Local(ts) => write!(f, "{}", ts.format(LOCAL_FORMAT)),
        }
    }
}

impl From<DateTime<FixedOffset>> for Timestamp {
    fn from(ts: DateTime<FixedOffset>) -> Self {
        Self::Zoned(ts)
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(ts: DateTime<Utc>) -> Self {
        Self::Zoned(ts.fixed_offset())
    }
}

impl From<NaiveDateTime> for Timestamp {
    fn from(ts: NaiveDateTime) -> Self {
        Self::Local(ts)
    }
}

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match Wire::deserialize(deserializer)? {
            Wire::Text(s) => Self::parse(&s)
                .map_err(|e| de::Error::custom(format!("invalid timestamp '{s}': {e}"))),
            seconds @ Wire::Seconds(_) => seconds.decode().map(Self::Zoned),
        }
    }
}

// ── `#[serde(with)]` for zoned-only fields ──────────────────────────

pub fn serialize<S: Serializer>(ts: &DateTime<FixedOffset>, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&format(ts))
}

pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<FixedOffset>, D::Error> {
    Wire::deserialize(deserializer)?.decode()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::{TimeZone, Timelike};
    use pretty_assertions::assert_eq;
    use serde::Serialize;

    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    struct Row {
        #[serde(with = "super")]
        ts: DateTime<FixedOffset>,
    }

    #[test]
    fn parses_rfc3339() {
        let ts = parse("2020-01-01T00:05:57+01:00").unwrap();
        let expected = FixedOffset::east_opt(3600)
            .unwrap()
            .with_ymd_and_hms(2020, 1, 1, 0, 5, 57)
            .unwrap();
        assert_eq!(ts, expected);
        assert_eq!(ts.offset().local_minus_utc(), 3600);
    }

    #[test]
    fn parses_postgres_text_with_short_offset() {
        let ts = parse("2021-10-01 12:26:26.42555+02").unwrap();
        assert_eq!(ts.offset().local_minus_utc(), 7200);
        assert_eq!(ts.nanosecond(), 425_550_000);

        let ts = parse("2021-10-04 09:30:28+02").unwrap();
        assert_eq!(ts.to_rfc3339(), "2021-10-04T09:30:28+02:00");
    }

    #[test]
    fn rejects_garbage() {
        assert!(parse("yesterday").is_err());
        assert!(serde_json::from_str::<Row>(r#"{"ts":"nope"}"#).is_err());
    }

    #[test]
    fn decodes_epoch_seconds_as_utc() {
        let row: Row = serde_json::from_str(r#"{"ts":1577833557}"#).unwrap();
        assert_eq!(row.ts.to_rfc3339(), "2019-12-31T23:05:57+00:00");
    }

    #[test]
    fn local_time_round_trips_without_offset() {
        let ts = Timestamp::parse("2020-01-01T00:00:00").unwrap();
        assert!(ts.is_local());
        assert_eq!(ts.to_string(), "2020-01-01T00:00:00");
        assert_eq!(
            serde_json::to_string(&ts).unwrap(),
            r#""2020-01-01T00:00:00""#
        );

        let ts = Timestamp::parse("2020-01-01 00:15:37.5").unwrap();
        assert_eq!(ts.to_string(), "2020-01-01T00:15:37.500");
    }

    #[test]
    fn zoned_text_wins_over_local() {
        let ts: Timestamp = serde_json::from_str(r#""2020-01-01T00:05:57+01:00""#).unwrap();
        assert_eq!(ts.as_zoned().unwrap().offset().local_minus_utc(), 3600);
        assert_eq!(ts.to_string(), "2020-01-01T00:05:57+01:00");

        let ts: Timestamp = serde_json::from_str("1577833557").unwrap();
        assert_eq!(ts.to_string(), "2019-12-31T23:05:57+00:00");

        assert!(Timestamp::parse("soon").is_err());
    }

    #[test]
    fn serializes_as_rfc3339_with_original_offset() {
        let row = Row {
            ts: parse("2019-10-01T11:30:22+02:00").unwrap(),
        };
        assert_eq!(
            serde_json::to_string(&row).unwrap(),
            r#"{"ts":"2019-10-01T11:30:22+02:00"}"#
        );
    }
}
