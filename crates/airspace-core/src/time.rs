//! Event timestamp parsing.
//!
//! Events carry naive local timestamps (`YYYY-MM-DD HH:MM`). Offsets on
//! RFC 3339 input are dropped, keeping the wall-clock reading.

use chrono::{DateTime, NaiveDateTime, Timelike};

/// Wire format of event timestamps.
pub const EVENT_TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

const ACCEPTED_FORMATS: &[&str] = &[
    EVENT_TIME_FORMAT,
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
];

pub fn parse_event_time(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    ACCEPTED_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|t| t.naive_local()))
}

/// Format a timestamp for the wire, keeping seconds only when present.
pub fn format_event_time(time: &NaiveDateTime) -> String {
    if time.second() == 0 && time.nanosecond() == 0 {
        time.format(EVENT_TIME_FORMAT).to_string()
    } else {
        time.format("%Y-%m-%d %H:%M:%S").to_string()
    }
}

pub mod timestamp {
    use chrono::NaiveDateTime;
    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(time: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::format_event_time(time))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDateTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        super::parse_event_time(&raw)
            .ok_or_else(|| D::Error::custom(format!("invalid timestamp '{raw}'")))
    }
}

pub mod optional_timestamp {
    use chrono::NaiveDateTime;
    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        time: &Option<NaiveDateTime>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match time {
            Some(time) => serializer.serialize_str(&super::format_event_time(time)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<NaiveDateTime>, D::Error> {
        match Option::<String>::deserialize(deserializer)? {
            Some(raw) => super::parse_event_time(&raw)
                .map(Some)
                .ok_or_else(|| D::Error::custom(format!("invalid timestamp '{raw}'"))),
            None => Ok(None),
        }
    }
}
