use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RunRecord {
    pub id: u64,
    pub sample_id: u64,
    pub experiment_id: u64,
    #[serde(default)]
    pub cal_num_requests: Option<u32>,
    #[serde(default, deserialize_with = "deserialize_timestamp")]
    pub begin_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "deserialize_timestamp")]
    pub end_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "deserialize_timestamp")]
    pub migration_request_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "deserialize_timestamp")]
    pub migration_begin_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "deserialize_timestamp")]
    pub migration_end_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "deserialize_timestamp")]
    pub cal_last_begin_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "deserialize_timestamp")]
    pub cal_last_end_at: Option<DateTime<Utc>>,
}

impl RunRecord {
    // null before the first calibration request
    pub fn calibration_attempts(&self) -> u32 {
        self.cal_num_requests.unwrap_or(1)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Technique {
    pub identifier: String,
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RunList {
    pub runs: Vec<RunRecord>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RunDetail {
    pub techniques: Vec<Technique>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct NamedEntity {
    pub name: String,
}

// Offset-less timestamps are taken as UTC.
pub fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    match DateTime::parse_from_rfc3339(raw) {
        Ok(ts) => Ok(ts.with_timezone(&Utc)),
        Err(rfc_err) => NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
            .map(|naive| Utc.from_utc_datetime(&naive))
            .map_err(|_| rfc_err),
    }
}

fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    raw.map(|s| parse_timestamp(&s).map_err(serde::de::Error::custom))
        .transpose()
}
