use chrono::{DateTime, Duration, Utc};

use crate::models::RunRecord;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimelineEvent {
    pub label: &'static str,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Interval {
    pub label: String,
    pub duration: Duration,
}

impl Interval {
    pub fn minutes(&self) -> f64 {
        self.duration.num_milliseconds() as f64 / 60_000.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Timeline {
    pub events: Vec<TimelineEvent>,
    pub intervals: Vec<Interval>,
}

impl Timeline {
    pub fn interval(&self, label: &str) -> Option<&Interval> {
        self.intervals.iter().find(|i| i.label == label)
    }
}

const RUN_BEGIN: &str = "Run begin";
const RUN_END: &str = "Run end";
const MIGRATION_REQUESTED: &str = "Migration requested";
const MIGRATION_BEGIN: &str = "Migration begin";
const MIGRATION_END: &str = "Migration end";
const CAL_BEGIN: &str = "Cal begin";
const CAL_END: &str = "Cal end";

fn event_fields(record: &RunRecord) -> [(&'static str, Option<DateTime<Utc>>); 7] {
    [
        (RUN_BEGIN, record.begin_at),
        (RUN_END, record.end_at),
        (MIGRATION_REQUESTED, record.migration_request_at),
        (MIGRATION_BEGIN, record.migration_begin_at),
        (MIGRATION_END, record.migration_end_at),
        (CAL_BEGIN, record.cal_last_begin_at),
        (CAL_END, record.cal_last_end_at),
    ]
}

pub fn calibration_label(attempts: u32) -> String {
    if attempts == 1 {
        "Calibration".to_string()
    } else {
        format!("Calibration attempt {}", attempts)
    }
}

/// With more than one calibration attempt the calibration points are left
/// out of `events`; only the interval of the latest attempt is kept.
pub fn derive(record: &RunRecord) -> Timeline {
    let attempts = record.calibration_attempts();
    let events = event_fields(record)
        .into_iter()
        .filter(|(label, _)| attempts <= 1 || !label.starts_with("Cal"))
        .filter_map(|(label, ts)| ts.map(|timestamp| TimelineEvent { label, timestamp }))
        .collect();

    let spans = [
        ("Run".to_string(), record.begin_at, record.end_at),
        (
            "Migration".to_string(),
            record.migration_begin_at,
            record.migration_end_at,
        ),
        (
            calibration_label(attempts),
            record.cal_last_begin_at,
            record.cal_last_end_at,
        ),
    ];
    let intervals = spans
        .into_iter()
        .filter_map(|(label, begin, end)| match (begin, end) {
            (Some(begin), Some(end)) => Some(Interval {
                label,
                duration: end - begin,
            }),
            _ => None,
        })
        .collect();

    Timeline { events, intervals }
}
