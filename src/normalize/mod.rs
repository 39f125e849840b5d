//! Derived per-record fields computed on every run.

mod duration;

pub use duration::{
    duration_minutes, parse_duration, ParsedDuration, SeasonApproximation, MINUTES_UNIT_PREFIX,
};

use crate::query::ProjectedRecord;
use serde::Serialize;

/// A projected record plus its parsed duration. Lives for a single run.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct NormalizedRecord {
    #[serde(flatten)]
    pub record: ProjectedRecord,
    pub duration_value: Option<f64>,
    pub duration_unit: Option<String>,
    pub duration_minutes: Option<f64>,
}

impl NormalizedRecord {
    pub fn new(record: ProjectedRecord, seasons: &SeasonApproximation) -> Self {
        let parsed = parse_duration(record.duration_raw.as_deref());
        let duration_minutes = parsed.minutes(seasons);
        Self {
            record,
            duration_value: parsed.value,
            duration_unit: parsed.unit,
            duration_minutes,
        }
    }
}

pub fn normalize(
    rows: Vec<ProjectedRecord>,
    seasons: &SeasonApproximation,
) -> Vec<NormalizedRecord> {
    rows.into_iter()
        .map(|record| NormalizedRecord::new(record, seasons))
        .collect()
}
