use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::core::primitives::{datetime_to_unix_seconds, parse_timestamp};
use crate::error::ReportResult;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    #[must_use]
    pub fn is_valid(self) -> bool {
        self.width > 0 && self.height > 0
    }
}

/// One telemetry sample as delivered by the report source.
///
/// The timestamp stays in its raw ISO-8601 form; parsing happens at the point
/// of use so a malformed value only degrades that single event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimedEvent {
    pub timestamp: String,
    #[serde(default)]
    pub flag: Option<bool>,
    #[serde(default)]
    pub value: Option<f64>,
}

impl TimedEvent {
    #[must_use]
    pub fn new(timestamp: impl Into<String>) -> Self {
        Self {
            timestamp: timestamp.into(),
            flag: None,
            value: None,
        }
    }

    #[must_use]
    pub fn with_flag(mut self, flag: bool) -> Self {
        self.flag = Some(flag);
        self
    }

    #[must_use]
    pub fn with_value(mut self, value: f64) -> Self {
        self.value = Some(value);
        self
    }

    pub fn parsed_time(&self) -> ReportResult<DateTime<Utc>> {
        parse_timestamp(&self.timestamp)
    }
}

/// Interval event (idling) with raw ISO-8601 bounds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DurationEvent {
    pub start_time: String,
    pub end_time: String,
}

impl DurationEvent {
    #[must_use]
    pub fn new(start_time: impl Into<String>, end_time: impl Into<String>) -> Self {
        Self {
            start_time: start_time.into(),
            end_time: end_time.into(),
        }
    }

    /// Returns `(start, end)` in Unix seconds when both bounds parse.
    pub fn bounds_unix_seconds(&self) -> ReportResult<(f64, f64)> {
        let start = datetime_to_unix_seconds(parse_timestamp(&self.start_time)?);
        let end = datetime_to_unix_seconds(parse_timestamp(&self.end_time)?);
        Ok((start, end))
    }

    /// Duration in seconds, clamped to `>= 0` when `end_time < start_time`.
    pub fn duration_seconds(&self) -> ReportResult<f64> {
        let (start, end) = self.bounds_unix_seconds()?;
        Ok((end - start).max(0.0))
    }
}

/// Labelled position on a chart axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartPoint {
    pub position: f64,
    pub label: String,
    pub show_label: bool,
}

impl ChartPoint {
    #[must_use]
    pub fn new(position: f64, label: impl Into<String>) -> Self {
        Self {
            position,
            label: label.into(),
            show_label: true,
        }
    }
}

/// Derived per-category score. Recomputed for every payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreSummary {
    pub raw_score: f64,
    pub penalty: f64,
    pub statistics: IndexMap<String, f64>,
}

impl ScoreSummary {
    #[must_use]
    pub fn empty() -> Self {
        Self {
            raw_score: 0.0,
            penalty: 0.0,
            statistics: IndexMap::new(),
        }
    }

    #[must_use]
    pub fn statistic(&self, name: &str) -> Option<f64> {
        self.statistics.get(name).copied()
    }
}

impl Default for ScoreSummary {
    fn default() -> Self {
        Self::empty()
    }
}

/// Report categories delivered by the report source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportCategory {
    Idling,
    Acceleration,
    Speeding,
    Reaction,
    Attention,
}

/// Screen-level grouping of categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportGroup {
    Eco,
    Safety,
    AccidentPrevention,
    Attention,
}

impl ReportCategory {
    pub const ALL: [Self; 5] = [
        Self::Idling,
        Self::Acceleration,
        Self::Speeding,
        Self::Reaction,
        Self::Attention,
    ];

    #[must_use]
    pub fn group(self) -> ReportGroup {
        match self {
            Self::Idling | Self::Acceleration => ReportGroup::Eco,
            Self::Speeding => ReportGroup::Safety,
            Self::Reaction => ReportGroup::AccidentPrevention,
            Self::Attention => ReportGroup::Attention,
        }
    }

    #[must_use]
    pub fn title(self) -> &'static str {
        match self {
            Self::Idling => "Idling",
            Self::Acceleration => "Acceleration",
            Self::Speeding => "Speeding",
            Self::Reaction => "Reaction",
            Self::Attention => "Attention",
        }
    }
}
