//! Typed view of the report source JSON.
//!
//! Every section and every field is optional: absent, `null` and wrongly
//! typed values all collapse to the empty case instead of failing the whole
//! payload. A graph entry that is not an object becomes a malformed event.
//! Only input that is not a JSON object at all is rejected.

use std::fmt;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::core::{DurationEvent, TimedEvent};
use crate::error::{ReportError, ReportResult};

/// Reads an optional field, mapping a value of the wrong type to `None`.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    if value.is_null() {
        return Ok(None);
    }
    match serde_json::from_value(value) {
        Ok(parsed) => Ok(Some(parsed)),
        Err(err) => {
            warn!(error = %err, "ignoring payload field with unexpected type");
            Ok(None)
        }
    }
}

/// Reads a graph array; unreadable entries become `T::default()`.
fn lenient_entries<'de, D, T>(deserializer: D) -> Result<Option<Vec<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let Some(values) = lenient::<D, Vec<Value>>(deserializer)? else {
        return Ok(None);
    };
    let entries = values
        .into_iter()
        .map(|value| {
            serde_json::from_value(value).unwrap_or_else(|err| {
                warn!(error = %err, "graph entry unreadable, keeping it as malformed");
                T::default()
            })
        })
        .collect();
    Ok(Some(entries))
}

/// Drive identifier as sent by the backend (numeric or string).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DriveId {
    Numeric(i64),
    Text(String),
}

impl fmt::Display for DriveId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Numeric(id) => write!(f, "{id}"),
            Self::Text(id) => f.write_str(id),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IntervalEntry {
    #[serde(default, rename = "startTime", deserialize_with = "lenient")]
    pub start_time: Option<String>,
    #[serde(default, rename = "endTime", deserialize_with = "lenient")]
    pub end_time: Option<String>,
}

impl IntervalEntry {
    #[must_use]
    pub fn to_event(&self) -> DurationEvent {
        DurationEvent::new(
            self.start_time.clone().unwrap_or_default(),
            self.end_time.clone().unwrap_or_default(),
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FlaggedEntry {
    #[serde(default, deserialize_with = "lenient")]
    pub time: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub flag: Option<bool>,
    #[serde(default, deserialize_with = "lenient")]
    pub value: Option<f64>,
}

impl FlaggedEntry {
    #[must_use]
    pub fn to_event(&self) -> TimedEvent {
        TimedEvent {
            timestamp: self.time.clone().unwrap_or_default(),
            flag: self.flag,
            value: self.value,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IdlingSection {
    #[serde(default, deserialize_with = "lenient")]
    pub score: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    pub feedback: Option<String>,
    #[serde(default, deserialize_with = "lenient_entries")]
    pub graph: Option<Vec<IntervalEntry>>,
}

impl IdlingSection {
    #[must_use]
    pub fn events(&self) -> Vec<DurationEvent> {
        self.graph
            .iter()
            .flatten()
            .map(IntervalEntry::to_event)
            .collect()
    }
}

/// Shape shared by acceleration and attention sections.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FlaggedSection {
    #[serde(default, deserialize_with = "lenient")]
    pub score: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    pub feedback: Option<String>,
    #[serde(default, deserialize_with = "lenient_entries")]
    pub graph: Option<Vec<FlaggedEntry>>,
}

impl FlaggedSection {
    #[must_use]
    pub fn events(&self) -> Vec<TimedEvent> {
        self.graph
            .iter()
            .flatten()
            .map(FlaggedEntry::to_event)
            .collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SpeedingSection {
    #[serde(default, deserialize_with = "lenient")]
    pub score: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    pub feedback: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReactionSection {
    #[serde(default, deserialize_with = "lenient")]
    pub score: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    pub feedback: Option<String>,
    /// Bare ISO-8601 timestamps of reaction events.
    #[serde(default, deserialize_with = "lenient_entries")]
    pub graph: Option<Vec<Option<String>>>,
    /// Number of penalized reactions; defaults to the number of events.
    #[serde(default, rename = "penaltyCount", deserialize_with = "lenient")]
    pub penalty_count: Option<usize>,
}

impl ReactionSection {
    #[must_use]
    pub fn timestamps(&self) -> Vec<String> {
        self.graph
            .iter()
            .flatten()
            .map(|entry| entry.clone().unwrap_or_default())
            .collect()
    }

    #[must_use]
    pub fn resolved_penalty_count(&self) -> usize {
        self.penalty_count
            .unwrap_or_else(|| self.graph.as_ref().map_or(0, Vec::len))
    }
}

/// Optional explicit drive window used as the shared axis range.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DriveWindow {
    #[serde(default, rename = "startTime", deserialize_with = "lenient")]
    pub start_time: Option<String>,
    #[serde(default, rename = "endTime", deserialize_with = "lenient")]
    pub end_time: Option<String>,
}

/// One report payload for a single drive.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReportPayload {
    #[serde(default, alias = "driveId", deserialize_with = "lenient")]
    pub drive_id: Option<DriveId>,
    #[serde(default, deserialize_with = "lenient")]
    pub window: Option<DriveWindow>,
    #[serde(default, deserialize_with = "lenient")]
    pub idling: Option<IdlingSection>,
    #[serde(default, deserialize_with = "lenient")]
    pub acceleration: Option<FlaggedSection>,
    #[serde(default, deserialize_with = "lenient")]
    pub speeding: Option<SpeedingSection>,
    #[serde(default, deserialize_with = "lenient")]
    pub reaction: Option<ReactionSection>,
    #[serde(default, deserialize_with = "lenient")]
    pub attention: Option<FlaggedSection>,
}

impl ReportPayload {
    pub fn from_json_str(input: &str) -> ReportResult<Self> {
        serde_json::from_str(input)
            .map_err(|e| ReportError::InvalidData(format!("failed to parse report payload: {e}")))
    }

    pub fn from_json_value(value: serde_json::Value) -> ReportResult<Self> {
        serde_json::from_value(value)
            .map_err(|e| ReportError::InvalidData(format!("failed to parse report payload: {e}")))
    }
}
