use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{trace, warn};

use crate::core::label_collision::{LabelCollisionTuning, label_visibility};
use crate::core::primitives::{
    MALFORMED_TIMESTAMP_LABEL, datetime_to_minutes_of_day, datetime_to_unix_seconds,
    format_minutes_of_day_label, format_unix_seconds_label, parse_timestamp,
};
use crate::core::scale::LinearScale;
use crate::core::types::{ChartPoint, DurationEvent, TimedEvent, Viewport};
use crate::error::{ReportError, ReportResult};

/// Unit of the one-dimensional time axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AxisUnit {
    /// UTC minutes since midnight, labelled `HH:MM`.
    MinutesOfDay,
    /// Unix seconds, labelled `HH:MM:SS`.
    #[default]
    Seconds,
}

impl AxisUnit {
    #[must_use]
    pub fn from_datetime(self, time: DateTime<Utc>) -> f64 {
        match self {
            Self::MinutesOfDay => datetime_to_minutes_of_day(time),
            Self::Seconds => datetime_to_unix_seconds(time),
        }
    }

    pub fn parse(self, timestamp: &str) -> ReportResult<f64> {
        parse_timestamp(timestamp).map(|time| self.from_datetime(time))
    }

    #[must_use]
    pub fn format_label(self, value: f64) -> String {
        match self {
            Self::MinutesOfDay => format_minutes_of_day_label(value),
            Self::Seconds => format_unix_seconds_label(value),
        }
    }
}

/// Range fitting and gridline controls for the temporal binner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemporalBinnerTuning {
    /// Padding added on both sides of the fitted data range.
    pub margin: f64,
    /// Lower bound on the fitted range span.
    pub minimum_range: f64,
    /// Range used when no valid timestamps are available.
    pub default_range_start: f64,
    pub default_range_end: f64,
    /// Ascending gridline step candidates, in axis units.
    pub step_candidates: Vec<f64>,
    pub min_pixels_per_label: f64,
}

impl Default for TemporalBinnerTuning {
    fn default() -> Self {
        Self {
            margin: 5.0,
            minimum_range: 10.0,
            default_range_start: 0.0,
            default_range_end: 60.0,
            step_candidates: vec![
                1.0, 2.0, 5.0, 10.0, 15.0, 30.0, 60.0, 120.0, 300.0, 600.0, 900.0, 1_800.0,
                3_600.0,
            ],
            min_pixels_per_label: 56.0,
        }
    }
}

impl TemporalBinnerTuning {
    pub fn validate(self) -> ReportResult<Self> {
        if !self.margin.is_finite() || self.margin < 0.0 {
            return Err(ReportError::InvalidData(
                "binner margin must be finite and >= 0".to_owned(),
            ));
        }
        if !self.minimum_range.is_finite() || self.minimum_range <= 0.0 {
            return Err(ReportError::InvalidData(
                "binner minimum range must be finite and > 0".to_owned(),
            ));
        }
        if !self.default_range_start.is_finite()
            || !self.default_range_end.is_finite()
            || self.default_range_end <= self.default_range_start
        {
            return Err(ReportError::InvalidData(
                "binner default range must be finite with end > start".to_owned(),
            ));
        }
        if self.step_candidates.is_empty() {
            return Err(ReportError::InvalidData(
                "binner step candidates must not be empty".to_owned(),
            ));
        }
        if self
            .step_candidates
            .iter()
            .any(|step| !step.is_finite() || *step <= 0.0)
        {
            return Err(ReportError::InvalidData(
                "binner step candidates must be finite and > 0".to_owned(),
            ));
        }
        if self
            .step_candidates
            .windows(2)
            .any(|pair| pair[1] <= pair[0])
        {
            return Err(ReportError::InvalidData(
                "binner step candidates must be strictly ascending".to_owned(),
            ));
        }
        if !self.min_pixels_per_label.is_finite() || self.min_pixels_per_label <= 0.0 {
            return Err(ReportError::InvalidData(
                "binner min pixels per label must be finite and > 0".to_owned(),
            ));
        }
        Ok(self)
    }
}

/// Duration event placed on the axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntervalSpan {
    pub start_position: f64,
    pub end_position: f64,
    pub duration_seconds: f64,
    pub label: String,
    pub show_label: bool,
}

/// Axis fitted to one event series.
///
/// `points`/`intervals` keep input order; positions are pixels in `[0, width]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BinnedAxis {
    pub unit: AxisUnit,
    pub range_start: f64,
    pub range_end: f64,
    pub step: f64,
    pub gridlines: Vec<ChartPoint>,
    pub points: Vec<ChartPoint>,
    pub intervals: Vec<IntervalSpan>,
    pub malformed_count: usize,
}

impl BinnedAxis {
    #[must_use]
    pub fn range(&self) -> f64 {
        self.range_end - self.range_start
    }
}

/// Maps timestamps and intervals onto a fixed-width axis.
///
/// Holds configuration only; every call is independent.
#[derive(Debug, Clone, PartialEq)]
pub struct TemporalBinner {
    unit: AxisUnit,
    viewport: Viewport,
    tuning: TemporalBinnerTuning,
    labels: LabelCollisionTuning,
}

impl TemporalBinner {
    pub fn new(unit: AxisUnit, viewport: Viewport) -> ReportResult<Self> {
        Self::with_tuning(
            unit,
            viewport,
            TemporalBinnerTuning::default(),
            LabelCollisionTuning::default(),
        )
    }

    pub fn with_tuning(
        unit: AxisUnit,
        viewport: Viewport,
        tuning: TemporalBinnerTuning,
        labels: LabelCollisionTuning,
    ) -> ReportResult<Self> {
        if !viewport.is_valid() {
            return Err(ReportError::InvalidViewport {
                width: viewport.width,
                height: viewport.height,
            });
        }
        Ok(Self {
            unit,
            viewport,
            tuning: tuning.validate()?,
            labels: labels.validate()?,
        })
    }

    #[must_use]
    pub fn unit(&self) -> AxisUnit {
        self.unit
    }

    #[must_use]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    #[must_use]
    pub fn tuning(&self) -> &TemporalBinnerTuning {
        &self.tuning
    }

    /// Fits `(start, end)` around finite `values`, or uses a non-degenerate
    /// explicit range. A range whose width is not finite falls back to the
    /// default range.
    #[must_use]
    pub fn resolve_range(&self, values: &[f64], explicit: Option<(f64, f64)>) -> (f64, f64) {
        let range = self.fit_range(values, explicit);
        if (range.1 - range.0).is_finite() {
            return range;
        }
        warn!(
            start = range.0,
            end = range.1,
            "axis range width overflows, using default range"
        );
        self.default_range()
    }

    fn fit_range(&self, values: &[f64], explicit: Option<(f64, f64)>) -> (f64, f64) {
        if let Some((start, end)) = explicit {
            if start.is_finite() && end.is_finite() {
                let (start, end) = (start.min(end), start.max(end));
                if end > start {
                    return (start, end);
                }
                return self.widen_to_minimum(start, end);
            }
            warn!(start, end, "ignoring non-finite explicit axis range");
        }

        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for value in values.iter().copied().filter(|value| value.is_finite()) {
            min = min.min(value);
            max = max.max(value);
        }
        if !min.is_finite() || !max.is_finite() {
            return self.default_range();
        }

        self.widen_to_minimum(min - self.tuning.margin, max + self.tuning.margin)
    }

    fn default_range(&self) -> (f64, f64) {
        (
            self.tuning.default_range_start,
            self.tuning.default_range_end,
        )
    }

    fn widen_to_minimum(&self, start: f64, end: f64) -> (f64, f64) {
        let span = end - start;
        if span >= self.tuning.minimum_range {
            return (start, end);
        }
        let center = 0.5 * (start + end);
        let half = 0.5 * self.tuning.minimum_range;
        (center - half, center + half)
    }

    /// Number of gridline labels that fit the viewport width.
    #[must_use]
    pub fn max_labels(&self) -> usize {
        let raw = (f64::from(self.viewport.width) / self.tuning.min_pixels_per_label).floor();
        (raw as usize).max(1)
    }

    /// Smallest candidate step whose label count fits the width.
    ///
    /// When no candidate fits, the largest candidate is multiplied up until
    /// it does.
    #[must_use]
    pub fn select_step(&self, range: f64) -> f64 {
        let max_labels = self.max_labels() as f64;
        let largest = self
            .tuning
            .step_candidates
            .last()
            .copied()
            .unwrap_or(self.tuning.minimum_range);
        if !range.is_finite() || range <= 0.0 {
            return self.tuning.step_candidates.first().copied().unwrap_or(largest);
        }

        if let Some(step) = self
            .tuning
            .step_candidates
            .iter()
            .copied()
            .find(|step| (range / step).ceil() <= max_labels)
        {
            trace!(range, step, max_labels, "selected gridline step");
            return step;
        }

        let multiple = (range / (largest * max_labels)).ceil().max(1.0);
        let step = largest * multiple;
        trace!(range, step, max_labels, "scaled largest gridline step");
        step
    }

    /// Pixel position of an axis value, clamped to `[0, width]`.
    #[must_use]
    pub fn position_of(&self, value: f64, range: (f64, f64)) -> f64 {
        LinearScale::new(range.0, range.1)
            .and_then(|scale| scale.domain_to_pixel_clamped(value, self.viewport))
            .unwrap_or(0.0)
    }

    /// Gridlines at multiples of `step` inside `range`, at most
    /// `max_labels() + 1` of them.
    #[must_use]
    pub fn gridlines(&self, range: (f64, f64), step: f64) -> Vec<ChartPoint> {
        if !step.is_finite() || step <= 0.0 || !(range.1 > range.0) {
            return Vec::new();
        }
        let epsilon = step * 1e-9;
        let first = (range.0 / step).ceil() * step;
        let fitting = ((range.1 - first + epsilon) / step).floor();
        if !fitting.is_finite() || fitting < 0.0 {
            return Vec::new();
        }
        let count = (fitting as usize)
            .saturating_add(1)
            .min(self.max_labels().saturating_add(1));

        (0..count)
            .map(|index| {
                let value = first + index as f64 * step;
                ChartPoint::new(self.position_of(value, range), self.unit.format_label(value))
            })
            .collect()
    }

    /// Places bare ISO-8601 timestamps on the axis.
    #[must_use]
    pub fn bin_timestamps<S: AsRef<str>>(
        &self,
        timestamps: &[S],
        explicit_range: Option<(f64, f64)>,
    ) -> BinnedAxis {
        let values: Vec<Option<f64>> = timestamps
            .iter()
            .map(|timestamp| self.parse_or_warn(timestamp.as_ref()))
            .collect();
        self.bin_values(&values, explicit_range)
    }

    #[must_use]
    pub fn bin_events(
        &self,
        events: &[TimedEvent],
        explicit_range: Option<(f64, f64)>,
    ) -> BinnedAxis {
        let values: Vec<Option<f64>> = events
            .iter()
            .map(|event| self.parse_or_warn(&event.timestamp))
            .collect();
        self.bin_values(&values, explicit_range)
    }

    /// Places idling-style intervals on the axis.
    ///
    /// The range covers all interval bounds. An interval whose end precedes
    /// its start collapses to zero width.
    #[must_use]
    pub fn bin_durations(
        &self,
        events: &[DurationEvent],
        explicit_range: Option<(f64, f64)>,
    ) -> BinnedAxis {
        let bounds: Vec<Option<(f64, f64, f64)>> = events
            .iter()
            .map(|event| {
                let start = self.parse_or_warn(&event.start_time)?;
                let end = self.parse_or_warn(&event.end_time)?;
                let duration = event.duration_seconds().unwrap_or(0.0);
                Some((start, end.max(start), duration))
            })
            .collect();

        let finite: Vec<f64> = bounds
            .iter()
            .flatten()
            .flat_map(|(start, end, _)| [*start, *end])
            .collect();
        let range = self.resolve_range(&finite, explicit_range);
        let step = self.select_step(range.1 - range.0);

        let label_positions: Vec<f64> = bounds
            .iter()
            .map(|bound| bound.map_or(range.0, |(start, _, _)| start))
            .collect();
        let visible = label_visibility(&label_positions, range.1 - range.0, self.labels);

        let mut malformed_count = 0;
        let intervals: Vec<IntervalSpan> = bounds
            .iter()
            .zip(visible)
            .map(|(bound, show_label)| match bound {
                Some((start, end, duration)) => IntervalSpan {
                    start_position: self.position_of(*start, range),
                    end_position: self.position_of(*end, range),
                    duration_seconds: *duration,
                    label: self.unit.format_label(*start),
                    show_label,
                },
                None => {
                    malformed_count += 1;
                    IntervalSpan {
                        start_position: 0.0,
                        end_position: 0.0,
                        duration_seconds: 0.0,
                        label: MALFORMED_TIMESTAMP_LABEL.to_owned(),
                        show_label,
                    }
                }
            })
            .collect();

        BinnedAxis {
            unit: self.unit,
            range_start: range.0,
            range_end: range.1,
            step,
            gridlines: self.gridlines(range, step),
            points: Vec::new(),
            intervals,
            malformed_count,
        }
    }

    /// Places already-converted axis values; `None` marks a malformed timestamp.
    ///
    /// Malformed entries sit at the range start with the sentinel label and do
    /// not influence the fitted range.
    #[must_use]
    pub fn bin_values(
        &self,
        values: &[Option<f64>],
        explicit_range: Option<(f64, f64)>,
    ) -> BinnedAxis {
        let finite: Vec<f64> = values.iter().flatten().copied().collect();
        let range = self.resolve_range(&finite, explicit_range);
        let step = self.select_step(range.1 - range.0);

        let label_positions: Vec<f64> = values
            .iter()
            .map(|value| value.unwrap_or(range.0))
            .collect();
        let visible = label_visibility(&label_positions, range.1 - range.0, self.labels);

        let points: Vec<ChartPoint> = values
            .iter()
            .zip(visible)
            .map(|(value, show_label)| {
                let (position, label) = match value {
                    Some(value) => (
                        self.position_of(*value, range),
                        self.unit.format_label(*value),
                    ),
                    None => (0.0, MALFORMED_TIMESTAMP_LABEL.to_owned()),
                };
                ChartPoint {
                    position,
                    label,
                    show_label,
                }
            })
            .collect();

        BinnedAxis {
            unit: self.unit,
            range_start: range.0,
            range_end: range.1,
            step,
            gridlines: self.gridlines(range, step),
            points,
            intervals: Vec::new(),
            malformed_count: values.len() - finite.len(),
        }
    }

    fn parse_or_warn(&self, timestamp: &str) -> Option<f64> {
        match self.unit.parse(timestamp) {
            Ok(value) => Some(value),
            Err(err) => {
                warn!(error = %err, "excluding malformed timestamp from axis range");
                None
            }
        }
    }
}
