//! Deterministic "reaction quality" curve built from sparse event times.
//!
//! Values live in `[0, 1]` where lower is better. Samples close to an event
//! take a value from the good or bad band depending on whether the drive had
//! reaction penalties; everything else falls back to a distance-based
//! baseline. No randomness is involved, so identical inputs give
//! bit-identical output.

use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

use crate::core::scale::LinearScale;
use crate::core::types::Viewport;
use crate::error::{ReportError, ReportResult};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReactionCurveTuning {
    pub sample_count: usize,
    /// Axis-unit distance under which a sample counts as near an event.
    pub near_event_threshold: f64,
    /// Proximity falloff per axis unit.
    pub proximity_falloff: f64,
    pub good_band: (f64, f64),
    pub bad_band: (f64, f64),
    pub baseline_floor: f64,
    pub baseline_ceiling: f64,
}

impl Default for ReactionCurveTuning {
    fn default() -> Self {
        Self {
            sample_count: 100,
            near_event_threshold: 2.0,
            proximity_falloff: 0.5,
            good_band: (0.2, 0.5),
            bad_band: (0.7, 1.0),
            baseline_floor: 0.2,
            baseline_ceiling: 0.5,
        }
    }
}

impl ReactionCurveTuning {
    pub fn validate(self) -> ReportResult<Self> {
        if self.sample_count < 2 {
            return Err(ReportError::InvalidData(
                "reaction curve needs at least 2 samples".to_owned(),
            ));
        }
        if !self.near_event_threshold.is_finite() || self.near_event_threshold <= 0.0 {
            return Err(ReportError::InvalidData(
                "reaction near-event threshold must be finite and > 0".to_owned(),
            ));
        }
        if !self.proximity_falloff.is_finite() || self.proximity_falloff < 0.0 {
            return Err(ReportError::InvalidData(
                "reaction proximity falloff must be finite and >= 0".to_owned(),
            ));
        }
        for (name, (low, high)) in [("good_band", self.good_band), ("bad_band", self.bad_band)] {
            if !low.is_finite() || !high.is_finite() || low > high || low < 0.0 || high > 1.0 {
                return Err(ReportError::InvalidData(format!(
                    "reaction `{name}` must be an ordered range inside [0, 1]"
                )));
            }
        }
        if !self.baseline_floor.is_finite()
            || !self.baseline_ceiling.is_finite()
            || self.baseline_floor > self.baseline_ceiling
        {
            return Err(ReportError::InvalidData(
                "reaction baseline floor must not exceed ceiling".to_owned(),
            ));
        }
        Ok(self)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurveSample {
    pub time: f64,
    pub value: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurveVertex {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReactionCurve {
    pub samples: Vec<CurveSample>,
    pub vertices: Vec<CurveVertex>,
}

impl ReactionCurve {
    #[must_use]
    pub fn empty() -> Self {
        Self {
            samples: Vec::new(),
            vertices: Vec::new(),
        }
    }
}

/// Value of one sample at `distance` axis units from the nearest event.
#[must_use]
pub fn sample_value(distance: f64, has_penalties: bool, tuning: ReactionCurveTuning) -> f64 {
    if distance < tuning.near_event_threshold {
        let proximity = (1.0 - distance * tuning.proximity_falloff).max(0.0);
        let (low, high) = if has_penalties {
            tuning.bad_band
        } else {
            tuning.good_band
        };
        return low + (high - low) * proximity;
    }

    // Infinite distance (no events) resolves to the floor.
    (1.0 / (1.0 + distance)).clamp(tuning.baseline_floor, tuning.baseline_ceiling)
}

/// Samples the curve across `range` with `tuning.sample_count` points.
///
/// `event_times` are in the same axis units as `range`; non-finite entries are
/// ignored. A degenerate range yields an empty curve.
#[must_use]
pub fn synthesize_reaction_curve(
    event_times: &[f64],
    penalty_count: usize,
    range: (f64, f64),
    tuning: ReactionCurveTuning,
) -> Vec<CurveSample> {
    let (start, end) = range;
    if !start.is_finite() || !end.is_finite() || end <= start || tuning.sample_count < 2 {
        return Vec::new();
    }

    let events: Vec<f64> = event_times
        .iter()
        .copied()
        .filter(|time| time.is_finite())
        .collect();
    let has_penalties = penalty_count > 0;
    let step = (end - start) / (tuning.sample_count - 1) as f64;

    (0..tuning.sample_count)
        .map(|index| {
            let time = start + index as f64 * step;
            let distance = events
                .iter()
                .map(|event| OrderedFloat((event - time).abs()))
                .min()
                .map_or(f64::INFINITY, |distance| distance.0);
            CurveSample {
                time,
                value: sample_value(distance, has_penalties, tuning),
            }
        })
        .collect()
}

/// Projects samples to pixels. Lower values sit higher on screen.
#[must_use]
pub fn project_reaction_curve(
    samples: &[CurveSample],
    range: (f64, f64),
    viewport: Viewport,
) -> Vec<CurveVertex> {
    if !viewport.is_valid() || !(range.1 > range.0) {
        return Vec::new();
    }
    let Ok(scale) = LinearScale::new(range.0, range.1) else {
        return Vec::new();
    };
    let height = f64::from(viewport.height);

    samples
        .iter()
        .map(|sample| CurveVertex {
            x: scale
                .domain_to_pixel_clamped(sample.time, viewport)
                .unwrap_or(0.0),
            y: sample.value.clamp(0.0, 1.0) * height,
        })
        .collect()
}

#[must_use]
pub fn build_reaction_curve(
    event_times: &[f64],
    penalty_count: usize,
    range: (f64, f64),
    viewport: Viewport,
    tuning: ReactionCurveTuning,
) -> ReactionCurve {
    let samples = synthesize_reaction_curve(event_times, penalty_count, range, tuning);
    let vertices = project_reaction_curve(&samples, range, viewport);
    ReactionCurve { samples, vertices }
}
