//! Score and penalty derivation for report categories.
//!
//! Every function here is total: empty inputs produce zeroed results,
//! malformed events contribute nothing and ratios over zero events are `0`.

use indexmap::IndexMap;
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::core::types::{DurationEvent, ScoreSummary, TimedEvent};
use crate::error::{ReportError, ReportResult};

/// Grace period and step size of the idling penalty.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IdlingPenaltyRule {
    pub grace_seconds: f64,
    pub increment_seconds: f64,
    pub points_per_increment: f64,
}

impl Default for IdlingPenaltyRule {
    fn default() -> Self {
        Self {
            grace_seconds: 120.0,
            increment_seconds: 30.0,
            points_per_increment: 5.0,
        }
    }
}

impl IdlingPenaltyRule {
    pub fn validate(self) -> ReportResult<Self> {
        if !self.grace_seconds.is_finite() || self.grace_seconds < 0.0 {
            return Err(ReportError::InvalidData(
                "idling grace seconds must be finite and >= 0".to_owned(),
            ));
        }
        if !self.increment_seconds.is_finite() || self.increment_seconds <= 0.0 {
            return Err(ReportError::InvalidData(
                "idling increment seconds must be finite and > 0".to_owned(),
            ));
        }
        if !self.points_per_increment.is_finite() || self.points_per_increment < 0.0 {
            return Err(ReportError::InvalidData(
                "idling points per increment must be finite and >= 0".to_owned(),
            ));
        }
        Ok(self)
    }

    /// Penalty for one idling interval of `duration_seconds`.
    #[must_use]
    pub fn penalty_for_duration(self, duration_seconds: f64) -> f64 {
        if !duration_seconds.is_finite() {
            return 0.0;
        }
        let excess = (duration_seconds.max(0.0) - self.grace_seconds).max(0.0);
        (excess / self.increment_seconds).ceil() * self.points_per_increment
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdlingPenalty {
    pub per_event_penalty: Vec<f64>,
    pub total_penalty: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccelerationFormula {
    pub calculated: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccelerationStatistics {
    pub total: usize,
    pub high: usize,
    pub normal: usize,
    pub formula: AccelerationFormula,
}

#[must_use]
pub fn compute_idling_penalty(events: &[DurationEvent]) -> IdlingPenalty {
    compute_idling_penalty_with_rule(events, IdlingPenaltyRule::default())
}

/// Per-event and total idling penalty under an explicit rule.
///
/// Durations are rounded up to the next increment past the grace period.
#[must_use]
pub fn compute_idling_penalty_with_rule(
    events: &[DurationEvent],
    rule: IdlingPenaltyRule,
) -> IdlingPenalty {
    let per_event_penalty: Vec<f64> = events
        .iter()
        .map(|event| match event.duration_seconds() {
            Ok(duration) => rule.penalty_for_duration(duration),
            Err(err) => {
                warn!(error = %err, "idling event excluded from penalty");
                0.0
            }
        })
        .collect();
    let total_penalty = per_event_penalty.iter().sum();

    IdlingPenalty {
        per_event_penalty,
        total_penalty,
    }
}

/// Splits events into rapid (`flag == true`) and normal acceleration.
#[must_use]
pub fn compute_acceleration_statistics(events: &[TimedEvent]) -> AccelerationStatistics {
    let total = events.len();
    let high = events
        .iter()
        .filter(|event| event.flag == Some(true))
        .count();
    let normal = total - high;
    let calculated = if total > 0 {
        (100.0 * normal as f64 / total as f64).round() as u32
    } else {
        0
    };

    AccelerationStatistics {
        total,
        high,
        normal,
        formula: AccelerationFormula { calculated },
    }
}

/// Coarse violation count: one violation per 10 points below 100.
///
/// Halves round up (`75 -> 3`).
#[must_use]
pub fn compute_speeding_violations(score: f64) -> u32 {
    if !score.is_finite() {
        return 0;
    }
    let score = score.clamp(0.0, 100.0);
    if score == 100.0 {
        return 0;
    }

    let Some(score) = Decimal::from_f64(score) else {
        return 0;
    };
    ((Decimal::ONE_HUNDRED - score) / Decimal::TEN)
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_u32()
        .unwrap_or(0)
}

/// Clamps a payload score into `[0, 100]`; missing or non-finite becomes `0`.
#[must_use]
pub fn normalize_raw_score(score: Option<f64>) -> f64 {
    match score {
        Some(value) if value.is_finite() => value.clamp(0.0, 100.0),
        _ => 0.0,
    }
}

#[must_use]
pub fn summarize_idling(
    score: Option<f64>,
    events: &[DurationEvent],
    rule: IdlingPenaltyRule,
) -> ScoreSummary {
    let penalty = compute_idling_penalty_with_rule(events, rule);
    let mut total_idle_seconds = 0.0;
    let mut penalized_events = 0usize;
    for (event, event_penalty) in events.iter().zip(&penalty.per_event_penalty) {
        if let Ok(duration) = event.duration_seconds() {
            total_idle_seconds += duration;
        }
        if *event_penalty > 0.0 {
            penalized_events += 1;
        }
    }

    let mut statistics = IndexMap::new();
    statistics.insert("event_count".to_owned(), events.len() as f64);
    statistics.insert("penalized_events".to_owned(), penalized_events as f64);
    statistics.insert("total_idle_seconds".to_owned(), total_idle_seconds);

    ScoreSummary {
        raw_score: normalize_raw_score(score),
        penalty: penalty.total_penalty,
        statistics,
    }
}

#[must_use]
pub fn summarize_acceleration(score: Option<f64>, events: &[TimedEvent]) -> ScoreSummary {
    let stats = compute_acceleration_statistics(events);
    let mut statistics = IndexMap::new();
    statistics.insert("total".to_owned(), stats.total as f64);
    statistics.insert("high".to_owned(), stats.high as f64);
    statistics.insert("normal".to_owned(), stats.normal as f64);
    statistics.insert(
        "formula_calculated".to_owned(),
        f64::from(stats.formula.calculated),
    );

    ScoreSummary {
        raw_score: normalize_raw_score(score),
        penalty: 0.0,
        statistics,
    }
}

/// Speeding summary. A missing score reports no violations.
#[must_use]
pub fn summarize_speeding(score: Option<f64>) -> ScoreSummary {
    let raw_score = normalize_raw_score(score);
    let violations = match score {
        Some(value) if value.is_finite() => compute_speeding_violations(raw_score),
        _ => 0,
    };
    let mut statistics = IndexMap::new();
    statistics.insert("violations".to_owned(), f64::from(violations));

    ScoreSummary {
        raw_score,
        penalty: 0.0,
        statistics,
    }
}

/// Counts flagged events, e.g. late reactions or distraction alerts.
#[must_use]
pub fn summarize_flagged_events(score: Option<f64>, events: &[TimedEvent]) -> ScoreSummary {
    let flagged = events
        .iter()
        .filter(|event| event.flag == Some(true))
        .count();
    let mut statistics = IndexMap::new();
    statistics.insert("event_count".to_owned(), events.len() as f64);
    statistics.insert("flagged".to_owned(), flagged as f64);

    ScoreSummary {
        raw_score: normalize_raw_score(score),
        penalty: 0.0,
        statistics,
    }
}

/// Reaction summary; `penalty_count` drives the reaction curve band.
#[must_use]
pub fn summarize_reaction(
    score: Option<f64>,
    event_count: usize,
    penalty_count: usize,
) -> ScoreSummary {
    let mut statistics = IndexMap::new();
    statistics.insert("event_count".to_owned(), event_count as f64);
    statistics.insert("penalty_count".to_owned(), penalty_count as f64);

    ScoreSummary {
        raw_score: normalize_raw_score(score),
        penalty: 0.0,
        statistics,
    }
}

/// Aggregate across categories or drives: mean score plus min/max/count.
#[must_use]
pub fn summarize_drive_scores(scores: &[f64]) -> ScoreSummary {
    let finite: Vec<f64> = scores
        .iter()
        .copied()
        .filter(|score| score.is_finite())
        .map(|score| score.clamp(0.0, 100.0))
        .collect();
    if finite.is_empty() {
        let mut summary = ScoreSummary::empty();
        summary.statistics.insert("count".to_owned(), 0.0);
        return summary;
    }

    let count = finite.len() as f64;
    let mean = finite.iter().sum::<f64>() / count;
    let min = finite.iter().copied().fold(f64::INFINITY, f64::min);
    let max = finite.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    let mut statistics = IndexMap::new();
    statistics.insert("count".to_owned(), count);
    statistics.insert("min".to_owned(), min);
    statistics.insert("max".to_owned(), max);

    ScoreSummary {
        raw_score: mean,
        penalty: 0.0,
        statistics,
    }
}
