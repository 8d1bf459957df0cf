use serde::{Deserialize, Serialize};

use crate::core::types::ChartPoint;
use crate::error::{ReportError, ReportResult};

/// Separation rule for timeline labels.
///
/// Two neighbours collide when their gap is below `range / separation_divisor`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LabelCollisionTuning {
    pub separation_divisor: f64,
}

impl Default for LabelCollisionTuning {
    fn default() -> Self {
        Self {
            separation_divisor: 20.0,
        }
    }
}

impl LabelCollisionTuning {
    pub fn validate(self) -> ReportResult<Self> {
        if !self.separation_divisor.is_finite() || self.separation_divisor <= 0.0 {
            return Err(ReportError::InvalidData(
                "label separation divisor must be finite and > 0".to_owned(),
            ));
        }
        Ok(self)
    }

    #[must_use]
    pub fn min_separation(self, range: f64) -> f64 {
        range / self.separation_divisor
    }
}

/// Decides label visibility for axis-unit positions.
///
/// Positions are visited in ascending order. A point whose gap to its
/// successor (the last point: its predecessor) is below the separation keeps
/// its label only when its rank in that order is even. The result is indexed
/// like `positions`.
#[must_use]
pub fn label_visibility(positions: &[f64], range: f64, tuning: LabelCollisionTuning) -> Vec<bool> {
    let mut visible = vec![true; positions.len()];
    if positions.len() < 2 {
        return visible;
    }

    let threshold = tuning.min_separation(range);
    if !threshold.is_finite() || threshold <= 0.0 {
        return visible;
    }

    let mut order: Vec<usize> = (0..positions.len()).collect();
    order.sort_by(|left, right| positions[*left].total_cmp(&positions[*right]));

    let last_rank = order.len() - 1;
    for (rank, &index) in order.iter().enumerate() {
        let neighbour = if rank == last_rank {
            order[rank - 1]
        } else {
            order[rank + 1]
        };
        let gap = (positions[neighbour] - positions[index]).abs();
        // NaN gaps compare false and keep the label.
        if gap < threshold && rank % 2 != 0 {
            visible[index] = false;
        }
    }

    visible
}

/// Applies `label_visibility` to chart points whose `position` is in axis units.
///
/// Points already hidden by the caller stay hidden.
#[must_use]
pub fn apply_collision_labels(
    points: Vec<ChartPoint>,
    range: f64,
    tuning: LabelCollisionTuning,
) -> Vec<ChartPoint> {
    let positions: Vec<f64> = points.iter().map(|point| point.position).collect();
    let visible = label_visibility(&positions, range, tuning);

    points
        .into_iter()
        .zip(visible)
        .map(|(mut point, show)| {
            point.show_label = point.show_label && show;
            point
        })
        .collect()
}
