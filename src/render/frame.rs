use serde::{Deserialize, Serialize};

use crate::core::{
    ArcSpec, BinnedAxis, ReactionCurve, ReportCategory, ScoreSummary, Viewport,
};
use crate::error::{ReportError, ReportResult};
use crate::render::ChartSlice;

/// Everything a drawing surface needs for one report category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryReport {
    pub category: ReportCategory,
    pub summary: ScoreSummary,
    #[serde(default)]
    pub feedback: Option<String>,
    pub gauge: ArcSpec,
    pub slices: Vec<ChartSlice>,
    #[serde(default)]
    pub timeline: Option<BinnedAxis>,
}

/// Backend-agnostic output of one report payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportFrame {
    #[serde(default)]
    pub drive_id: Option<String>,
    pub viewport: Viewport,
    pub categories: Vec<CategoryReport>,
    pub overall: ScoreSummary,
    pub overall_gauge: ArcSpec,
    #[serde(default)]
    pub reaction_curve: Option<ReactionCurve>,
}

impl ReportFrame {
    #[must_use]
    pub fn category(&self, category: ReportCategory) -> Option<&CategoryReport> {
        self.categories
            .iter()
            .find(|report| report.category == category)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    pub fn validate(&self) -> ReportResult<()> {
        if !self.viewport.is_valid() {
            return Err(ReportError::InvalidViewport {
                width: self.viewport.width,
                height: self.viewport.height,
            });
        }

        let width = f64::from(self.viewport.width);
        for report in &self.categories {
            for slice in &report.slices {
                slice.validate()?;
            }
            if let Some(timeline) = &report.timeline {
                let positions = timeline
                    .points
                    .iter()
                    .chain(&timeline.gridlines)
                    .map(|point| point.position)
                    .chain(
                        timeline
                            .intervals
                            .iter()
                            .flat_map(|span| [span.start_position, span.end_position]),
                    );
                for position in positions {
                    if !position.is_finite() || !(0.0..=width).contains(&position) {
                        return Err(ReportError::InvalidData(format!(
                            "{} timeline position must be inside [0, {width}]",
                            report.category.title()
                        )));
                    }
                }
            }
        }

        if let Some(curve) = &self.reaction_curve {
            if curve
                .vertices
                .iter()
                .any(|vertex| !vertex.x.is_finite() || !vertex.y.is_finite())
            {
                return Err(ReportError::InvalidData(
                    "reaction curve vertices must be finite".to_owned(),
                ));
            }
        }

        Ok(())
    }
}
