use serde::{Deserialize, Serialize};

use crate::core::{
    AxisUnit, GaugeArcGeometry, IdlingPenaltyRule, LabelCollisionTuning, ReactionCurveTuning,
    TemporalBinnerTuning, Viewport,
};
use crate::error::{ReportError, ReportResult};

/// Public engine bootstrap configuration.
///
/// This type is serializable so host applications can persist/load report
/// layout without inventing their own ad-hoc format. Missing fields fall back
/// to defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportEngineConfig {
    pub viewport: Viewport,
    #[serde(default)]
    pub axis_unit: AxisUnit,
    #[serde(default)]
    pub binner: TemporalBinnerTuning,
    #[serde(default)]
    pub labels: LabelCollisionTuning,
    #[serde(default)]
    pub gauge: GaugeArcGeometry,
    #[serde(default)]
    pub reaction_curve: ReactionCurveTuning,
    #[serde(default)]
    pub idling_rule: IdlingPenaltyRule,
}

impl Default for ReportEngineConfig {
    fn default() -> Self {
        Self::new(Viewport::new(360, 200))
    }
}

impl ReportEngineConfig {
    /// Creates a config with default tuning for the given chart viewport.
    #[must_use]
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            axis_unit: AxisUnit::default(),
            binner: TemporalBinnerTuning::default(),
            labels: LabelCollisionTuning::default(),
            gauge: GaugeArcGeometry::default(),
            reaction_curve: ReactionCurveTuning::default(),
            idling_rule: IdlingPenaltyRule::default(),
        }
    }

    #[must_use]
    pub fn with_axis_unit(mut self, unit: AxisUnit) -> Self {
        self.axis_unit = unit;
        self
    }

    #[must_use]
    pub fn with_binner_tuning(mut self, tuning: TemporalBinnerTuning) -> Self {
        self.binner = tuning;
        self
    }

    #[must_use]
    pub fn with_label_tuning(mut self, tuning: LabelCollisionTuning) -> Self {
        self.labels = tuning;
        self
    }

    #[must_use]
    pub fn with_gauge(mut self, gauge: GaugeArcGeometry) -> Self {
        self.gauge = gauge;
        self
    }

    #[must_use]
    pub fn with_reaction_curve_tuning(mut self, tuning: ReactionCurveTuning) -> Self {
        self.reaction_curve = tuning;
        self
    }

    #[must_use]
    pub fn with_idling_rule(mut self, rule: IdlingPenaltyRule) -> Self {
        self.idling_rule = rule;
        self
    }

    /// Validates every nested tuning block.
    pub fn validate(self) -> ReportResult<Self> {
        if !self.viewport.is_valid() {
            return Err(ReportError::InvalidViewport {
                width: self.viewport.width,
                height: self.viewport.height,
            });
        }
        Ok(Self {
            viewport: self.viewport,
            axis_unit: self.axis_unit,
            binner: self.binner.validate()?,
            labels: self.labels.validate()?,
            gauge: self.gauge.validate()?,
            reaction_curve: self.reaction_curve.validate()?,
            idling_rule: self.idling_rule.validate()?,
        })
    }

    /// Serializes config to pretty JSON for debug/config files.
    pub fn to_json_pretty(&self) -> ReportResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| ReportError::InvalidData(format!("failed to serialize config: {e}")))
    }

    /// Deserializes config from JSON.
    pub fn from_json_str(input: &str) -> ReportResult<Self> {
        serde_json::from_str(input)
            .map_err(|e| ReportError::InvalidData(format!("failed to parse config: {e}")))
    }
}
