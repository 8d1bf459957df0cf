use serde::{Deserialize, Serialize};

use crate::error::{ReportError, ReportResult};

/// RGBA color in normalized 0..=1 channel values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub red: f64,
    pub green: f64,
    pub blue: f64,
    pub alpha: f64,
}

impl Color {
    pub const SCORE_GOOD: Self = Self::rgb(0.24, 0.70, 0.44);
    pub const SCORE_FAIR: Self = Self::rgb(0.96, 0.65, 0.14);
    pub const SCORE_POOR: Self = Self::rgb(0.86, 0.24, 0.24);
    pub const NEUTRAL: Self = Self::rgb(0.62, 0.64, 0.68);

    #[must_use]
    pub const fn rgba(red: f64, green: f64, blue: f64, alpha: f64) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    #[must_use]
    pub const fn rgb(red: f64, green: f64, blue: f64) -> Self {
        Self::rgba(red, green, blue, 1.0)
    }

    /// Traffic-light color of a 0-100 score.
    #[must_use]
    pub fn for_score(score: f64) -> Self {
        if !score.is_finite() {
            return Self::NEUTRAL;
        }
        if score >= 80.0 {
            Self::SCORE_GOOD
        } else if score >= 50.0 {
            Self::SCORE_FAIR
        } else {
            Self::SCORE_POOR
        }
    }

    pub fn validate(self) -> ReportResult<()> {
        for (channel, value) in [
            ("red", self.red),
            ("green", self.green),
            ("blue", self.blue),
            ("alpha", self.alpha),
        ] {
            if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                return Err(ReportError::InvalidData(format!(
                    "color channel `{channel}` must be finite and in [0, 1]"
                )));
            }
        }
        Ok(())
    }
}

/// One bar or pie segment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSlice {
    pub value: f64,
    pub label: String,
    pub color: Color,
}

impl ChartSlice {
    #[must_use]
    pub fn new(value: f64, label: impl Into<String>, color: Color) -> Self {
        Self {
            value,
            label: label.into(),
            color,
        }
    }

    pub fn validate(&self) -> ReportResult<()> {
        if !self.value.is_finite() || self.value < 0.0 {
            return Err(ReportError::InvalidData(
                "slice value must be finite and >= 0".to_owned(),
            ));
        }
        self.color.validate()
    }
}
