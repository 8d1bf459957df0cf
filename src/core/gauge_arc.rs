use serde::{Deserialize, Serialize};

use crate::error::{ReportError, ReportResult};

pub const GAUGE_START_ANGLE_DEG: f64 = -180.0;
pub const GAUGE_SWEEP_DEG: f64 = 180.0;

/// Caller-owned constants of a semicircular gauge.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GaugeArcGeometry {
    pub center_x: f64,
    pub center_y: f64,
    pub radius: f64,
    pub stroke_width: f64,
}

impl Default for GaugeArcGeometry {
    fn default() -> Self {
        Self {
            center_x: 100.0,
            center_y: 100.0,
            radius: 80.0,
            stroke_width: 12.0,
        }
    }
}

impl GaugeArcGeometry {
    pub fn new(center_x: f64, center_y: f64, radius: f64, stroke_width: f64) -> ReportResult<Self> {
        Self {
            center_x,
            center_y,
            radius,
            stroke_width,
        }
        .validate()
    }

    pub fn validate(self) -> ReportResult<Self> {
        if !self.center_x.is_finite() || !self.center_y.is_finite() {
            return Err(ReportError::InvalidData(
                "gauge center must be finite".to_owned(),
            ));
        }
        if !self.radius.is_finite() || self.radius <= 0.0 {
            return Err(ReportError::InvalidData(
                "gauge radius must be finite and > 0".to_owned(),
            ));
        }
        if !self.stroke_width.is_finite() || self.stroke_width <= 0.0 {
            return Err(ReportError::InvalidData(
                "gauge stroke width must be finite and > 0".to_owned(),
            ));
        }
        Ok(self)
    }

    /// Cartesian point on the gauge circle for an angle in degrees.
    #[must_use]
    pub fn polar_to_cartesian(self, angle_deg: f64) -> (f64, f64) {
        let theta = angle_deg.to_radians();
        (
            self.center_x + self.radius * theta.cos(),
            self.center_y + self.radius * theta.sin(),
        )
    }

    /// Arc from the fixed start angle covering `percentage` of the half circle.
    ///
    /// The percentage is clamped to `[0, 100]`; NaN is treated as `0`.
    #[must_use]
    pub fn arc_for_percentage(self, percentage: f64) -> ArcSpec {
        let percentage = clamp_percentage(percentage);
        let start_angle_deg = GAUGE_START_ANGLE_DEG;
        let end_angle_deg = start_angle_deg + (percentage / 100.0) * GAUGE_SWEEP_DEG;
        self.arc_between(start_angle_deg, end_angle_deg, percentage)
    }

    /// Full half-circle background track.
    #[must_use]
    pub fn track(self) -> ArcSpec {
        self.arc_for_percentage(100.0)
    }

    fn arc_between(self, start_angle_deg: f64, end_angle_deg: f64, percentage: f64) -> ArcSpec {
        let (start_x, start_y) = self.polar_to_cartesian(start_angle_deg);
        let (end_x, end_y) = self.polar_to_cartesian(end_angle_deg);
        let large_arc_flag = large_arc_flag(start_angle_deg, end_angle_deg);

        let path_data = format!(
            "M {} {} A {} {} 0 {} 1 {} {}",
            format_svg_number(start_x),
            format_svg_number(start_y),
            format_svg_number(self.radius),
            format_svg_number(self.radius),
            large_arc_flag,
            format_svg_number(end_x),
            format_svg_number(end_y),
        );

        ArcSpec {
            path_data,
            end_point_x: end_x,
            end_point_y: end_y,
            start_angle_deg,
            end_angle_deg,
            large_arc_flag,
            percentage,
        }
    }
}

/// SVG arc description of one gauge value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArcSpec {
    pub path_data: String,
    pub end_point_x: f64,
    pub end_point_y: f64,
    pub start_angle_deg: f64,
    pub end_angle_deg: f64,
    pub large_arc_flag: u8,
    pub percentage: f64,
}

impl ArcSpec {
    #[must_use]
    pub fn sweep_deg(&self) -> f64 {
        self.end_angle_deg - self.start_angle_deg
    }
}

#[must_use]
pub fn large_arc_flag(start_angle_deg: f64, end_angle_deg: f64) -> u8 {
    if end_angle_deg - start_angle_deg <= 180.0 {
        0
    } else {
        1
    }
}

#[must_use]
pub fn clamp_percentage(percentage: f64) -> f64 {
    if percentage.is_nan() {
        return 0.0;
    }
    percentage.clamp(0.0, 100.0)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GaugeEasing {
    #[default]
    Linear,
    EaseOutCubic,
}

impl GaugeEasing {
    #[must_use]
    pub fn apply(self, progress: f64) -> f64 {
        let t = if progress.is_nan() {
            0.0
        } else {
            progress.clamp(0.0, 1.0)
        };
        match self {
            Self::Linear => t,
            Self::EaseOutCubic => 1.0 - (1.0 - t).powi(3),
        }
    }
}

/// Linear blend between two percentages; `progress` is clamped to `[0, 1]`.
#[must_use]
pub fn interpolate_percentage(from: f64, to: f64, progress: f64) -> f64 {
    let from = clamp_percentage(from);
    let to = clamp_percentage(to);
    let t = GaugeEasing::Linear.apply(progress);
    from + (to - from) * t
}

/// Value-only description of a gauge transition.
///
/// The caller owns the clock: it samples `percentage_at` once per frame and
/// feeds the result to `GaugeArcGeometry::arc_for_percentage`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GaugeAnimation {
    pub from: f64,
    pub to: f64,
    pub duration_ms: f64,
    #[serde(default)]
    pub easing: GaugeEasing,
}

impl GaugeAnimation {
    #[must_use]
    pub fn new(from: f64, to: f64, duration_ms: f64) -> Self {
        Self {
            from,
            to,
            duration_ms,
            easing: GaugeEasing::Linear,
        }
    }

    #[must_use]
    pub fn with_easing(mut self, easing: GaugeEasing) -> Self {
        self.easing = easing;
        self
    }

    /// Percentage after `elapsed_ms`. Non-positive durations jump to `to`.
    #[must_use]
    pub fn percentage_at(self, elapsed_ms: f64) -> f64 {
        let progress = if !self.duration_ms.is_finite() || self.duration_ms <= 0.0 {
            1.0
        } else {
            elapsed_ms / self.duration_ms
        };
        interpolate_percentage(self.from, self.to, self.easing.apply(progress))
    }

    #[must_use]
    pub fn is_finished(self, elapsed_ms: f64) -> bool {
        !self.duration_ms.is_finite() || elapsed_ms >= self.duration_ms
    }

    /// `frame_count` evenly spaced samples, first at `from` and last at `to`.
    #[must_use]
    pub fn sample_frames(self, frame_count: usize) -> Vec<f64> {
        match frame_count {
            0 => Vec::new(),
            1 => vec![clamp_percentage(self.to)],
            _ => {
                let denominator = (frame_count - 1) as f64;
                (0..frame_count)
                    .map(|index| {
                        let progress = index as f64 / denominator;
                        interpolate_percentage(self.from, self.to, self.easing.apply(progress))
                    })
                    .collect()
            }
        }
    }
}

/// Compact SVG number: at most three decimals, no trailing zeros, no `-0`.
#[must_use]
pub fn format_svg_number(value: f64) -> String {
    if !value.is_finite() {
        return "0".to_owned();
    }
    let rounded = (value * 1_000.0).round() / 1_000.0;
    let text = format!("{rounded:.3}");
    let text = text.trim_end_matches('0').trim_end_matches('.');
    if text == "-0" {
        "0".to_owned()
    } else {
        text.to_owned()
    }
}
