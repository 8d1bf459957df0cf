use crate::core::types::Viewport;
use crate::error::{ReportError, ReportResult};

/// Linear mapping from an axis domain onto the viewport width.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    domain_start: f64,
    domain_end: f64,
}

impl LinearScale {
    pub fn new(domain_start: f64, domain_end: f64) -> ReportResult<Self> {
        if !domain_start.is_finite() || !domain_end.is_finite() || domain_start == domain_end {
            return Err(ReportError::InvalidData(
                "scale domain must be finite and non-zero".to_owned(),
            ));
        }

        Ok(Self {
            domain_start,
            domain_end,
        })
    }

    #[must_use]
    pub fn span(self) -> f64 {
        self.domain_end - self.domain_start
    }

    /// Normalized `[0, 1]`-ish ratio of `value` inside the domain (unclamped).
    #[must_use]
    pub fn ratio(self, value: f64) -> f64 {
        (value - self.domain_start) / self.span()
    }

    pub fn domain_to_pixel(self, value: f64, viewport: Viewport) -> ReportResult<f64> {
        if !viewport.is_valid() {
            return Err(ReportError::InvalidViewport {
                width: viewport.width,
                height: viewport.height,
            });
        }

        if !value.is_finite() {
            return Err(ReportError::InvalidData("value must be finite".to_owned()));
        }

        Ok(self.ratio(value) * f64::from(viewport.width))
    }

    /// Same as `domain_to_pixel` but pinned to `[0, viewport.width]`.
    pub fn domain_to_pixel_clamped(self, value: f64, viewport: Viewport) -> ReportResult<f64> {
        let px = self.domain_to_pixel(value, viewport)?;
        Ok(px.clamp(0.0, f64::from(viewport.width)))
    }
}
