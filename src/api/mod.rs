//! Report-level orchestration on top of the core algorithms.

mod engine_config;
mod json_contract;
mod payload;
mod report_builder;

pub use engine_config::ReportEngineConfig;
pub use json_contract::{REPORT_FRAME_JSON_SCHEMA_V1, ReportFrameJsonContractV1};
pub use payload::{
    DriveId, DriveWindow, FlaggedEntry, FlaggedSection, IdlingSection, IntervalEntry,
    ReactionSection, ReportPayload, SpeedingSection,
};

use crate::core::{GaugeArcGeometry, TemporalBinner};
use crate::error::ReportResult;

/// Turns report payloads into render-ready frames.
///
/// The engine only holds validated configuration. Building a frame never
/// mutates it, so one engine can serve any number of report screens.
#[derive(Debug, Clone)]
pub struct ReportEngine {
    config: ReportEngineConfig,
    binner: TemporalBinner,
    gauge: GaugeArcGeometry,
}

impl ReportEngine {
    pub fn new(config: ReportEngineConfig) -> ReportResult<Self> {
        let config = config.validate()?;
        let binner = TemporalBinner::with_tuning(
            config.axis_unit,
            config.viewport,
            config.binner.clone(),
            config.labels,
        )?;
        let gauge = config.gauge;

        Ok(Self {
            config,
            binner,
            gauge,
        })
    }

    #[must_use]
    pub fn config(&self) -> &ReportEngineConfig {
        &self.config
    }

    #[must_use]
    pub fn binner(&self) -> &TemporalBinner {
        &self.binner
    }

    #[must_use]
    pub fn gauge(&self) -> GaugeArcGeometry {
        self.gauge
    }
}
