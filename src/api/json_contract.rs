use serde::{Deserialize, Serialize};

use crate::error::{ReportError, ReportResult};
use crate::render::ReportFrame;

use super::ReportEngine;

pub const REPORT_FRAME_JSON_SCHEMA_V1: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportFrameJsonContractV1 {
    pub schema_version: u32,
    pub frame: ReportFrame,
}

impl ReportFrame {
    pub fn to_json_pretty(&self) -> ReportResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| ReportError::InvalidData(format!("failed to serialize report frame: {e}")))
    }

    pub fn to_json_contract_v1_pretty(&self) -> ReportResult<String> {
        let payload = ReportFrameJsonContractV1 {
            schema_version: REPORT_FRAME_JSON_SCHEMA_V1,
            frame: self.clone(),
        };
        serde_json::to_string_pretty(&payload).map_err(|e| {
            ReportError::InvalidData(format!("failed to serialize report frame contract v1: {e}"))
        })
    }

    /// Accepts either a bare frame or a versioned v1 contract.
    pub fn from_json_compat_str(input: &str) -> ReportResult<Self> {
        if let Ok(frame) = serde_json::from_str::<ReportFrame>(input) {
            return Ok(frame);
        }
        let payload: ReportFrameJsonContractV1 = serde_json::from_str(input).map_err(|e| {
            ReportError::InvalidData(format!("failed to parse report frame json payload: {e}"))
        })?;
        if payload.schema_version != REPORT_FRAME_JSON_SCHEMA_V1 {
            return Err(ReportError::InvalidData(format!(
                "unsupported report frame schema version: {}",
                payload.schema_version
            )));
        }
        Ok(payload.frame)
    }
}

impl ReportEngine {
    /// Parses a raw payload and exports its frame as a v1 JSON contract.
    pub fn build_frame_json_contract_v1_pretty(&self, payload_json: &str) -> ReportResult<String> {
        self.build_frame_from_json(payload_json)?
            .to_json_contract_v1_pretty()
    }
}
