//! Output structures handed to the drawing surface.
//!
//! Nothing here draws. Frames are fully materialized and deterministic so a
//! host can render them with any backend.

mod frame;
mod primitives;

pub use frame::{CategoryReport, ReportFrame};
pub use primitives::{ChartSlice, Color};
