pub mod gauge_arc;
pub mod label_collision;
pub mod primitives;
pub mod reaction_curve;
pub mod scale;
pub mod score;
pub mod temporal_binner;
pub mod types;

pub use gauge_arc::{
    ArcSpec, GaugeAnimation, GaugeArcGeometry, GaugeEasing, interpolate_percentage,
};
pub use label_collision::{LabelCollisionTuning, apply_collision_labels, label_visibility};
pub use primitives::{MALFORMED_TIMESTAMP_LABEL, parse_timestamp};
pub use reaction_curve::{
    CurveSample, CurveVertex, ReactionCurve, ReactionCurveTuning, build_reaction_curve,
    synthesize_reaction_curve,
};
pub use scale::LinearScale;
pub use score::{
    AccelerationFormula, AccelerationStatistics, IdlingPenalty, IdlingPenaltyRule,
    compute_acceleration_statistics, compute_idling_penalty, compute_idling_penalty_with_rule,
    compute_speeding_violations, summarize_acceleration, summarize_drive_scores,
    summarize_flagged_events, summarize_idling, summarize_reaction, summarize_speeding,
};
pub use temporal_binner::{
    AxisUnit, BinnedAxis, IntervalSpan, TemporalBinner, TemporalBinnerTuning,
};
pub use types::{
    ChartPoint, DurationEvent, ReportCategory, ReportGroup, ScoreSummary, TimedEvent, Viewport,
};
