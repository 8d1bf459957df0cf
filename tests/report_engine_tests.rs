use drive_report::api::{ReportFrameJsonContractV1, REPORT_FRAME_JSON_SCHEMA_V1};
use drive_report::core::{
    AxisUnit, GaugeAnimation, MALFORMED_TIMESTAMP_LABEL, ReportCategory, TemporalBinnerTuning,
    Viewport, parse_timestamp,
};
use drive_report::render::{Color, ReportFrame};
use drive_report::{ReportEngine, ReportEngineConfig, ReportError, ReportPayload};

const FULL_PAYLOAD: &str = r#"{
    "driveId": 17,
    "idling": {
        "score": 70,
        "feedback": "Switch the engine off when parked.",
        "graph": [
            {"startTime": "2025-01-01T00:00:00Z", "endTime": "2025-01-01T00:04:00Z"}
        ]
    },
    "acceleration": {
        "score": 90,
        "graph": [
            {"time": "2025-01-01T00:01:00Z", "flag": true},
            {"time": "2025-01-01T00:02:00Z", "flag": false}
        ]
    },
    "speeding": {"score": 75},
    "reaction": {
        "score": null,
        "graph": ["2025-01-01T00:00:30Z", "2025-01-01T00:03:00Z"],
        "penaltyCount": 1
    },
    "attention": {"graph": []}
}"#;

fn engine() -> ReportEngine {
    ReportEngine::new(ReportEngineConfig::default()).expect("engine init")
}

fn unix(timestamp: &str) -> f64 {
    parse_timestamp(timestamp).expect("timestamp").timestamp() as f64
}

#[test]
fn full_payload_builds_categories_in_fixed_order() {
    let frame = engine().build_frame_from_json(FULL_PAYLOAD).expect("frame");

    let order: Vec<ReportCategory> = frame.categories.iter().map(|c| c.category).collect();
    assert_eq!(order, ReportCategory::ALL.to_vec());
    assert_eq!(frame.drive_id.as_deref(), Some("17"));
    frame.validate().expect("frame should validate");
}

#[test]
fn single_idling_interval_end_to_end() {
    let frame = engine().build_frame_from_json(FULL_PAYLOAD).expect("frame");
    let idling = frame.category(ReportCategory::Idling).expect("idling");

    assert_eq!(idling.summary.raw_score, 70.0);
    assert_eq!(idling.summary.penalty, 20.0);
    assert_eq!(
        idling.feedback.as_deref(),
        Some("Switch the engine off when parked.")
    );
    assert_eq!(idling.slices.len(), 1);
    assert_eq!(idling.slices[0].value, 240.0);
    assert_eq!(idling.slices[0].color, Color::SCORE_POOR);

    let timeline = idling.timeline.as_ref().expect("timeline");
    let t0 = unix("2025-01-01T00:00:00Z");
    assert!((timeline.range_start - (t0 - 5.0)).abs() <= 1e-9);
    assert!((timeline.range_end - (t0 + 245.0)).abs() <= 1e-9);
    assert_eq!(timeline.intervals.len(), 1);
    assert!((idling.gauge.percentage - 70.0).abs() <= 1e-12);
}

#[test]
fn category_statistics_follow_score_rules() {
    let frame = engine().build_frame_from_json(FULL_PAYLOAD).expect("frame");

    let acceleration = frame
        .category(ReportCategory::Acceleration)
        .expect("acceleration");
    assert_eq!(acceleration.summary.statistic("high"), Some(1.0));
    assert_eq!(acceleration.summary.statistic("formula_calculated"), Some(50.0));
    let labels: Vec<&str> = acceleration.slices.iter().map(|s| s.label.as_str()).collect();
    assert_eq!(labels, vec!["Rapid", "Normal"]);

    let speeding = frame.category(ReportCategory::Speeding).expect("speeding");
    assert_eq!(speeding.summary.statistic("violations"), Some(3.0));
    assert_eq!(speeding.slices[0].color, Color::SCORE_FAIR);
    assert!(speeding.timeline.is_none());

    let reaction = frame.category(ReportCategory::Reaction).expect("reaction");
    assert_eq!(reaction.summary.raw_score, 0.0);
    assert_eq!(reaction.summary.statistic("penalty_count"), Some(1.0));

    let attention = frame.category(ReportCategory::Attention).expect("attention");
    let timeline = attention.timeline.as_ref().expect("timeline");
    assert_eq!((timeline.range_start, timeline.range_end), (0.0, 60.0));
    assert!(attention.slices.iter().all(|slice| slice.value == 0.0));
}

#[test]
fn overall_score_averages_categories_with_scores() {
    let frame = engine().build_frame_from_json(FULL_PAYLOAD).expect("frame");

    // idling 70, acceleration 90, speeding 75; reaction/attention carry no score.
    let expected = (70.0 + 90.0 + 75.0) / 3.0;
    assert!((frame.overall.raw_score - expected).abs() <= 1e-9);
    assert_eq!(frame.overall.statistic("count"), Some(3.0));
    assert_eq!(frame.overall.statistic("min"), Some(70.0));
    assert!((frame.overall_gauge.percentage - expected).abs() <= 1e-9);
}

#[test]
fn reaction_curve_spans_reaction_timeline() {
    let frame = engine().build_frame_from_json(FULL_PAYLOAD).expect("frame");
    let reaction = frame.category(ReportCategory::Reaction).expect("reaction");
    let timeline = reaction.timeline.as_ref().expect("timeline");
    let curve = frame.reaction_curve.as_ref().expect("curve");

    assert_eq!(curve.samples.len(), 100);
    assert_eq!(curve.vertices.len(), 100);
    assert_eq!(curve.samples[0].time, timeline.range_start);
    assert!((curve.samples[99].time - timeline.range_end).abs() <= 1e-6);
    assert!(
        curve
            .vertices
            .iter()
            .all(|vertex| (0.0..=360.0).contains(&vertex.x) && (0.0..=200.0).contains(&vertex.y))
    );

    let again = engine().build_frame_from_json(FULL_PAYLOAD).expect("frame");
    assert_eq!(frame, again);
}

#[test]
fn empty_payload_builds_empty_frame() {
    let frame = engine().build_frame_from_json("{}").expect("frame");
    assert!(frame.is_empty());
    assert!(frame.drive_id.is_none());
    assert!(frame.reaction_curve.is_none());
    assert_eq!(frame.overall.raw_score, 0.0);
    assert_eq!(frame.overall.statistic("count"), Some(0.0));
    assert_eq!(frame.overall_gauge.percentage, 0.0);
    assert_eq!(frame.overall_gauge.sweep_deg(), 0.0);
}

#[test]
fn drive_window_sets_shared_axis_range() {
    let payload = ReportPayload::from_json_str(
        r#"{
            "window": {"startTime": "2025-01-01T00:00:00Z", "endTime": "2025-01-01T00:10:00Z"},
            "idling": {"graph": [{"startTime": "2025-01-01T00:01:00Z", "endTime": "2025-01-01T00:02:00Z"}]},
            "acceleration": {"graph": [{"time": "2025-01-01T00:05:00Z", "flag": true}]}
        }"#,
    )
    .expect("payload");
    let frame = engine().build_frame(&payload);

    let start = unix("2025-01-01T00:00:00Z");
    let end = unix("2025-01-01T00:10:00Z");
    for report in &frame.categories {
        let timeline = report.timeline.as_ref().expect("timeline");
        assert_eq!((timeline.range_start, timeline.range_end), (start, end));
    }
    let acceleration = frame
        .category(ReportCategory::Acceleration)
        .and_then(|report| report.timeline.as_ref())
        .expect("timeline");
    assert!((acceleration.points[0].position - 180.0).abs() <= 1e-9);
}

#[test]
fn malformed_window_falls_back_to_fitted_range() {
    let payload = ReportPayload::from_json_str(
        r#"{
            "window": {"startTime": "bogus", "endTime": "2025-01-01T00:10:00Z"},
            "acceleration": {"graph": [{"time": "2025-01-01T00:05:00Z"}]}
        }"#,
    )
    .expect("payload");
    let frame = engine().build_frame(&payload);
    let timeline = frame.categories[0].timeline.as_ref().expect("timeline");
    assert!((timeline.range() - 10.0).abs() <= 1e-9);
}

#[test]
fn malformed_event_timestamps_do_not_fail_the_frame() {
    let frame = engine()
        .build_frame_from_json(
            r#"{"idling": {"score": 50, "graph": [
                {"startTime": "nope", "endTime": "2025-01-01T00:04:00Z"},
                {"startTime": "2025-01-01T00:00:00Z"}
            ]}}"#,
        )
        .expect("frame");
    let idling = frame.category(ReportCategory::Idling).expect("idling");
    let timeline = idling.timeline.as_ref().expect("timeline");

    assert_eq!(timeline.malformed_count, 2);
    assert_eq!(idling.summary.penalty, 0.0);
    assert_eq!((timeline.range_start, timeline.range_end), (0.0, 60.0));
    frame.validate().expect("frame should validate");
}

#[test]
fn wrongly_typed_graph_entry_does_not_blank_the_report() {
    let frame = engine()
        .build_frame_from_json(
            r#"{
                "idling": {"score": 70, "graph": [
                    {"startTime": "2025-01-01T00:00:00Z", "endTime": "2025-01-01T00:04:00Z"}
                ]},
                "acceleration": {"score": 90, "graph": [
                    {"time": "2025-01-01T00:01:00Z", "flag": true},
                    {"time": "2025-01-01T00:02:00Z", "flag": "yes"},
                    "not-an-entry"
                ]},
                "reaction": {"score": "n/a", "graph": ["2025-01-01T00:00:30Z", 12], "penaltyCount": -3}
            }"#,
        )
        .expect("frame");

    let idling = frame.category(ReportCategory::Idling).expect("idling");
    assert_eq!(idling.summary.penalty, 20.0);

    let acceleration = frame
        .category(ReportCategory::Acceleration)
        .expect("acceleration");
    assert_eq!(acceleration.summary.raw_score, 90.0);
    assert_eq!(acceleration.summary.statistic("total"), Some(3.0));
    assert_eq!(acceleration.summary.statistic("high"), Some(1.0));
    let timeline = acceleration.timeline.as_ref().expect("timeline");
    assert_eq!(timeline.malformed_count, 1);
    assert_eq!(timeline.points[2].label, MALFORMED_TIMESTAMP_LABEL);
    assert_eq!(timeline.points[1].label, "00:02:00");

    let reaction = frame.category(ReportCategory::Reaction).expect("reaction");
    assert_eq!(reaction.summary.raw_score, 0.0);
    assert_eq!(reaction.summary.statistic("penalty_count"), Some(2.0));
    assert_eq!(
        reaction.timeline.as_ref().map(|axis| axis.malformed_count),
        Some(1)
    );

    assert_eq!(frame.overall.statistic("count"), Some(2.0));
    frame.validate().expect("frame should validate");
}

#[test]
fn minutes_of_day_axis_is_configurable() {
    let config = ReportEngineConfig::new(Viewport::new(600, 200))
        .with_axis_unit(AxisUnit::MinutesOfDay);
    let engine = ReportEngine::new(config).expect("engine");
    let frame = engine
        .build_frame_from_json(
            r#"{"attention": {"graph": [{"time": "2025-01-01T13:45:00Z", "flag": true}]}}"#,
        )
        .expect("frame");
    let timeline = frame.categories[0].timeline.as_ref().expect("timeline");
    assert_eq!(timeline.points[0].label, "13:45");
}

#[test]
fn aggregate_averages_non_empty_frames() {
    let engine = engine();
    let good = engine
        .build_frame_from_json(r#"{"speeding": {"score": 80}}"#)
        .expect("frame");
    let poor = engine
        .build_frame_from_json(r#"{"speeding": {"score": 60}}"#)
        .expect("frame");
    let empty = engine.build_frame_from_json("{}").expect("frame");

    let (summary, gauge) = engine.aggregate(&[good, poor, empty]);
    assert!((summary.raw_score - 70.0).abs() <= 1e-12);
    assert_eq!(summary.statistic("count"), Some(2.0));
    assert!((gauge.percentage - 70.0).abs() <= 1e-12);

    let (none, none_gauge) = engine.aggregate(&[]);
    assert_eq!(none.raw_score, 0.0);
    assert_eq!(none_gauge.percentage, 0.0);
}

#[test]
fn gauge_transition_samples_arcs() {
    let arcs = engine().gauge_transition(GaugeAnimation::new(0.0, 100.0, 300.0), 3);
    let percentages: Vec<f64> = arcs.iter().map(|arc| arc.percentage).collect();
    assert_eq!(percentages, vec![0.0, 50.0, 100.0]);
}

#[test]
fn frame_json_contract_round_trip() {
    let engine = engine();
    let frame = engine.build_frame_from_json(FULL_PAYLOAD).expect("frame");

    let contract_json = engine
        .build_frame_json_contract_v1_pretty(FULL_PAYLOAD)
        .expect("contract");
    let contract: ReportFrameJsonContractV1 =
        serde_json::from_str(&contract_json).expect("contract parse");
    assert_eq!(contract.schema_version, REPORT_FRAME_JSON_SCHEMA_V1);

    let from_contract = ReportFrame::from_json_compat_str(&contract_json).expect("compat contract");
    let raw_json = frame.to_json_pretty().expect("raw json");
    let from_raw = ReportFrame::from_json_compat_str(&raw_json).expect("compat raw");
    assert_eq!(from_contract, frame);
    assert_eq!(from_raw, frame);
}

#[test]
fn frame_json_contract_rejects_unknown_schema_version() {
    let frame = engine().build_frame_from_json("{}").expect("frame");
    let mut value: serde_json::Value =
        serde_json::from_str(&frame.to_json_contract_v1_pretty().expect("contract"))
            .expect("value");
    value["schema_version"] = serde_json::json!(2);

    let err = ReportFrame::from_json_compat_str(&value.to_string()).expect_err("must fail");
    assert!(format!("{err}").contains("unsupported report frame schema version"));
}

#[test]
fn engine_config_json_round_trip_and_defaults() {
    let config = ReportEngineConfig::new(Viewport::new(480, 240))
        .with_axis_unit(AxisUnit::MinutesOfDay)
        .with_binner_tuning(TemporalBinnerTuning {
            margin: 2.0,
            ..TemporalBinnerTuning::default()
        });
    let json = config.to_json_pretty().expect("config json");
    let restored = ReportEngineConfig::from_json_str(&json).expect("config parse");
    assert_eq!(restored, config);

    let partial = ReportEngineConfig::from_json_str(r#"{"viewport": {"width": 400, "height": 100}}"#)
        .expect("partial config");
    assert_eq!(partial, ReportEngineConfig::new(Viewport::new(400, 100)));
}

#[test]
fn invalid_configuration_is_rejected() {
    let err = ReportEngine::new(ReportEngineConfig::new(Viewport::new(0, 200)))
        .expect_err("zero width must fail");
    assert!(matches!(err, ReportError::InvalidViewport { width: 0, .. }));

    let config = ReportEngineConfig::default().with_binner_tuning(TemporalBinnerTuning {
        step_candidates: Vec::new(),
        ..TemporalBinnerTuning::default()
    });
    let err = ReportEngine::new(config).expect_err("empty candidates must fail");
    assert!(matches!(err, ReportError::InvalidData(_)));
}

#[test]
fn non_json_payload_is_an_error() {
    let err = engine()
        .build_frame_from_json("definitely not json")
        .expect_err("must fail");
    assert!(matches!(err, ReportError::InvalidData(_)));
}
