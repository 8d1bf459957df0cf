use criterion::{Criterion, criterion_group, criterion_main};
use drive_report::core::{
    AxisUnit, GaugeArcGeometry, LabelCollisionTuning, LinearScale, ReactionCurveTuning,
    TemporalBinner, Viewport, label_visibility, synthesize_reaction_curve,
};
use drive_report::{ReportEngine, ReportEngineConfig};
use std::hint::black_box;

const T0: f64 = 1_735_689_600.0;

fn bench_linear_scale_clamped(c: &mut Criterion) {
    let viewport = Viewport::new(1920, 1080);
    let scale = LinearScale::new(T0, T0 + 3_600.0).expect("valid scale");

    c.bench_function("linear_scale_clamped", |b| {
        b.iter(|| {
            let _ = scale
                .domain_to_pixel_clamped(black_box(T0 + 1_234.5), viewport)
                .expect("to pixel");
        })
    });
}

fn bench_temporal_binning_10k(c: &mut Criterion) {
    let binner = TemporalBinner::new(AxisUnit::Seconds, Viewport::new(1920, 400)).expect("binner");
    let values: Vec<Option<f64>> = (0..10_000)
        .map(|i| {
            if i % 97 == 0 {
                None
            } else {
                Some(T0 + f64::from(i) * 0.75)
            }
        })
        .collect();

    c.bench_function("temporal_binning_10k", |b| {
        b.iter(|| {
            let _ = binner.bin_values(black_box(&values), black_box(None));
        })
    });
}

fn bench_label_visibility_10k(c: &mut Criterion) {
    let positions: Vec<f64> = (0..10_000).map(|i| f64::from((i * 7_919) % 10_000)).collect();
    let tuning = LabelCollisionTuning::default();

    c.bench_function("label_visibility_10k", |b| {
        b.iter(|| {
            let _ = label_visibility(black_box(&positions), black_box(10_000.0), tuning);
        })
    });
}

fn bench_reaction_curve_200_events(c: &mut Criterion) {
    let events: Vec<f64> = (0..200).map(|i| f64::from(i) * 9.0).collect();
    let tuning = ReactionCurveTuning::default();

    c.bench_function("reaction_curve_200_events", |b| {
        b.iter(|| {
            let _ = synthesize_reaction_curve(
                black_box(&events),
                black_box(3),
                black_box((0.0, 1_800.0)),
                tuning,
            );
        })
    });
}

fn bench_gauge_arc(c: &mut Criterion) {
    let gauge = GaugeArcGeometry::default();

    c.bench_function("gauge_arc_sweep_101", |b| {
        b.iter(|| {
            for percentage in 0..=100 {
                let _ = gauge.arc_for_percentage(black_box(f64::from(percentage)));
            }
        })
    });
}

fn bench_report_frame_json_1k(c: &mut Criterion) {
    let engine = ReportEngine::new(ReportEngineConfig::default()).expect("engine init");
    let acceleration: Vec<serde_json::Value> = (0..1_000)
        .map(|i| {
            serde_json::json!({
                "time": format!("2025-01-01T{:02}:{:02}:{:02}Z", i / 3600, (i / 60) % 60, i % 60),
                "flag": i % 5 == 0,
            })
        })
        .collect();
    let payload = serde_json::json!({
        "driveId": 1,
        "acceleration": {"score": 82, "graph": acceleration},
        "speeding": {"score": 64},
        "reaction": {"score": 71, "graph": ["2025-01-01T00:03:00Z", "2025-01-01T00:09:30Z"]},
    })
    .to_string();

    c.bench_function("report_frame_json_1k", |b| {
        b.iter(|| {
            let _ = engine
                .build_frame_json_contract_v1_pretty(black_box(&payload))
                .expect("frame json should succeed");
        })
    });
}

criterion_group!(
    benches,
    bench_linear_scale_clamped,
    bench_temporal_binning_10k,
    bench_label_visibility_10k,
    bench_reaction_curve_200_events,
    bench_gauge_arc,
    bench_report_frame_json_1k
);
criterion_main!(benches);
