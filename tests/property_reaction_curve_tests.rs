use drive_report::core::{
    ReactionCurveTuning, Viewport, build_reaction_curve, synthesize_reaction_curve,
};
use proptest::prelude::*;

proptest! {
    #[test]
    fn reaction_curve_values_stay_in_unit_interval_property(
        events in prop::collection::vec(-10.0f64..110.0, 0..20),
        penalty_count in 0usize..5,
        start in -100.0f64..100.0,
        span in 0.01f64..1_000.0
    ) {
        let tuning = ReactionCurveTuning::default();
        let samples = synthesize_reaction_curve(&events, penalty_count, (start, start + span), tuning);
        prop_assert_eq!(samples.len(), tuning.sample_count);
        for sample in &samples {
            prop_assert!((0.0..=1.0).contains(&sample.value));
        }
    }

    #[test]
    fn curve_vertices_stay_inside_viewport_property(
        events in prop::collection::vec(-10.0f64..110.0, 0..20),
        penalty_count in 0usize..5,
        width in 1u32..2_000,
        height in 1u32..1_000
    ) {
        let curve = build_reaction_curve(
            &events,
            penalty_count,
            (0.0, 100.0),
            Viewport::new(width, height),
            ReactionCurveTuning::default(),
        );
        prop_assert_eq!(curve.vertices.len(), curve.samples.len());
        for vertex in &curve.vertices {
            prop_assert!((0.0..=f64::from(width)).contains(&vertex.x));
            prop_assert!((0.0..=f64::from(height)).contains(&vertex.y));
        }
    }
}
