use tracing::{debug, warn};

use crate::core::{
    ArcSpec, BinnedAxis, GaugeAnimation, ReactionCurve, ReportCategory, ScoreSummary,
    build_reaction_curve, compute_idling_penalty_with_rule, summarize_acceleration,
    summarize_drive_scores, summarize_flagged_events, summarize_idling, summarize_reaction,
    summarize_speeding,
};
use crate::error::ReportResult;
use crate::render::{CategoryReport, ChartSlice, Color, ReportFrame};

use super::{
    DriveWindow, FlaggedSection, IdlingSection, ReactionSection, ReportEngine, ReportPayload,
    SpeedingSection,
};

impl ReportEngine {
    /// Builds the full frame for one payload.
    ///
    /// Categories appear in a fixed order (idling, acceleration, speeding,
    /// reaction, attention) and only when present in the payload.
    #[must_use]
    pub fn build_frame(&self, payload: &ReportPayload) -> ReportFrame {
        let window = payload
            .window
            .as_ref()
            .and_then(|window| self.resolve_window(window));

        let mut categories = Vec::with_capacity(5);
        if let Some(section) = &payload.idling {
            categories.push(self.idling_report(section, window));
        }
        if let Some(section) = &payload.acceleration {
            categories.push(self.acceleration_report(section, window));
        }
        if let Some(section) = &payload.speeding {
            categories.push(self.speeding_report(section));
        }
        let mut reaction_curve = None;
        if let Some(section) = &payload.reaction {
            let report = self.reaction_report(section, window);
            reaction_curve = report
                .timeline
                .as_ref()
                .map(|timeline| self.reaction_curve(section, timeline));
            categories.push(report);
        }
        if let Some(section) = &payload.attention {
            categories.push(self.attention_report(section, window));
        }

        let scored: Vec<f64> = categories
            .iter()
            .zip(category_scores(payload))
            .filter_map(|(report, has_score)| has_score.then_some(report.summary.raw_score))
            .collect();
        let overall = summarize_drive_scores(&scored);
        let overall_gauge = self.gauge_arc(overall.raw_score);

        let drive_id = payload.drive_id.as_ref().map(ToString::to_string);
        debug!(
            drive_id = drive_id.as_deref().unwrap_or("-"),
            categories = categories.len(),
            overall_score = overall.raw_score,
            "built report frame"
        );

        ReportFrame {
            drive_id,
            viewport: self.config().viewport,
            categories,
            overall,
            overall_gauge,
            reaction_curve,
        }
    }

    /// Parses a raw JSON payload and builds its frame.
    pub fn build_frame_from_json(&self, input: &str) -> ReportResult<ReportFrame> {
        let payload = ReportPayload::from_json_str(input)?;
        Ok(self.build_frame(&payload))
    }

    /// Aggregate report over several drives' frames.
    #[must_use]
    pub fn aggregate(&self, frames: &[ReportFrame]) -> (ScoreSummary, ArcSpec) {
        let scores: Vec<f64> = frames
            .iter()
            .filter(|frame| !frame.is_empty())
            .map(|frame| frame.overall.raw_score)
            .collect();
        let summary = summarize_drive_scores(&scores);
        let gauge = self.gauge_arc(summary.raw_score);
        (summary, gauge)
    }

    #[must_use]
    pub fn gauge_arc(&self, score: f64) -> ArcSpec {
        self.gauge().arc_for_percentage(score)
    }

    /// Arcs for each frame of a gauge transition, first at `from`, last at `to`.
    #[must_use]
    pub fn gauge_transition(&self, animation: GaugeAnimation, frame_count: usize) -> Vec<ArcSpec> {
        animation
            .sample_frames(frame_count)
            .into_iter()
            .map(|percentage| self.gauge_arc(percentage))
            .collect()
    }

    #[must_use]
    pub fn idling_report(
        &self,
        section: &IdlingSection,
        window: Option<(f64, f64)>,
    ) -> CategoryReport {
        let events = section.events();
        let rule = self.config().idling_rule;
        let summary = summarize_idling(section.score, &events, rule);
        let penalty = compute_idling_penalty_with_rule(&events, rule);
        let timeline = self.binner().bin_durations(&events, window);

        let slices = timeline
            .intervals
            .iter()
            .zip(&penalty.per_event_penalty)
            .map(|(span, event_penalty)| {
                let color = if *event_penalty > 0.0 {
                    Color::SCORE_POOR
                } else {
                    Color::SCORE_GOOD
                };
                ChartSlice::new(span.duration_seconds, span.label.clone(), color)
            })
            .collect();

        self.category_report(
            ReportCategory::Idling,
            summary,
            section.feedback.clone(),
            slices,
            Some(timeline),
        )
    }

    #[must_use]
    pub fn acceleration_report(
        &self,
        section: &FlaggedSection,
        window: Option<(f64, f64)>,
    ) -> CategoryReport {
        let events = section.events();
        let summary = summarize_acceleration(section.score, &events);
        let high = summary.statistic("high").unwrap_or(0.0);
        let normal = summary.statistic("normal").unwrap_or(0.0);
        let slices = vec![
            ChartSlice::new(high, "Rapid", Color::SCORE_POOR),
            ChartSlice::new(normal, "Normal", Color::SCORE_GOOD),
        ];
        let timeline = self.binner().bin_events(&events, window);

        self.category_report(
            ReportCategory::Acceleration,
            summary,
            section.feedback.clone(),
            slices,
            Some(timeline),
        )
    }

    #[must_use]
    pub fn speeding_report(&self, section: &SpeedingSection) -> CategoryReport {
        let summary = summarize_speeding(section.score);
        let violations = summary.statistic("violations").unwrap_or(0.0);
        let slices = vec![ChartSlice::new(
            violations,
            "Violations",
            Color::for_score(summary.raw_score),
        )];

        self.category_report(
            ReportCategory::Speeding,
            summary,
            section.feedback.clone(),
            slices,
            None,
        )
    }

    #[must_use]
    pub fn reaction_report(
        &self,
        section: &ReactionSection,
        window: Option<(f64, f64)>,
    ) -> CategoryReport {
        let timestamps = section.timestamps();
        let timeline = self.binner().bin_timestamps(&timestamps, window);
        let penalty_count = section.resolved_penalty_count();
        let summary = summarize_reaction(section.score, timestamps.len(), penalty_count);

        let color = if penalty_count > 0 {
            Color::SCORE_POOR
        } else {
            Color::SCORE_GOOD
        };
        let slices = vec![ChartSlice::new(
            penalty_count as f64,
            "Late reactions",
            color,
        )];

        self.category_report(
            ReportCategory::Reaction,
            summary,
            section.feedback.clone(),
            slices,
            Some(timeline),
        )
    }

    #[must_use]
    pub fn attention_report(
        &self,
        section: &FlaggedSection,
        window: Option<(f64, f64)>,
    ) -> CategoryReport {
        let events = section.events();
        let summary = summarize_flagged_events(section.score, &events);
        let flagged = summary.statistic("flagged").unwrap_or(0.0);
        let total = summary.statistic("event_count").unwrap_or(0.0);
        let slices = vec![
            ChartSlice::new(flagged, "Distracted", Color::SCORE_POOR),
            ChartSlice::new((total - flagged).max(0.0), "Attentive", Color::SCORE_GOOD),
        ];
        let timeline = self.binner().bin_events(&events, window);

        self.category_report(
            ReportCategory::Attention,
            summary,
            section.feedback.clone(),
            slices,
            Some(timeline),
        )
    }

    /// Reaction quality curve over the reaction timeline's range.
    #[must_use]
    pub fn reaction_curve(
        &self,
        section: &ReactionSection,
        timeline: &BinnedAxis,
    ) -> ReactionCurve {
        let unit = self.binner().unit();
        let event_times: Vec<f64> = section
            .timestamps()
            .iter()
            .filter_map(|timestamp| unit.parse(timestamp).ok())
            .collect();
        build_reaction_curve(
            &event_times,
            section.resolved_penalty_count(),
            (timeline.range_start, timeline.range_end),
            self.config().viewport,
            self.config().reaction_curve,
        )
    }

    fn category_report(
        &self,
        category: ReportCategory,
        summary: ScoreSummary,
        feedback: Option<String>,
        slices: Vec<ChartSlice>,
        timeline: Option<BinnedAxis>,
    ) -> CategoryReport {
        let gauge = self.gauge_arc(summary.raw_score);
        CategoryReport {
            category,
            summary,
            feedback,
            gauge,
            slices,
            timeline,
        }
    }

    fn resolve_window(&self, window: &DriveWindow) -> Option<(f64, f64)> {
        let unit = self.binner().unit();
        let start = unit.parse(window.start_time.as_deref()?);
        let end = unit.parse(window.end_time.as_deref()?);
        match (start, end) {
            (Ok(start), Ok(end)) => Some((start, end)),
            (Err(err), _) | (_, Err(err)) => {
                warn!(error = %err, "ignoring drive window with malformed bound");
                None
            }
        }
    }
}

/// Whether each present category carried a payload score, in frame order.
fn category_scores(payload: &ReportPayload) -> Vec<bool> {
    let mut present = Vec::with_capacity(5);
    if let Some(section) = &payload.idling {
        present.push(section.score.is_some());
    }
    if let Some(section) = &payload.acceleration {
        present.push(section.score.is_some());
    }
    if let Some(section) = &payload.speeding {
        present.push(section.score.is_some());
    }
    if let Some(section) = &payload.reaction {
        present.push(section.score.is_some());
    }
    if let Some(section) = &payload.attention {
        present.push(section.score.is_some());
    }
    present
}
