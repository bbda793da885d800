use segcli_core::{AnalysisPhase, AppViewModel, Severity};

const PROGRESS_BAR_WIDTH: usize = 40;

/// Renders the view model to terminal lines. Pure so it can be tested
/// without a terminal attached.
pub fn render(view: &AppViewModel) -> Vec<String> {
    let mut lines = Vec::new();

    let mut status = format!("Status: {}", phase_label(view.phase));
    if let Some(selection) = &view.selection {
        status.push_str(&format!(" | Source: {selection}"));
    }
    if view.phase == AnalysisPhase::Polling {
        status.push_str(&format!(" | check {}/{}", view.attempts, view.max_attempts));
    }
    lines.push(status);

    if matches!(view.phase, AnalysisPhase::Polling | AnalysisPhase::Completed) {
        lines.push(progress_line(view));
    }

    for notice in &view.notices {
        lines.push(format!("[{}] {}", severity_tag(notice.severity), notice.text));
    }

    if let Some(report) = &view.report {
        lines.push(format!("Total customers: {}", report.total_customers));
        lines.push(format!("Segments: {}", report.segment_count));
        lines.push("segment | customers | share".to_string());
        for row in &report.rows {
            lines.push(format!("{} | {} | {}", row.label, row.customers, row.share));
            if let Some(campaign) = row.campaign {
                lines.push(format!("  campaign: {campaign}"));
            }
        }
    }

    lines
}

fn phase_label(phase: AnalysisPhase) -> &'static str {
    match phase {
        AnalysisPhase::Idle => "Idle",
        AnalysisPhase::Starting => "Starting",
        AnalysisPhase::Polling => "Analyzing",
        AnalysisPhase::Completed => "Completed",
        AnalysisPhase::TimedOut => "Timed out",
        AnalysisPhase::Failed => "Failed",
    }
}

fn progress_line(view: &AppViewModel) -> String {
    let percent = usize::from(view.progress.percent);
    let filled = (PROGRESS_BAR_WIDTH * percent) / 100;
    let mut bar = "#".repeat(filled);
    bar.push_str(&"-".repeat(PROGRESS_BAR_WIDTH - filled));
    // Estimated values are marked so they are never read as server truth.
    let marker = if view.progress.estimated { "~" } else { "" };
    format!("[{bar}] {marker}{percent}% {}", view.caption)
}

fn severity_tag(severity: Severity) -> &'static str {
    match severity {
        Severity::Info => "info",
        Severity::Success => "ok",
        Severity::Warning => "warn",
        Severity::Error => "error",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use segcli_core::{update, AppState, Msg, SegmentReport, StatusReading};

    fn polling_state() -> (AppState, u64) {
        let state = AppState::new();
        let (state, _) = update(
            state,
            Msg::SampleSelected {
                name: "ecommerce".to_string(),
            },
        );
        let (state, _) = update(state, Msg::SubmitRequested);
        let generation = state.generation();
        let (state, _) = update(
            state,
            Msg::StartSettled {
                generation,
                outcome: Ok(()),
            },
        );
        (state, generation)
    }

    #[test]
    fn polling_view_shows_estimated_progress_and_attempts() {
        let (state, generation) = polling_state();
        let (state, _) = update(
            state,
            Msg::StatusSettled {
                generation,
                reading: StatusReading::Processing,
            },
        );

        let lines = render(&state.view());
        assert!(lines[0].contains("Status: Analyzing"));
        assert!(lines[0].contains("check 1/60"));
        assert!(lines[1].contains("~32%"));
    }

    #[test]
    fn completed_view_renders_the_table() {
        let (state, generation) = polling_state();
        let (state, _) = update(
            state,
            Msg::StatusSettled {
                generation,
                reading: StatusReading::Completed,
            },
        );
        let mut report = SegmentReport {
            total_customers: 200,
            n_clusters: 2,
            ..SegmentReport::default()
        };
        report.cluster_sizes.insert("loyal".to_string(), 50);
        report.cluster_sizes.insert("regular".to_string(), 150);
        let (state, _) = update(
            state,
            Msg::ResultsSettled {
                generation,
                outcome: Ok(report),
            },
        );

        let lines = render(&state.view());
        assert!(lines.iter().any(|l| l == "Total customers: 200"));
        assert!(lines.iter().any(|l| l == "Segments: 2"));
        assert!(lines.iter().any(|l| l == "loyal | 50 | 25.0%"));
        assert!(lines.iter().any(|l| l == "regular | 150 | 75.0%"));
        // The exact terminal value is not marked as an estimate.
        assert!(lines.iter().any(|l| l.contains(" 100% ")));
        assert!(!lines.iter().any(|l| l.contains("~100%")));
    }
}
