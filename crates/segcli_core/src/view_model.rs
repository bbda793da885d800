use crate::campaign::campaign_for;
use crate::state::AppState;
use crate::{AnalysisPhase, NoticeId, SegmentReport, Severity, MAX_POLL_ATTEMPTS};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppViewModel {
    pub phase: AnalysisPhase,
    pub progress: ProgressView,
    pub caption: &'static str,
    pub attempts: u32,
    pub max_attempts: u32,
    pub selection: Option<String>,
    pub notices: Vec<NoticeView>,
    pub report: Option<ReportView>,
    pub dirty: bool,
}

/// Displayed progress. `estimated` is false only for the exact terminal
/// 100; every other value is synthesized from the attempt count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressView {
    pub percent: u8,
    pub estimated: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoticeView {
    pub id: NoticeId,
    pub text: String,
    pub severity: Severity,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportView {
    /// Thousands-separated customer total.
    pub total_customers: String,
    pub segment_count: u32,
    pub rows: Vec<SegmentRowView>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmentRowView {
    pub label: String,
    pub customers: String,
    /// Share of all customers, one decimal ("25.0%"), or "N/A" when the
    /// total is zero.
    pub share: String,
    pub campaign: Option<&'static str>,
}

/// Stage caption for a given displayed progress value.
pub fn progress_caption(percent: u8) -> &'static str {
    if percent >= 100 {
        "Analysis complete!"
    } else if percent < 30 {
        "Loading and cleaning data..."
    } else if percent < 60 {
        "Calculating RFM metrics..."
    } else if percent < 90 {
        "Running clustering analysis..."
    } else {
        "Generating visualizations..."
    }
}

/// Formats a count with thousands separators ("1,234,567").
pub fn format_count(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i != 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

pub(crate) fn build_view(state: &AppState) -> AppViewModel {
    let percent = state.progress_percent();
    AppViewModel {
        phase: state.phase(),
        progress: ProgressView {
            percent,
            estimated: state.phase() != AnalysisPhase::Completed,
        },
        caption: progress_caption(percent),
        attempts: state.attempts(),
        max_attempts: MAX_POLL_ATTEMPTS,
        selection: state.selection().map(|source| source.label()),
        notices: state
            .notices()
            .iter()
            .map(|notice| NoticeView {
                id: notice.id,
                text: notice.text.clone(),
                severity: notice.severity,
            })
            .collect(),
        report: state.report().map(report_view),
        dirty: state.is_dirty(),
    }
}

fn report_view(report: &SegmentReport) -> ReportView {
    let rows = report
        .cluster_sizes
        .iter()
        .map(|(label, &count)| SegmentRowView {
            label: label.clone(),
            customers: format_count(count),
            share: share_label(count, report.total_customers),
            campaign: campaign_for(label),
        })
        .collect();
    ReportView {
        total_customers: format_count(report.total_customers),
        segment_count: report.n_clusters,
        rows,
    }
}

fn share_label(count: u64, total: u64) -> String {
    // A zero or absent total must not surface NaN or infinity.
    if total == 0 {
        return "N/A".to_string();
    }
    format!("{:.1}%", count as f64 * 100.0 / total as f64)
}
