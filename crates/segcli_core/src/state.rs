use std::collections::BTreeMap;

use crate::msg::StatusReading;
use crate::view_model::AppViewModel;

/// Submission counter used to correlate engine events with the loop that
/// requested them. Events stamped with an older generation are stale and
/// must be ignored.
pub type Generation = u64;

/// Identifier of a transient notice; never reused within a session.
pub type NoticeId = u64;

/// Upper bound on status-poll ticks per submission.
pub const MAX_POLL_ATTEMPTS: u32 = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AnalysisPhase {
    #[default]
    Idle,
    /// Job submitted, start call not yet acknowledged.
    Starting,
    Polling,
    Completed,
    TimedOut,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub id: NoticeId,
    pub text: String,
    pub severity: Severity,
}

/// The user's chosen input for the next segmentation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    Upload { filename: String, size_bytes: u64 },
    Sample { name: String },
}

impl DataSource {
    pub fn label(&self) -> String {
        match self {
            DataSource::Upload { filename, .. } => format!("upload: {filename}"),
            DataSource::Sample { name } => format!("sample: {name}"),
        }
    }

    fn form_fields(&self) -> Vec<(String, String)> {
        match self {
            DataSource::Upload { filename, .. } => vec![
                ("data_source".to_string(), "upload".to_string()),
                ("filename".to_string(), filename.clone()),
            ],
            DataSource::Sample { name } => vec![
                ("data_source".to_string(), "sample".to_string()),
                ("dataset".to_string(), name.clone()),
            ],
        }
    }
}

/// Form-encoded payload for the start-job call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobRequest {
    fields: Vec<(String, String)>,
}

impl JobRequest {
    pub fn from_source(source: &DataSource) -> Self {
        Self {
            fields: source.form_fields(),
        }
    }

    pub fn fields(&self) -> &[(String, String)] {
        &self.fields
    }
}

/// Terminal result payload of a segmentation run.
///
/// `cluster_sizes` is a BTreeMap so table rows and exports come out in a
/// deterministic order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SegmentReport {
    pub total_customers: u64,
    pub n_clusters: u32,
    pub cluster_sizes: BTreeMap<String, u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppState {
    phase: AnalysisPhase,
    generation: Generation,
    attempts: u32,
    progress_percent: u8,
    last_reading: Option<StatusReading>,
    selection: Option<DataSource>,
    notices: Vec<Notice>,
    next_notice_id: NoticeId,
    report: Option<SegmentReport>,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> AppViewModel {
        crate::view_model::build_view(self)
    }

    /// Returns whether a render is pending and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn phase(&self) -> AnalysisPhase {
        self.phase
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn progress_percent(&self) -> u8 {
        self.progress_percent
    }

    pub fn last_reading(&self) -> Option<StatusReading> {
        self.last_reading
    }

    pub fn selection(&self) -> Option<&DataSource> {
        self.selection.as_ref()
    }

    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    pub fn report(&self) -> Option<&SegmentReport> {
        self.report.as_ref()
    }

    pub(crate) fn set_phase(&mut self, phase: AnalysisPhase) {
        self.phase = phase;
        self.dirty = true;
    }

    pub(crate) fn set_selection(&mut self, selection: Option<DataSource>) {
        self.selection = selection;
        self.dirty = true;
    }

    /// Starts a fresh submission: bumps the generation and resets all
    /// per-loop progress state. The previous loop's events become stale.
    pub(crate) fn begin_submission(&mut self) -> Generation {
        self.generation += 1;
        self.attempts = 0;
        self.progress_percent = 0;
        self.last_reading = None;
        self.report = None;
        self.phase = AnalysisPhase::Starting;
        self.dirty = true;
        self.generation
    }

    pub(crate) fn record_tick(&mut self, reading: StatusReading) -> u32 {
        self.attempts += 1;
        self.last_reading = Some(reading);
        self.dirty = true;
        self.attempts
    }

    pub(crate) fn set_progress(&mut self, percent: u8) {
        // Displayed progress never moves backwards within one loop.
        if percent > self.progress_percent {
            self.progress_percent = percent;
            self.dirty = true;
        }
    }

    pub(crate) fn set_report(&mut self, report: SegmentReport) {
        self.report = Some(report);
        self.dirty = true;
    }

    pub(crate) fn push_notice(&mut self, text: String, severity: Severity) -> NoticeId {
        self.next_notice_id += 1;
        let id = self.next_notice_id;
        self.notices.push(Notice { id, text, severity });
        self.dirty = true;
        id
    }

    /// Removes a notice by id. Safe to call for an id that was already
    /// removed: expiry after manual dismissal is a no-op.
    pub(crate) fn remove_notice(&mut self, id: NoticeId) -> bool {
        let before = self.notices.len();
        self.notices.retain(|notice| notice.id != id);
        let removed = self.notices.len() != before;
        if removed {
            self.dirty = true;
        }
        removed
    }
}
