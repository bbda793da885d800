//! Segmentation client core: pure state machine and view-model helpers.
mod campaign;
mod effect;
mod msg;
mod state;
mod update;
mod upload;
mod view_model;

pub use campaign::campaign_for;
pub use effect::{Effect, PollDelay};
pub use msg::{LoadFailure, Msg, StartFailure, StatusReading};
pub use state::{
    AnalysisPhase, AppState, DataSource, Generation, JobRequest, Notice, NoticeId, SegmentReport,
    Severity, MAX_POLL_ATTEMPTS,
};
pub use update::{estimated_progress, update};
pub use upload::{validate_upload, UploadError, ALLOWED_UPLOAD_EXTENSIONS, MAX_UPLOAD_BYTES};
pub use view_model::{
    format_count, progress_caption, AppViewModel, NoticeView, ProgressView, ReportView,
    SegmentRowView,
};
