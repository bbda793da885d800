//! Segmentation client engine: HTTP calls, timers and effect execution.
mod api;
mod engine;
mod export;
mod persist;
mod types;

pub use api::{ApiSettings, ReqwestApi, SegmentationApi};
pub use engine::{EngineConfig, EngineHandle, EngineTiming};
pub use export::{write_report_csv, ExportError, ExportOptions, ExportSummary};
pub use persist::{ensure_output_dir, AtomicFileWriter, PersistError};
pub use types::{
    ApiError, ApiErrorKind, EngineEvent, Generation, JobStatus, NoticeId, PollDelay, SegmentReport,
};
