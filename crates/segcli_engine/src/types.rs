use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Submission counter stamped on every command and event so the state
/// machine can discard events from a superseded loop.
pub type Generation = u64;

pub type NoticeId = u64;

/// Job status reported by the progress endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    NotStarted,
    Processing,
    Completed,
    /// Catch-all for status strings this client does not know.
    #[serde(other)]
    Unrecognized,
}

/// Fixed retry tiers for the poll loop; `EngineTiming` maps each to its
/// configured duration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollDelay {
    Processing,
    Ambiguous,
    TransportError,
}

/// Terminal result payload of a segmentation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SegmentReport {
    pub total_customers: u64,
    pub n_clusters: u32,
    #[serde(default)]
    pub cluster_sizes: BTreeMap<String, u64>,
}

/// `POST /run_segmentation` response body.
#[derive(Debug, Deserialize)]
pub(crate) struct StartResponse {
    pub success: bool,
    #[serde(default)]
    pub error: Option<String>,
}

/// `GET /api/analysis-progress` response body.
#[derive(Debug, Deserialize)]
pub(crate) struct ProgressResponse {
    pub status: JobStatus,
}

/// `GET /api/results` response body.
#[derive(Debug, Deserialize)]
pub(crate) struct ResultsResponse {
    pub success: bool,
    #[serde(default)]
    pub results: Option<SegmentReport>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    pub kind: ApiErrorKind,
    pub message: String,
}

impl ApiError {
    pub(crate) fn new(kind: ApiErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

impl std::error::Error for ApiError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorKind {
    Network,
    Timeout,
    HttpStatus(u16),
    /// Response body could not be decoded.
    Malformed,
    /// Server answered but declined the request (`success: false`).
    Rejected,
}

impl fmt::Display for ApiErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiErrorKind::Network => write!(f, "network error"),
            ApiErrorKind::Timeout => write!(f, "timeout"),
            ApiErrorKind::HttpStatus(code) => write!(f, "http status {code}"),
            ApiErrorKind::Malformed => write!(f, "malformed response"),
            ApiErrorKind::Rejected => write!(f, "rejected"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    StartSettled {
        generation: Generation,
        result: Result<(), ApiError>,
    },
    StatusSettled {
        generation: Generation,
        result: Result<JobStatus, ApiError>,
    },
    ResultsSettled {
        generation: Generation,
        result: Result<SegmentReport, ApiError>,
    },
    NoticeExpired {
        id: NoticeId,
    },
}
