use crate::{Generation, NoticeId, SegmentReport};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// The platform layer opened a session (greets the user).
    SessionOpened,
    /// User picked an upload candidate; validated before it is stored.
    FileSelected { name: String, size_bytes: u64 },
    /// User picked a named sample dataset.
    SampleSelected { name: String },
    /// User asked to run the analysis on the stored selection.
    SubmitRequested,
    /// Engine settled the start-job call.
    StartSettled {
        generation: Generation,
        outcome: Result<(), StartFailure>,
    },
    /// Engine settled one status-poll tick.
    StatusSettled {
        generation: Generation,
        reading: StatusReading,
    },
    /// Engine settled the one-shot results fetch.
    ResultsSettled {
        generation: Generation,
        outcome: Result<SegmentReport, LoadFailure>,
    },
    /// User dismissed a notice by hand.
    NoticeDismissed { id: NoticeId },
    /// A notice's auto-expiry timer fired.
    NoticeExpired { id: NoticeId },
    /// UI/render tick to coalesce rendering.
    Tick,
    /// Fallback for placeholder wiring.
    NoOp,
}

/// Why a start-job call did not lead to polling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StartFailure {
    /// Server answered with `success: false` and its own error text.
    Rejected { message: String },
    /// The call itself failed (network, timeout, bad status, bad body).
    Transport { message: String },
}

/// Classification of one settled poll tick, driving the retry tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusReading {
    Completed,
    Processing,
    /// Parseable but not actionable: `not_started` or an unknown status.
    Ambiguous,
    /// The query itself failed.
    TransportFailed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadFailure {
    pub message: String,
}
