use crate::{Generation, JobRequest, NoticeId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Cancel whatever poll loop is still in flight before starting over.
    CancelPolling,
    StartJob {
        generation: Generation,
        request: JobRequest,
    },
    /// Query job status after the tier's fixed delay.
    SchedulePoll {
        generation: Generation,
        delay: PollDelay,
    },
    /// Fetch the terminal result payload after the completion grace delay.
    FetchResults { generation: Generation },
    ScheduleNoticeExpiry { id: NoticeId },
}

/// Fixed retry tiers; the engine maps each to its configured duration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollDelay {
    /// Server reported `processing`.
    Processing,
    /// Ambiguous reading (`not_started`, unrecognized status).
    Ambiguous,
    /// The status query itself failed.
    TransportError,
}
