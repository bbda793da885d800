use client_logging::{client_info, client_warn};
use segcli_core::{Effect, LoadFailure, Msg, SegmentReport, StartFailure, StatusReading};
use segcli_engine::{ApiError, ApiErrorKind, EngineEvent, EngineHandle, JobStatus};

/// Executes core effects against the engine and translates engine events
/// back into core messages.
pub struct EffectRunner {
    engine: EngineHandle,
}

impl EffectRunner {
    pub fn new(engine: EngineHandle) -> Self {
        Self { engine }
    }

    pub fn run(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::StartJob {
                    generation,
                    request,
                } => {
                    client_info!("StartJob generation={}", generation);
                    self.engine
                        .start_job(generation, request.fields().to_vec());
                }
                Effect::CancelPolling => {
                    client_info!("CancelPolling");
                    self.engine.cancel_polling();
                }
                Effect::SchedulePoll { generation, delay } => {
                    self.engine.schedule_poll(generation, map_delay(delay));
                }
                Effect::FetchResults { generation } => {
                    client_info!("FetchResults generation={}", generation);
                    self.engine.fetch_results(generation);
                }
                Effect::ScheduleNoticeExpiry { id } => {
                    self.engine.schedule_notice_expiry(id);
                }
            }
        }
    }

    pub fn try_recv_msg(&self) -> Option<Msg> {
        self.engine.try_recv().map(map_event)
    }
}

fn map_delay(delay: segcli_core::PollDelay) -> segcli_engine::PollDelay {
    match delay {
        segcli_core::PollDelay::Processing => segcli_engine::PollDelay::Processing,
        segcli_core::PollDelay::Ambiguous => segcli_engine::PollDelay::Ambiguous,
        segcli_core::PollDelay::TransportError => segcli_engine::PollDelay::TransportError,
    }
}

fn map_event(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::StartSettled { generation, result } => Msg::StartSettled {
            generation,
            outcome: result.map_err(map_start_failure),
        },
        EngineEvent::StatusSettled { generation, result } => Msg::StatusSettled {
            generation,
            reading: map_reading(result),
        },
        EngineEvent::ResultsSettled { generation, result } => Msg::ResultsSettled {
            generation,
            outcome: result.map(core_report).map_err(|err| LoadFailure {
                message: err.to_string(),
            }),
        },
        EngineEvent::NoticeExpired { id } => Msg::NoticeExpired { id },
    }
}

fn map_start_failure(err: ApiError) -> StartFailure {
    match err.kind {
        ApiErrorKind::Rejected => StartFailure::Rejected {
            message: err.message,
        },
        _ => StartFailure::Transport {
            message: err.to_string(),
        },
    }
}

fn map_reading(result: Result<JobStatus, ApiError>) -> StatusReading {
    match result {
        Ok(JobStatus::Completed) => StatusReading::Completed,
        Ok(JobStatus::Processing) => StatusReading::Processing,
        Ok(JobStatus::NotStarted) | Ok(JobStatus::Unrecognized) => StatusReading::Ambiguous,
        Err(err) => {
            client_warn!("status query failed: {}", err);
            StatusReading::TransportFailed
        }
    }
}

fn core_report(report: segcli_engine::SegmentReport) -> SegmentReport {
    SegmentReport {
        total_customers: report.total_customers,
        n_clusters: report.n_clusters,
        cluster_sizes: report.cluster_sizes,
    }
}

/// Inverse of `core_report`, for handing a rendered report back to the
/// engine's CSV exporter.
pub fn wire_report(report: &SegmentReport) -> segcli_engine::SegmentReport {
    segcli_engine::SegmentReport {
        total_customers: report.total_customers,
        n_clusters: report.n_clusters,
        cluster_sizes: report.cluster_sizes.clone(),
    }
}
