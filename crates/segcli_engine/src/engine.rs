use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use client_logging::client_warn;
use tokio_util::sync::CancellationToken;

use crate::api::{ApiSettings, ReqwestApi, SegmentationApi};
use crate::{ApiError, EngineEvent, Generation, NoticeId, PollDelay};

/// Fixed delays for the poll loop and the notice timers. Deliberately a
/// tiered-constant policy, not exponential backoff.
#[derive(Debug, Clone)]
pub struct EngineTiming {
    /// Delay before the next tick after a `processing` reading.
    pub processing_delay: Duration,
    /// Delay after an ambiguous reading (`not_started`, unknown status).
    pub ambiguous_delay: Duration,
    /// Delay after a failed status query.
    pub transport_delay: Duration,
    /// Grace period between completion and the results fetch.
    pub results_grace: Duration,
    /// Lifetime of a transient notice.
    pub notice_ttl: Duration,
}

impl Default for EngineTiming {
    fn default() -> Self {
        Self {
            processing_delay: Duration::from_secs(2),
            ambiguous_delay: Duration::from_secs(3),
            transport_delay: Duration::from_secs(5),
            results_grace: Duration::from_secs(1),
            notice_ttl: Duration::from_secs(4),
        }
    }
}

impl EngineTiming {
    fn poll_delay(&self, delay: PollDelay) -> Duration {
        match delay {
            PollDelay::Processing => self.processing_delay,
            PollDelay::Ambiguous => self.ambiguous_delay,
            PollDelay::TransportError => self.transport_delay,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct EngineConfig {
    pub api: ApiSettings,
    pub timing: EngineTiming,
}

enum EngineCommand {
    StartJob {
        generation: Generation,
        fields: Vec<(String, String)>,
    },
    SchedulePoll {
        generation: Generation,
        delay: PollDelay,
    },
    FetchResults {
        generation: Generation,
    },
    CancelPolling,
    ScheduleNoticeExpiry {
        id: NoticeId,
    },
}

/// Handle to the background effect executor: a command channel into a
/// dedicated thread that owns a tokio runtime, and an event channel back.
///
/// One cancellation token is live at a time; `StartJob` rotates it, so the
/// pending sleeps and queries of a superseded loop die instead of firing.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_rx: mpsc::Receiver<EngineEvent>,
}

impl EngineHandle {
    pub fn new(config: EngineConfig) -> Result<Self, ApiError> {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        let api = Arc::new(ReqwestApi::new(config.api)?);
        let timing = config.timing;

        thread::spawn(move || {
            let runtime = tokio::runtime::Runtime::new().expect("tokio runtime");
            let mut active = CancellationToken::new();
            while let Ok(command) = cmd_rx.recv() {
                dispatch(&runtime, &api, &timing, &mut active, command, &event_tx);
            }
            // Command sender dropped: the session is over, kill what's left.
            active.cancel();
        });

        Ok(Self { cmd_tx, event_rx })
    }

    pub fn start_job(&self, generation: Generation, fields: Vec<(String, String)>) {
        let _ = self.cmd_tx.send(EngineCommand::StartJob { generation, fields });
    }

    pub fn schedule_poll(&self, generation: Generation, delay: PollDelay) {
        let _ = self
            .cmd_tx
            .send(EngineCommand::SchedulePoll { generation, delay });
    }

    pub fn fetch_results(&self, generation: Generation) {
        let _ = self.cmd_tx.send(EngineCommand::FetchResults { generation });
    }

    pub fn cancel_polling(&self) {
        let _ = self.cmd_tx.send(EngineCommand::CancelPolling);
    }

    pub fn schedule_notice_expiry(&self, id: NoticeId) {
        let _ = self.cmd_tx.send(EngineCommand::ScheduleNoticeExpiry { id });
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx.try_recv().ok()
    }
}

fn dispatch(
    runtime: &tokio::runtime::Runtime,
    api: &Arc<ReqwestApi>,
    timing: &EngineTiming,
    active: &mut CancellationToken,
    command: EngineCommand,
    event_tx: &mpsc::Sender<EngineEvent>,
) {
    match command {
        EngineCommand::StartJob { generation, fields } => {
            // Supersede whatever loop is still in flight.
            active.cancel();
            *active = CancellationToken::new();
            let api = api.clone();
            let event_tx = event_tx.clone();
            runtime.spawn(async move {
                let result = api.start_job(&fields).await;
                let _ = event_tx.send(EngineEvent::StartSettled { generation, result });
            });
        }
        EngineCommand::SchedulePoll { generation, delay } => {
            let api = api.clone();
            let event_tx = event_tx.clone();
            let token = active.clone();
            let wait = timing.poll_delay(delay);
            runtime.spawn(async move {
                tokio::select! {
                    _ = token.cancelled() => return,
                    _ = tokio::time::sleep(wait) => {}
                }
                let result = api.poll_status().await;
                let _ = event_tx.send(EngineEvent::StatusSettled { generation, result });
            });
        }
        EngineCommand::FetchResults { generation } => {
            let api = api.clone();
            let event_tx = event_tx.clone();
            let token = active.clone();
            let grace = timing.results_grace;
            runtime.spawn(async move {
                tokio::select! {
                    _ = token.cancelled() => return,
                    _ = tokio::time::sleep(grace) => {}
                }
                let result = api.fetch_results().await;
                let _ = event_tx.send(EngineEvent::ResultsSettled { generation, result });
            });
        }
        EngineCommand::CancelPolling => {
            client_warn!("cancelling in-flight poll loop");
            active.cancel();
            *active = CancellationToken::new();
        }
        EngineCommand::ScheduleNoticeExpiry { id } => {
            // Notice timers outlive poll loops; they are not cancellable.
            let event_tx = event_tx.clone();
            let ttl = timing.notice_ttl;
            runtime.spawn(async move {
                tokio::time::sleep(ttl).await;
                let _ = event_tx.send(EngineEvent::NoticeExpired { id });
            });
        }
    }
}
