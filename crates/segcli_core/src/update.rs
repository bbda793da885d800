use crate::{
    validate_upload, AnalysisPhase, AppState, DataSource, Effect, JobRequest, Msg, PollDelay,
    Severity, StartFailure, StatusReading, MAX_POLL_ATTEMPTS,
};

const PROGRESS_FLOOR: u8 = 30;
const PROGRESS_STEP: u32 = 2;
const PROGRESS_CEILING: u8 = 90;

/// Estimated progress displayed while the server only reports `processing`:
/// a saturating ramp over the attempt count. The server transmits no real
/// fraction; only the terminal 100 is exact.
pub fn estimated_progress(attempts: u32) -> u8 {
    let ramp = u32::from(PROGRESS_FLOOR) + attempts.saturating_mul(PROGRESS_STEP);
    ramp.min(u32::from(PROGRESS_CEILING)) as u8
}

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let mut effects = Vec::new();
    match msg {
        Msg::SessionOpened => {
            notify(
                &mut state,
                &mut effects,
                Severity::Info,
                "Welcome! Ready to analyze your customers?",
            );
        }
        Msg::FileSelected { name, size_bytes } => match validate_upload(&name, size_bytes) {
            Ok(()) => {
                let text = format!("File \"{name}\" selected");
                state.set_selection(Some(DataSource::Upload {
                    filename: name,
                    size_bytes,
                }));
                notify(&mut state, &mut effects, Severity::Success, text);
            }
            Err(err) => {
                state.set_selection(None);
                notify(&mut state, &mut effects, Severity::Error, err.to_string());
            }
        },
        Msg::SampleSelected { name } => {
            let text = format!("Sample dataset \"{name}\" selected");
            state.set_selection(Some(DataSource::Sample { name }));
            notify(&mut state, &mut effects, Severity::Info, text);
        }
        Msg::SubmitRequested => match state.selection().cloned() {
            None => {
                notify(
                    &mut state,
                    &mut effects,
                    Severity::Error,
                    "Please choose a data source first",
                );
            }
            Some(source) => {
                // A resubmission supersedes whatever loop is still in
                // flight; the generation bump makes its events stale.
                if matches!(
                    state.phase(),
                    AnalysisPhase::Starting | AnalysisPhase::Polling
                ) {
                    effects.push(Effect::CancelPolling);
                }
                let generation = state.begin_submission();
                effects.push(Effect::StartJob {
                    generation,
                    request: JobRequest::from_source(&source),
                });
                notify(
                    &mut state,
                    &mut effects,
                    Severity::Info,
                    "Starting segmentation analysis",
                );
            }
        },
        Msg::StartSettled {
            generation,
            outcome,
        } => {
            if generation != state.generation() || state.phase() != AnalysisPhase::Starting {
                return (state, effects);
            }
            match outcome {
                Ok(()) => {
                    state.set_phase(AnalysisPhase::Polling);
                    state.set_progress(PROGRESS_FLOOR);
                    notify(&mut state, &mut effects, Severity::Success, "Analysis started");
                    effects.push(Effect::SchedulePoll {
                        generation,
                        delay: PollDelay::Processing,
                    });
                }
                Err(StartFailure::Rejected { message }) => {
                    state.set_phase(AnalysisPhase::Failed);
                    notify(
                        &mut state,
                        &mut effects,
                        Severity::Error,
                        format!("Analysis rejected: {message}"),
                    );
                }
                Err(StartFailure::Transport { message }) => {
                    state.set_phase(AnalysisPhase::Failed);
                    notify(
                        &mut state,
                        &mut effects,
                        Severity::Error,
                        format!("Network error starting analysis: {message}"),
                    );
                }
            }
        }
        Msg::StatusSettled {
            generation,
            reading,
        } => {
            if generation != state.generation() || state.phase() != AnalysisPhase::Polling {
                return (state, effects);
            }
            apply_status(&mut state, &mut effects, generation, reading);
        }
        Msg::ResultsSettled {
            generation,
            outcome,
        } => {
            if generation != state.generation()
                || state.phase() != AnalysisPhase::Completed
                || state.report().is_some()
            {
                return (state, effects);
            }
            match outcome {
                Ok(report) => state.set_report(report),
                Err(failure) => {
                    notify(
                        &mut state,
                        &mut effects,
                        Severity::Error,
                        format!("Failed to load results: {}", failure.message),
                    );
                }
            }
        }
        Msg::NoticeDismissed { id } | Msg::NoticeExpired { id } => {
            state.remove_notice(id);
        }
        Msg::Tick | Msg::NoOp => {}
    }

    (state, effects)
}

fn apply_status(
    state: &mut AppState,
    effects: &mut Vec<Effect>,
    generation: crate::Generation,
    reading: StatusReading,
) {
    match reading {
        StatusReading::Completed => {
            // The terminal 100 is exact, whatever the estimate said.
            state.set_progress(100);
            state.set_phase(AnalysisPhase::Completed);
            notify(state, effects, Severity::Success, "Analysis complete!");
            effects.push(Effect::FetchResults { generation });
        }
        StatusReading::Processing => {
            let attempts = state.record_tick(reading);
            state.set_progress(estimated_progress(attempts));
            if attempts < MAX_POLL_ATTEMPTS {
                effects.push(Effect::SchedulePoll {
                    generation,
                    delay: PollDelay::Processing,
                });
            } else {
                state.set_phase(AnalysisPhase::TimedOut);
                notify(
                    state,
                    effects,
                    Severity::Warning,
                    format!("Analysis timed out after {MAX_POLL_ATTEMPTS} status checks"),
                );
            }
        }
        StatusReading::Ambiguous => {
            let attempts = state.record_tick(reading);
            if attempts < MAX_POLL_ATTEMPTS {
                effects.push(Effect::SchedulePoll {
                    generation,
                    delay: PollDelay::Ambiguous,
                });
            } else {
                state.set_phase(AnalysisPhase::Failed);
                notify(
                    state,
                    effects,
                    Severity::Error,
                    "Analysis never reported progress; giving up",
                );
            }
        }
        StatusReading::TransportFailed => {
            let attempts = state.record_tick(reading);
            if attempts < MAX_POLL_ATTEMPTS {
                effects.push(Effect::SchedulePoll {
                    generation,
                    delay: PollDelay::TransportError,
                });
            } else {
                state.set_phase(AnalysisPhase::Failed);
                notify(
                    state,
                    effects,
                    Severity::Error,
                    "Lost contact with the server; giving up",
                );
            }
        }
    }
}

fn notify(
    state: &mut AppState,
    effects: &mut Vec<Effect>,
    severity: Severity,
    text: impl Into<String>,
) {
    let id = state.push_notice(text.into(), severity);
    effects.push(Effect::ScheduleNoticeExpiry { id });
}
