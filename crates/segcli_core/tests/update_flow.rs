use std::sync::Once;

use segcli_core::{
    estimated_progress, update, AnalysisPhase, AppState, DataSource, Effect, Generation,
    JobRequest, LoadFailure, Msg, PollDelay, SegmentReport, Severity, StatusReading,
};

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(client_logging::initialize_for_tests);
}

fn select_sample(state: AppState) -> AppState {
    let (state, _) = update(
        state,
        Msg::SampleSelected {
            name: "ecommerce".to_string(),
        },
    );
    state
}

fn start_polling(state: AppState) -> (AppState, Generation) {
    let state = select_sample(state);
    let (state, _) = update(state, Msg::SubmitRequested);
    let generation = state.generation();
    let (state, _) = update(
        state,
        Msg::StartSettled {
            generation,
            outcome: Ok(()),
        },
    );
    (state, generation)
}

fn status(generation: Generation, reading: StatusReading) -> Msg {
    Msg::StatusSettled {
        generation,
        reading,
    }
}

#[test]
fn submit_without_selection_is_rejected() {
    init_logging();
    let state = AppState::new();
    let (state, effects) = update(state, Msg::SubmitRequested);

    assert_eq!(state.phase(), AnalysisPhase::Idle);
    assert!(effects
        .iter()
        .all(|e| matches!(e, Effect::ScheduleNoticeExpiry { .. })));
    let notice = state.notices().last().unwrap();
    assert_eq!(notice.severity, Severity::Error);
    assert_eq!(notice.text, "Please choose a data source first");
}

#[test]
fn submission_emits_start_job_with_form_fields() {
    init_logging();
    let state = select_sample(AppState::new());
    let (mut state, effects) = update(state, Msg::SubmitRequested);

    assert_eq!(state.phase(), AnalysisPhase::Starting);
    assert_eq!(state.generation(), 1);
    assert_eq!(
        effects,
        vec![
            Effect::StartJob {
                generation: 1,
                request: JobRequest::from_source(&DataSource::Sample {
                    name: "ecommerce".to_string(),
                }),
            },
            Effect::ScheduleNoticeExpiry { id: 2 },
        ]
    );
    assert!(state.consume_dirty());
}

#[test]
fn start_ack_enters_polling_at_progress_floor() {
    init_logging();
    let (state, generation) = start_polling(AppState::new());

    assert_eq!(state.phase(), AnalysisPhase::Polling);
    let view = state.view();
    assert_eq!(view.progress.percent, 30);
    assert!(view.progress.estimated);
    assert_eq!(generation, 1);
}

#[test]
fn first_poll_uses_the_processing_tier() {
    init_logging();
    let state = select_sample(AppState::new());
    let (state, _) = update(state, Msg::SubmitRequested);
    let generation = state.generation();
    let (_state, effects) = update(
        state,
        Msg::StartSettled {
            generation,
            outcome: Ok(()),
        },
    );

    assert!(effects.contains(&Effect::SchedulePoll {
        generation,
        delay: PollDelay::Processing,
    }));
}

#[test]
fn processing_ticks_follow_the_estimate_law() {
    init_logging();
    let (mut state, generation) = start_polling(AppState::new());

    let mut previous = state.progress_percent();
    for attempt in 1..=40u32 {
        let (next, effects) = update(state, status(generation, StatusReading::Processing));
        state = next;
        let expected = 30 + attempt * 2;
        let expected = expected.min(90) as u8;
        assert_eq!(state.progress_percent(), expected);
        assert_eq!(state.progress_percent(), estimated_progress(attempt));
        assert!(state.progress_percent() >= previous);
        previous = state.progress_percent();
        assert!(effects.contains(&Effect::SchedulePoll {
            generation,
            delay: PollDelay::Processing,
        }));
    }
    // The ramp saturates at 90 and never claims completion on its own.
    assert_eq!(state.progress_percent(), 90);
}

#[test]
fn completion_forces_progress_to_exactly_100() {
    init_logging();
    let (state, generation) = start_polling(AppState::new());
    let (state, _) = update(state, status(generation, StatusReading::Processing));
    let (state, effects) = update(state, status(generation, StatusReading::Completed));

    assert_eq!(state.phase(), AnalysisPhase::Completed);
    let view = state.view();
    assert_eq!(view.progress.percent, 100);
    assert!(!view.progress.estimated);
    assert!(effects.contains(&Effect::FetchResults { generation }));
    // Completion stops the loop; no further tick is scheduled.
    assert!(!effects
        .iter()
        .any(|e| matches!(e, Effect::SchedulePoll { .. })));
}

#[test]
fn results_are_stored_and_rendered_once() {
    init_logging();
    let (state, generation) = start_polling(AppState::new());
    let (state, _) = update(state, status(generation, StatusReading::Completed));

    let mut first = SegmentReport {
        total_customers: 200,
        n_clusters: 2,
        ..SegmentReport::default()
    };
    first.cluster_sizes.insert("loyal".to_string(), 50);
    first.cluster_sizes.insert("regular".to_string(), 150);

    let (state, effects) = update(
        state,
        Msg::ResultsSettled {
            generation,
            outcome: Ok(first.clone()),
        },
    );
    assert!(effects.is_empty());
    assert_eq!(state.report(), Some(&first));

    // A second delivery must not replace the rendered payload.
    let second = SegmentReport {
        total_customers: 9,
        n_clusters: 1,
        ..SegmentReport::default()
    };
    let (state, effects) = update(
        state,
        Msg::ResultsSettled {
            generation,
            outcome: Ok(second),
        },
    );
    assert!(effects.is_empty());
    assert_eq!(state.report(), Some(&first));
}

#[test]
fn results_failure_notifies_without_retry() {
    init_logging();
    let (state, generation) = start_polling(AppState::new());
    let (mut state, _) = update(state, status(generation, StatusReading::Completed));
    state.consume_dirty();

    let (state, effects) = update(
        state,
        Msg::ResultsSettled {
            generation,
            outcome: Err(LoadFailure {
                message: "connection reset".to_string(),
            }),
        },
    );

    assert!(state.report().is_none());
    assert_eq!(effects.len(), 1);
    assert!(matches!(effects[0], Effect::ScheduleNoticeExpiry { .. }));
    let notice = state.notices().last().unwrap();
    assert_eq!(notice.severity, Severity::Error);
    assert!(notice.text.contains("connection reset"));
}

#[test]
fn rejected_start_surfaces_server_error_and_halts() {
    init_logging();
    let state = select_sample(AppState::new());
    let (state, _) = update(state, Msg::SubmitRequested);
    let generation = state.generation();
    let (state, effects) = update(
        state,
        Msg::StartSettled {
            generation,
            outcome: Err(segcli_core::StartFailure::Rejected {
                message: "no dataset uploaded".to_string(),
            }),
        },
    );

    assert_eq!(state.phase(), AnalysisPhase::Failed);
    assert!(!effects
        .iter()
        .any(|e| matches!(e, Effect::SchedulePoll { .. })));
    let notice = state.notices().last().unwrap();
    assert!(notice.text.contains("no dataset uploaded"));
}
