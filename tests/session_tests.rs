//! Integration tests for sort sessions and stage executors.

use std::time::Duration;

use bitonic_visualizer::exec::{
    CpuExecutor, DispatchParams, ElementBuffer, ExecutorError, StageExecutor, StepOutcome,
};
use bitonic_visualizer::session::{AutoStepper, SessionConfig, SessionError, SortSession};
use bitonic_visualizer::sort::{compute_swap_partner, SortConfiguration, Stage, StageKind};

fn config(total_elements: u32, size_limit: u32, seed: u64) -> SessionConfig {
    SessionConfig {
        total_elements,
        size_limit,
        seed,
        ..Default::default()
    }
}

/// Executor that wraps the CPU one but reports no timings.
struct UntimedExecutor(CpuExecutor);

impl StageExecutor for UntimedExecutor {
    fn name(&self) -> &'static str {
        "untimed"
    }

    fn execute(&mut self, stage: Stage, elements: &mut [u32]) -> Result<StepOutcome, ExecutorError> {
        let outcome = self.0.execute(stage, elements)?;
        Ok(StepOutcome::untimed(outcome.swaps))
    }
}

/// Executor that always fails.
struct FailingExecutor;

impl StageExecutor for FailingExecutor {
    fn name(&self) -> &'static str {
        "failing"
    }

    fn execute(&mut self, _stage: Stage, _elements: &mut [u32]) -> Result<StepOutcome, ExecutorError> {
        Err(ExecutorError::Backend("device lost".to_string()))
    }
}

// ==================== Sorting ====================

#[test]
fn test_cpu_session_sorts_every_configuration() {
    for total_log in 2..=10 {
        for limit_log in 1..=8 {
            for seed in [1, 2, 3] {
                let mut session =
                    SortSession::cpu(&config(1 << total_log, 1 << limit_log, seed)).unwrap();
                let steps = session.run_to_completion().unwrap();
                assert_eq!(steps as u32, session.sequencer().total_steps());
                assert!(session.is_complete());
                assert!(
                    session.elements().is_sorted(),
                    "{} elements, limit {}, seed {} not sorted",
                    1 << total_log,
                    1 << limit_log,
                    seed
                );
            }
        }
    }
}

#[test]
fn test_reversed_input_sorts() {
    let mut elements = ElementBuffer::from((0..256).rev().collect::<Vec<u32>>());
    let mut state =
        bitonic_visualizer::SequencerState::new(SortConfiguration::new(256, 32)).unwrap();
    let mut exec = CpuExecutor::new();
    for stage in state.remaining_stages() {
        exec.execute(stage, elements.as_mut_slice()).unwrap();
    }
    while !state.is_complete() {
        state.advance().unwrap();
    }
    assert!(elements.is_sorted());
    assert_eq!(exec.stages_run(), 36);
}

#[test]
fn test_executor_pairs_match_swap_partner() {
    // Compare-and-swap through the partner mapping must give the executor's result
    let total = 32;
    let mut state =
        bitonic_visualizer::SequencerState::new(SortConfiguration::new(total, 4)).unwrap();
    let mut actual = ElementBuffer::shuffled(total, 99);
    let mut exec = CpuExecutor::new();

    while !state.is_complete() {
        let stage = state.pending();
        let mut expected = actual.as_slice().to_vec();
        for i in 0..total {
            let p = compute_swap_partner(i, stage.kind, stage.span, total);
            let (lo, hi) = (i.min(p) as usize, i.max(p) as usize);
            if i as usize == lo && lo != hi && expected[lo] > expected[hi] {
                expected.swap(lo, hi);
            }
        }
        exec.execute(stage, actual.as_mut_slice()).unwrap();
        assert_eq!(actual.as_slice(), expected.as_slice(), "stage {:?}", stage);
        state.advance().unwrap();
    }
}

// ==================== Swap Counting ====================

#[test]
fn test_total_swaps_is_sum_of_step_swaps() {
    let mut session = SortSession::cpu(&config(64, 8, 11)).unwrap();
    let mut sum = 0;
    while !session.is_complete() {
        let report = session.step().unwrap();
        sum += report.swaps;
        assert_eq!(report.total_swaps, sum);
        assert_eq!(session.sequencer().total_swaps(), sum);
    }
    assert!(sum > 0);
}

#[test]
fn test_sorted_input_needs_no_swaps() {
    let mut elements = ElementBuffer::new(32);
    let mut exec = CpuExecutor::new();
    let state =
        bitonic_visualizer::SequencerState::new(SortConfiguration::new(32, 8)).unwrap();
    let swaps: u64 = state
        .remaining_stages()
        .map(|stage| exec.execute(stage, elements.as_mut_slice()).unwrap().swaps)
        .sum();
    assert_eq!(swaps, 0);
}

// ==================== Statistics ====================

#[test]
fn test_completion_recorded_once_per_run() {
    let cfg = config(16, 16, 3);
    let mut session = SortSession::cpu(&cfg).unwrap();
    let sort_config = cfg.sort_configuration();

    let mut last = None;
    while !session.is_complete() {
        last = Some(session.step().unwrap());
    }
    let last = last.unwrap();
    assert!(last.completed);
    assert!(last.average_sort_time_ms.is_some());
    assert_eq!(session.stats().get(sort_config).unwrap().sorts_completed, 1);

    // extra step attempts do not record again
    assert!(session.step().is_err());
    assert_eq!(session.stats().get(sort_config).unwrap().sorts_completed, 1);

    session.restart();
    session.run_to_completion().unwrap();
    assert_eq!(session.stats().get(sort_config).unwrap().sorts_completed, 2);
    assert!(session.average_sort_time_ms().is_finite());
}

#[test]
fn test_untimed_backend_skips_recording() {
    let mut session =
        SortSession::new(&config(16, 16, 3), UntimedExecutor(CpuExecutor::new())).unwrap();
    session.run_to_completion().unwrap();
    assert!(session.elements().is_sorted());
    let entry = session
        .stats()
        .get(SortConfiguration::new(16, 16))
        .unwrap();
    assert_eq!(entry.sorts_completed, 0);
    assert_eq!(session.average_sort_time_ms(), 0.0);
    assert_eq!(session.step_time(), None);
}

#[test]
fn test_statistics_survive_configuration_changes() {
    let mut session = SortSession::cpu(&config(16, 16, 1)).unwrap();
    session.run_to_completion().unwrap();

    session
        .set_configuration(SortConfiguration::new(64, 4))
        .unwrap();
    assert!(!session.is_complete());
    assert_eq!(session.elements().len(), 64);
    session.run_to_completion().unwrap();

    let stats = session.stats();
    assert_eq!(stats.len(), 2);
    assert_eq!(stats.get(SortConfiguration::new(16, 16)).unwrap().sorts_completed, 1);
    assert_eq!(stats.get(SortConfiguration::new(64, 4)).unwrap().sorts_completed, 1);
}

// ==================== Session Control ====================

#[test]
fn test_failed_execution_leaves_state_unchanged() {
    let mut session = SortSession::new(&config(16, 16, 1), FailingExecutor).unwrap();
    let before = session.snapshot();
    let elements = session.elements().clone();

    assert!(matches!(session.step(), Err(SessionError::Executor(_))));
    assert_eq!(session.snapshot(), before);
    assert_eq!(session.elements(), &elements);
}

#[test]
fn test_invalid_configuration_change_is_rejected() {
    let mut session = SortSession::cpu(&config(16, 16, 1)).unwrap();
    session.step_n(3).unwrap();
    let before = session.snapshot();

    assert!(session
        .set_configuration(SortConfiguration::new(48, 16))
        .is_err());
    assert_eq!(session.snapshot(), before);
    assert_eq!(session.elements().len(), 16);
}

#[test]
fn test_step_n_stops_at_completion() {
    let mut session = SortSession::cpu(&config(8, 8, 1)).unwrap();
    assert_eq!(session.step_n(4).unwrap(), 4);
    assert_eq!(session.remaining_steps(), 2);
    assert_eq!(session.step_n(10).unwrap(), 2);
    assert_eq!(session.step_n(10).unwrap(), 0);
}

#[test]
fn test_randomize_resets_run() {
    let mut session = SortSession::cpu(&config(32, 8, 1)).unwrap();
    session.step_n(5).unwrap();
    session.randomize(77);

    let snapshot = session.snapshot();
    assert_eq!(snapshot.step_index, 0);
    assert_eq!(snapshot.total_swaps, 0);
    assert_eq!(snapshot.next_stage, StageKind::FlipLocal);
    assert_eq!(session.seed(), 77);
    assert_eq!(session.elements(), &ElementBuffer::shuffled(32, 77));
    assert_eq!(session.sort_time(), Duration::ZERO);
}

#[test]
fn test_hover_at_maps_pointer_to_cells() {
    let mut session = SortSession::cpu(&config(16, 16, 1)).unwrap();
    session.hover_at(0.9, 0.1);
    let snapshot = session.snapshot();
    assert_eq!(snapshot.hovered_cell, 3);
    // pending FlipLocal(2): 3 <-> 2
    assert_eq!(snapshot.swapped_cell, 2);

    session.set_hovered_cell(1_000);
    assert_eq!(session.snapshot().hovered_cell, 15);
}

#[test]
fn test_dispatch_params_follow_session() {
    let mut session = SortSession::cpu(&config(64, 8, 1)).unwrap();
    let params: DispatchParams = session.dispatch_params();
    assert_eq!((params.width, params.height), (8, 8));
    assert_eq!(params.algo, StageKind::FlipLocal.code());

    while !session.is_complete() {
        let params = session.dispatch_params();
        let pending = session.sequencer().pending();
        assert_eq!(params.algo, pending.kind.code());
        assert_eq!(params.block_height, pending.span);
        session.step().unwrap();
    }
    assert_eq!(session.dispatch_params().algo, 0);
}

// ==================== Automatic Stepping ====================

#[test]
fn test_auto_tick_runs_due_steps_and_stops() {
    let mut session = SortSession::cpu(&config(16, 16, 2)).unwrap();
    let mut stepper = AutoStepper::new(Duration::from_millis(50));
    stepper.set_enabled(true);

    assert_eq!(session.auto_tick(&mut stepper, Duration::from_millis(20)).unwrap(), 0);
    assert_eq!(session.auto_tick(&mut stepper, Duration::from_millis(130)).unwrap(), 3);
    assert_eq!(session.sequencer().step_index(), 3);

    // plenty of time for the rest
    assert_eq!(session.auto_tick(&mut stepper, Duration::from_secs(10)).unwrap(), 7);
    assert!(session.is_complete());
    assert!(!stepper.is_enabled());
    assert!(session.elements().is_sorted());
}

#[tokio::test]
async fn test_frame_loop_drives_session_to_completion() {
    let cfg = SessionConfig {
        total_elements: 32,
        size_limit: 4,
        auto_step_interval_ms: 1,
        auto_sort: true,
        seed: 9,
    };
    let mut session = SortSession::cpu(&cfg).unwrap();
    let mut stepper = cfg.auto_stepper();

    let mut interval = tokio::time::interval(Duration::from_millis(2));
    let mut last = tokio::time::Instant::now();
    for _ in 0..1_000 {
        interval.tick().await;
        let now = tokio::time::Instant::now();
        session.auto_tick(&mut stepper, now - last).unwrap();
        last = now;
        if session.is_complete() {
            break;
        }
    }

    assert!(session.is_complete());
    assert!(session.elements().is_sorted());
}
