//! Sort session tying the sequencer to an element buffer and executor.
//!
//! The host frame loop owns a [`SortSession`] and calls into it: one
//! [`step`](SortSession::step) runs the pending stage on the executor,
//! feeds the swap count back into the sequencer, advances it, and records
//! the run in [`RunStatistics`] once the network finishes.

mod auto;

pub use auto::AutoStepper;

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::exec::{CpuExecutor, DispatchParams, ElementBuffer, ExecutorError, StageExecutor};
use crate::grid::GridLayout;
use crate::sort::{SequencerError, SequencerSnapshot, SequencerState, SortConfiguration, Stage};
use crate::stats::RunStatistics;

/// Session configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub total_elements: u32,
    pub size_limit: u32,
    /// Delay between automatic steps, in milliseconds.
    pub auto_step_interval_ms: u64,
    /// Start with automatic stepping enabled.
    pub auto_sort: bool,
    /// Seed for the initial element shuffle.
    pub seed: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            total_elements: 16,
            size_limit: 256,
            auto_step_interval_ms: 50,
            auto_sort: false,
            seed: 0x5eed,
        }
    }
}

impl SessionConfig {
    /// Parse a config from JSON; missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, SessionError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn sort_configuration(&self) -> SortConfiguration {
        SortConfiguration::new(self.total_elements, self.size_limit)
    }

    pub fn auto_stepper(&self) -> AutoStepper {
        let mut stepper = AutoStepper::new(Duration::from_millis(self.auto_step_interval_ms));
        stepper.set_enabled(self.auto_sort);
        stepper
    }
}

/// Errors that can occur while driving a session.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("Sequencer error: {0}")]
    Sequencer(#[from] SequencerError),
    #[error("Executor error: {0}")]
    Executor(#[from] ExecutorError),
    #[error("Config error: {0}")]
    Config(#[from] serde_json::Error),
}

/// What a single [`SortSession::step`] did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepReport {
    /// Stage that was executed.
    pub stage: Stage,
    /// Swaps performed by this stage.
    pub swaps: u64,
    /// Swaps since the last reset.
    pub total_swaps: u64,
    pub completed: bool,
    /// Updated average for the configuration, set on the completing step
    /// when the executor reported timings for the whole run.
    pub average_sort_time_ms: Option<f64>,
}

/// A sort run plus the statistics of every run before it.
pub struct SortSession<E: StageExecutor = CpuExecutor> {
    sequencer: SequencerState,
    elements: ElementBuffer,
    executor: E,
    stats: RunStatistics,
    seed: u64,
    sort_time: Duration,
    step_time: Option<Duration>,
    fully_timed: bool,
}

impl SortSession<CpuExecutor> {
    /// Session backed by the CPU reference executor.
    pub fn cpu(config: &SessionConfig) -> Result<Self, SessionError> {
        Self::new(config, CpuExecutor::new())
    }
}

impl<E: StageExecutor> SortSession<E> {
    pub fn new(config: &SessionConfig, executor: E) -> Result<Self, SessionError> {
        let sort_config = config.sort_configuration();
        let sequencer = SequencerState::new(sort_config)?;
        let elements = ElementBuffer::shuffled(sort_config.total_elements, config.seed);

        let mut stats = RunStatistics::new();
        stats.register(sort_config);

        log::info!(
            "Sort session created: {} (workgroup size {}, {} backend)",
            sort_config,
            sequencer.workgroup_size(),
            executor.name()
        );

        Ok(Self {
            sequencer,
            elements,
            executor,
            stats,
            seed: config.seed,
            sort_time: Duration::ZERO,
            step_time: None,
            fully_timed: true,
        })
    }

    /// Execute the pending stage and advance the sequencer.
    ///
    /// Nothing changes if the executor fails or the sort is already
    /// complete.
    pub fn step(&mut self) -> Result<StepReport, SessionError> {
        if self.sequencer.is_complete() {
            return Err(SequencerError::AlreadyComplete {
                step_index: self.sequencer.step_index(),
            }
            .into());
        }
        self.check_length()?;

        let pending = self.sequencer.pending();
        let outcome = self.executor.execute(pending, self.elements.as_mut_slice())?;
        let stage = self.sequencer.advance()?;

        let total_swaps = self.sequencer.total_swaps() + outcome.swaps;
        self.sequencer.record_swap_count(total_swaps);

        self.step_time = outcome.elapsed;
        match outcome.elapsed {
            Some(elapsed) => self.sort_time += elapsed,
            None => self.fully_timed = false,
        }

        let completed = self.sequencer.is_complete();
        let average_sort_time_ms = if completed {
            self.finish_run()
        } else {
            None
        };

        Ok(StepReport {
            stage,
            swaps: outcome.swaps,
            total_swaps,
            completed,
            average_sort_time_ms,
        })
    }

    /// Run up to `count` steps, stopping early when the sort completes.
    ///
    /// Returns the number of steps executed.
    pub fn step_n(&mut self, count: usize) -> Result<usize, SessionError> {
        let mut executed = 0;
        while executed < count && !self.sequencer.is_complete() {
            self.step()?;
            executed += 1;
        }
        Ok(executed)
    }

    /// Run every remaining step.
    pub fn run_to_completion(&mut self) -> Result<usize, SessionError> {
        let remaining = self.remaining_steps();
        self.step_n(remaining)
    }

    /// Feed a frame's elapsed time through `stepper` and run the steps due.
    ///
    /// The stepper is switched off once the sort completes.
    pub fn auto_tick(
        &mut self,
        stepper: &mut AutoStepper,
        elapsed: Duration,
    ) -> Result<usize, SessionError> {
        let due = stepper.tick(elapsed);
        let executed = self.step_n(due)?;
        if self.sequencer.is_complete() && stepper.is_enabled() {
            stepper.set_enabled(false);
        }
        Ok(executed)
    }

    /// Shuffle the elements with `seed` and restart the sort.
    pub fn randomize(&mut self, seed: u64) {
        self.seed = seed;
        self.elements.fill_ascending();
        self.elements.randomize(seed);
        self.restart_sequencer();
    }

    /// Replay the current run: same seed, same starting permutation.
    pub fn restart(&mut self) {
        self.randomize(self.seed);
    }

    /// Switch to a new configuration. On error the session is unchanged.
    pub fn set_configuration(&mut self, config: SortConfiguration) -> Result<(), SessionError> {
        let previous = self.sequencer.config();
        self.sequencer.reset(config)?;

        if config.total_elements != previous.total_elements {
            self.elements = ElementBuffer::shuffled(config.total_elements, self.seed);
        } else {
            self.elements.fill_ascending();
            self.elements.randomize(self.seed);
        }
        self.stats.register(config);
        self.reset_timing();
        Ok(())
    }

    pub fn set_hovered_cell(&mut self, raw_index: i64) {
        self.sequencer.set_hovered_cell(raw_index);
    }

    /// Hover the cell under normalized pointer coordinates.
    pub fn hover_at(&mut self, u: f32, v: f32) {
        let cell = self.grid().cell_at(u, v);
        self.sequencer.set_hovered_cell(cell as i64);
    }

    pub fn grid(&self) -> GridLayout {
        GridLayout::for_elements(self.sequencer.total_elements())
    }

    /// Uniforms for dispatching the pending stage on a GPU backend.
    pub fn dispatch_params(&self) -> DispatchParams {
        DispatchParams::for_pending(&self.sequencer)
    }

    pub fn snapshot(&self) -> SequencerSnapshot {
        self.sequencer.snapshot()
    }

    pub fn sequencer(&self) -> &SequencerState {
        &self.sequencer
    }

    pub fn elements(&self) -> &ElementBuffer {
        &self.elements
    }

    pub fn executor(&self) -> &E {
        &self.executor
    }

    pub fn stats(&self) -> &RunStatistics {
        &self.stats
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn is_complete(&self) -> bool {
        self.sequencer.is_complete()
    }

    pub fn remaining_steps(&self) -> usize {
        self.sequencer
            .total_steps()
            .saturating_sub(self.sequencer.step_index()) as usize
    }

    /// Time spent executing stages of the current run.
    pub fn sort_time(&self) -> Duration {
        self.sort_time
    }

    /// Time of the last executed stage, if the backend measured it.
    pub fn step_time(&self) -> Option<Duration> {
        self.step_time
    }

    pub fn average_sort_time_ms(&self) -> f64 {
        self.stats.average(self.sequencer.config())
    }

    fn finish_run(&mut self) -> Option<f64> {
        let config = self.sequencer.config();
        if !self.fully_timed {
            log::debug!("Sort of {} finished without timings, not recorded", config);
            return None;
        }
        let elapsed_ms = self.sort_time.as_secs_f64() * 1000.0;
        Some(self.stats.record_completion(config, elapsed_ms))
    }

    fn check_length(&self) -> Result<(), ExecutorError> {
        let expected = self.sequencer.total_elements() as usize;
        if self.elements.len() != expected {
            return Err(ExecutorError::LengthMismatch {
                expected,
                got: self.elements.len(),
            });
        }
        Ok(())
    }

    fn restart_sequencer(&mut self) {
        let config = self.sequencer.config();
        if let Err(err) = self.sequencer.reset(config) {
            // config was validated when it became current
            log::error!("Failed to restart sequencer: {}", err);
        }
        self.reset_timing();
    }

    fn reset_timing(&mut self) {
        self.sort_time = Duration::ZERO;
        self.step_time = None;
        self.fully_timed = true;
    }
}
