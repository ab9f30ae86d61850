//! Stage execution backends.
//!
//! The sequencer only decides which stage runs next. Executors perform the
//! compare-and-swap work for a stage over an element buffer and report how
//! many swaps happened. A GPU backend receives the same stage as
//! [`DispatchParams`].

mod cpu;
mod elements;
mod params;

pub use cpu::CpuExecutor;
pub use elements::ElementBuffer;
pub use params::DispatchParams;

use std::time::Duration;

use crate::sort::Stage;

/// Errors that can occur while executing a stage.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExecutorError {
    #[error("Span {span} does not tile a buffer of {len} elements")]
    InvalidSpan { span: u32, len: usize },
    #[error("Element buffer holds {got} values, configuration expects {expected}")]
    LengthMismatch { expected: usize, got: usize },
    #[error("Backend error: {0}")]
    Backend(String),
}

/// Result of running one stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StepOutcome {
    /// Element swaps performed by this stage alone.
    pub swaps: u64,
    /// Execution time, when the backend can measure it.
    pub elapsed: Option<Duration>,
}

impl StepOutcome {
    pub fn timed(swaps: u64, elapsed: Duration) -> Self {
        Self {
            swaps,
            elapsed: Some(elapsed),
        }
    }

    pub fn untimed(swaps: u64) -> Self {
        Self {
            swaps,
            elapsed: None,
        }
    }
}

/// Backend that performs the compare-and-swap pass of a stage.
pub trait StageExecutor {
    /// Short backend name for logging.
    fn name(&self) -> &'static str;

    /// Run `stage` over `elements`.
    ///
    /// `stage` must be the sequencer's pending stage at the time of the call.
    fn execute(&mut self, stage: Stage, elements: &mut [u32]) -> Result<StepOutcome, ExecutorError>;
}

impl<E: StageExecutor + ?Sized> StageExecutor for Box<E> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn execute(&mut self, stage: Stage, elements: &mut [u32]) -> Result<StepOutcome, ExecutorError> {
        (**self).execute(stage, elements)
    }
}
