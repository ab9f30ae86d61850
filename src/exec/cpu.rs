//! CPU reference executor.

use std::time::Instant;

use super::{ExecutorError, StageExecutor, StepOutcome};
use crate::sort::{Stage, StageKind};

/// Runs each stage's compare-and-swap pass on the CPU.
///
/// Every comparison is ascending: the lower index of a pair keeps the
/// smaller value. Flip pairs mirror each other within a block; disperse
/// pairs sit half a block apart.
#[derive(Debug, Clone, Default)]
pub struct CpuExecutor {
    stages_run: u64,
}

impl CpuExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stages executed since construction.
    pub fn stages_run(&self) -> u64 {
        self.stages_run
    }

    fn check_span(span: u32, len: usize) -> Result<(), ExecutorError> {
        let span_len = span as usize;
        if span < 2 || !span.is_power_of_two() || span_len > len || len % span_len != 0 {
            return Err(ExecutorError::InvalidSpan { span, len });
        }
        Ok(())
    }

    fn flip(elements: &mut [u32], span: usize) -> u64 {
        let mut swaps = 0;
        let half = span / 2;
        for block in elements.chunks_exact_mut(span) {
            for offset in 0..half {
                let partner = span - offset - 1;
                if block[offset] > block[partner] {
                    block.swap(offset, partner);
                    swaps += 1;
                }
            }
        }
        swaps
    }

    fn disperse(elements: &mut [u32], span: usize) -> u64 {
        let mut swaps = 0;
        let half = span / 2;
        for block in elements.chunks_exact_mut(span) {
            for offset in 0..half {
                if block[offset] > block[offset + half] {
                    block.swap(offset, offset + half);
                    swaps += 1;
                }
            }
        }
        swaps
    }
}

impl StageExecutor for CpuExecutor {
    fn name(&self) -> &'static str {
        "cpu"
    }

    fn execute(&mut self, stage: Stage, elements: &mut [u32]) -> Result<StepOutcome, ExecutorError> {
        if stage.is_none() {
            return Ok(StepOutcome::untimed(0));
        }
        Self::check_span(stage.span, elements.len())?;

        let start = Instant::now();
        let span = stage.span as usize;
        let swaps = match stage.kind {
            StageKind::FlipLocal | StageKind::FlipGlobal => Self::flip(elements, span),
            StageKind::DisperseLocal | StageKind::DisperseGlobal => Self::disperse(elements, span),
            StageKind::None => 0,
        };
        self.stages_run += 1;

        Ok(StepOutcome::timed(swaps, start.elapsed()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flip_reverses_descending_block() {
        let mut exec = CpuExecutor::new();
        let mut data = vec![3, 2, 1, 0];
        let outcome = exec
            .execute(Stage::new(StageKind::FlipLocal, 4), &mut data)
            .unwrap();
        assert_eq!(data, vec![0, 1, 2, 3]);
        assert_eq!(outcome.swaps, 2);
        assert!(outcome.elapsed.is_some());
    }

    #[test]
    fn test_disperse_exchanges_halves() {
        let mut exec = CpuExecutor::new();
        let mut data = vec![2, 3, 0, 1];
        let outcome = exec
            .execute(Stage::new(StageKind::DisperseGlobal, 4), &mut data)
            .unwrap();
        assert_eq!(data, vec![0, 1, 2, 3]);
        assert_eq!(outcome.swaps, 2);
    }

    #[test]
    fn test_none_stage_does_nothing() {
        let mut exec = CpuExecutor::new();
        let mut data = vec![1, 0];
        let outcome = exec.execute(Stage::default(), &mut data).unwrap();
        assert_eq!(outcome.swaps, 0);
        assert_eq!(data, vec![1, 0]);
        assert_eq!(exec.stages_run(), 0);
    }

    #[test]
    fn test_rejects_bad_spans() {
        let mut exec = CpuExecutor::new();
        let mut data = vec![0; 8];
        for span in [1, 3, 16] {
            let err = exec
                .execute(Stage::new(StageKind::FlipLocal, span), &mut data)
                .unwrap_err();
            assert_eq!(err, ExecutorError::InvalidSpan { span, len: 8 });
        }
    }
}
