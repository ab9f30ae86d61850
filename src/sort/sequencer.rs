//! Bitonic sort stage sequencer.
//!
//! The network is a series of cycles. Each cycle starts with a flip stage
//! whose span is the cycle's block height, followed by disperse stages that
//! halve the span down to 2. The block height doubles every cycle until it
//! covers the whole buffer.

use serde::{Deserialize, Serialize};

use super::config::{SequencerError, SortConfiguration};
use super::partner::compute_swap_partner;
use super::stage::{Stage, StageKind};

/// Mutable run state of one sort.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SequencerState {
    config: SortConfiguration,
    workgroup_size: u32,
    step_index: u32,
    total_steps: u32,
    prev_stage: StageKind,
    next_stage: StageKind,
    prev_span: u32,
    next_span: u32,
    highest_block_height: u32,
    total_swaps: u64,
    hovered_cell: u32,
    swapped_cell: u32,
}

impl SequencerState {
    /// Create a fresh state for `config`.
    pub fn new(config: SortConfiguration) -> Result<Self, SequencerError> {
        config.validate()?;

        let mut state = Self {
            config,
            workgroup_size: config.workgroup_size(),
            step_index: 0,
            total_steps: config.total_steps(),
            prev_stage: StageKind::None,
            next_stage: StageKind::FlipLocal,
            prev_span: 0,
            next_span: 2,
            highest_block_height: 2,
            total_swaps: 0,
            hovered_cell: 0,
            swapped_cell: 0,
        };
        state.update_swapped_cell();
        Ok(state)
    }

    /// Restart the sort under `config`.
    ///
    /// The hovered cell survives, clamped to the new element range. On error
    /// the current state is left untouched.
    pub fn reset(&mut self, config: SortConfiguration) -> Result<(), SequencerError> {
        let mut fresh = Self::new(config)?;
        fresh.hovered_cell = self.hovered_cell.min(config.total_elements - 1);
        fresh.update_swapped_cell();

        if config != self.config {
            log::info!("Sort configuration changed: {} -> {}", self.config, config);
        }
        *self = fresh;
        Ok(())
    }

    /// Move to the next stage of the network, returning the stage that was
    /// pending before the call.
    ///
    /// The caller executes the returned stage. Calling this on a finished
    /// sort changes nothing and reports [`SequencerError::AlreadyComplete`].
    pub fn advance(&mut self) -> Result<Stage, SequencerError> {
        if self.is_complete() {
            log::warn!("Advance called after sort completed at step {}", self.step_index);
            return Err(SequencerError::AlreadyComplete {
                step_index: self.step_index,
            });
        }

        let mut next = *self;
        next.step_index += 1;
        next.prev_stage = self.next_stage;
        next.prev_span = self.next_span;

        let halved = next.prev_span / 2;
        if halved > 1 {
            // Disperse continuation within the current cycle
            next.next_span = halved;
            next.next_stage = StageKind::disperse(halved, next.workgroup_size);
        } else {
            next.highest_block_height *= 2;
            if next.highest_block_height >= next.config.total_elements * 2 {
                next.next_stage = StageKind::None;
                next.next_span = 0;
            } else {
                next.next_span = next.highest_block_height;
                next.next_stage = StageKind::flip(next.highest_block_height, next.workgroup_size);
            }
        }
        next.update_swapped_cell();

        log::debug!(
            "Step {}/{}: executed {} (span {}), next {} (span {})",
            next.step_index,
            next.total_steps,
            next.prev_stage,
            next.prev_span,
            next.next_stage,
            next.next_span
        );
        if next.is_complete() {
            log::info!("Sort of {} finished in {} steps", next.config, next.step_index);
        }

        *self = next;
        Ok(Stage::new(self.prev_stage, self.prev_span))
    }

    /// Store the hovered cell, clamped into the element range.
    pub fn set_hovered_cell(&mut self, raw_index: i64) {
        let max = self.config.total_elements as i64 - 1;
        self.hovered_cell = raw_index.clamp(0, max) as u32;
        self.update_swapped_cell();
    }

    /// Store the swap count observed by the executor. Not validated.
    pub fn record_swap_count(&mut self, observed: u64) {
        self.total_swaps = observed;
    }

    /// Remaining stages in execution order, without mutating this state.
    pub fn remaining_stages(&self) -> StageIter {
        StageIter { state: *self }
    }

    pub fn is_complete(&self) -> bool {
        self.next_stage == StageKind::None
    }

    pub fn config(&self) -> SortConfiguration {
        self.config
    }

    pub fn total_elements(&self) -> u32 {
        self.config.total_elements
    }

    pub fn workgroup_size(&self) -> u32 {
        self.workgroup_size
    }

    pub fn step_index(&self) -> u32 {
        self.step_index
    }

    pub fn total_steps(&self) -> u32 {
        self.total_steps
    }

    pub fn prev_stage(&self) -> StageKind {
        self.prev_stage
    }

    pub fn next_stage(&self) -> StageKind {
        self.next_stage
    }

    pub fn prev_span(&self) -> u32 {
        self.prev_span
    }

    pub fn next_span(&self) -> u32 {
        self.next_span
    }

    /// The stage the next [`advance`](Self::advance) hands out.
    pub fn pending(&self) -> Stage {
        Stage::new(self.next_stage, self.next_span)
    }

    pub fn highest_block_height(&self) -> u32 {
        self.highest_block_height
    }

    pub fn total_swaps(&self) -> u64 {
        self.total_swaps
    }

    pub fn hovered_cell(&self) -> u32 {
        self.hovered_cell
    }

    pub fn swapped_cell(&self) -> u32 {
        self.swapped_cell
    }

    /// Display-facing copy of the state.
    pub fn snapshot(&self) -> SequencerSnapshot {
        SequencerSnapshot {
            total_elements: self.config.total_elements,
            size_limit: self.config.size_limit,
            workgroup_size: self.workgroup_size,
            step_index: self.step_index,
            total_steps: self.total_steps,
            prev_stage: self.prev_stage,
            next_stage: self.next_stage,
            prev_span: self.prev_span,
            next_span: self.next_span,
            total_swaps: self.total_swaps,
            hovered_cell: self.hovered_cell,
            swapped_cell: self.swapped_cell,
        }
    }

    fn update_swapped_cell(&mut self) {
        self.swapped_cell = compute_swap_partner(
            self.hovered_cell,
            self.next_stage,
            self.next_span,
            self.config.total_elements,
        );
    }
}

/// Serializable view of [`SequencerState`] for the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SequencerSnapshot {
    pub total_elements: u32,
    pub size_limit: u32,
    pub workgroup_size: u32,
    pub step_index: u32,
    pub total_steps: u32,
    pub prev_stage: StageKind,
    pub next_stage: StageKind,
    pub prev_span: u32,
    pub next_span: u32,
    pub total_swaps: u64,
    pub hovered_cell: u32,
    pub swapped_cell: u32,
}

/// Iterator over the stages a sequencer has left to run.
#[derive(Debug, Clone)]
pub struct StageIter {
    state: SequencerState,
}

impl Iterator for StageIter {
    type Item = Stage;

    fn next(&mut self) -> Option<Stage> {
        if self.state.is_complete() {
            return None;
        }
        self.state.advance().ok()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = self.state.total_steps.saturating_sub(self.state.step_index) as usize;
        (left, Some(left))
    }
}

impl ExactSizeIterator for StageIter {}
