//! Uniform parameter struct for the bitonic compute shader.
//!
//! Must match the WGSL `Uniforms` layout exactly: four `u32` fields, 16 bytes.

use crate::grid::GridLayout;
use crate::sort::{SequencerState, StageKind};

/// Parameters for one compute dispatch.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct DispatchParams {
    pub width: u32,
    pub height: u32,
    /// [`StageKind::code`] of the stage to run.
    pub algo: u32,
    pub block_height: u32,
}

impl DispatchParams {
    pub fn new(grid: GridLayout, stage: StageKind, block_height: u32) -> Self {
        Self {
            width: grid.width,
            height: grid.height,
            algo: stage.code(),
            block_height,
        }
    }

    /// Parameters for the stage `state` will hand out next.
    pub fn for_pending(state: &SequencerState) -> Self {
        let grid = GridLayout::for_elements(state.total_elements());
        Self::new(grid, state.next_stage(), state.next_span())
    }

    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::bytes_of(self)
    }
}
