//! Bitonic sort network sequencing.
//!
//! This module provides:
//! - Sort configuration validation and workgroup sizing
//! - Stage classification (flip/disperse, local/global)
//! - The step-by-step stage sequencer
//! - Swap-partner mapping for hover highlighting

pub mod config;
pub mod partner;
pub mod sequencer;
pub mod stage;

pub use config::{total_steps, SequencerError, SortConfiguration, MAX_TOTAL_ELEMENTS};
pub use partner::compute_swap_partner;
pub use sequencer::{SequencerSnapshot, SequencerState, StageIter};
pub use stage::{Stage, StageKind};
