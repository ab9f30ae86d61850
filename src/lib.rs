//! Bitonic Visualizer Core
//!
//! Host-side logic of a step-by-step bitonic sort visualizer.
//!
//! # Features
//!
//! - Stage sequencing of the flip/disperse bitonic network, with
//!   local/global classification against the workgroup size
//! - Swap-partner mapping for hover highlighting
//! - Per-configuration completion statistics
//! - A CPU reference executor and the uniform layout for GPU dispatches
//! - A session driver with manual and timed automatic stepping
//!
//! # Example
//! ```
//! use bitonic_visualizer::{SequencerState, SortConfiguration, StageKind};
//!
//! let mut state = SequencerState::new(SortConfiguration::new(8, 8)).unwrap();
//! while !state.is_complete() {
//!     state.advance().unwrap();
//! }
//! assert_eq!(state.step_index(), 6);
//! assert_eq!(state.next_stage(), StageKind::None);
//! ```

pub mod exec;
pub mod grid;
pub mod session;
pub mod sort;
pub mod stats;

// Re-export commonly used types
pub use exec::{CpuExecutor, DispatchParams, ElementBuffer, ExecutorError, StageExecutor, StepOutcome};
pub use grid::GridLayout;
pub use session::{AutoStepper, SessionConfig, SessionError, SortSession, StepReport};
pub use sort::{
    compute_swap_partner, total_steps, SequencerError, SequencerSnapshot, SequencerState,
    SortConfiguration, Stage, StageKind,
};
pub use stats::{RunStatistics, StatsEntry, StatsRecord};
