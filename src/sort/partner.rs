//! Swap-partner mapping used for hover highlighting.

use super::StageKind;

/// Index that `hovered` would be compared against by the given stage.
///
/// Flip stages mirror the index within its `span`-sized block; disperse
/// stages pair it with the element half a block away. With no pending
/// stage (or a zero span) the index maps to itself. The result is clamped
/// to `[0, total_elements - 1]`, and an empty range yields 0.
pub fn compute_swap_partner(hovered: u32, stage: StageKind, span: u32, total_elements: u32) -> u32 {
    if total_elements == 0 {
        return 0;
    }

    let partner: u64 = if span == 0 {
        hovered as u64
    } else {
        match stage {
            StageKind::FlipLocal | StageKind::FlipGlobal => {
                let block_end = (hovered / span + 1) as u64 * span as u64;
                // block_end > hovered, so this never underflows
                block_end - (hovered % span) as u64 - 1
            }
            StageKind::DisperseLocal | StageKind::DisperseGlobal => {
                let half = span / 2;
                if hovered % span < half {
                    hovered as u64 + half as u64
                } else {
                    (hovered - half) as u64
                }
            }
            StageKind::None => hovered as u64,
        }
    };

    partner.min((total_elements - 1) as u64) as u32
}
