//! Sort configuration and sequencer errors.

use serde::{Deserialize, Serialize};

/// Errors reported by the stage sequencer.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SequencerError {
    #[error("Invalid configuration ({total_elements} elements, size limit {size_limit}): {reason}")]
    InvalidConfiguration {
        total_elements: u32,
        size_limit: u32,
        reason: &'static str,
    },
    #[error("Sort already complete after {step_index} steps")]
    AlreadyComplete { step_index: u32 },
}

/// Largest supported element count; the block height reaches twice this.
pub const MAX_TOTAL_ELEMENTS: u32 = 1 << 30;

/// Identity of one sort run: element count and workgroup size limit.
///
/// Changing either value starts a new configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SortConfiguration {
    pub total_elements: u32,
    pub size_limit: u32,
}

impl SortConfiguration {
    pub fn new(total_elements: u32, size_limit: u32) -> Self {
        Self {
            total_elements,
            size_limit,
        }
    }

    /// Check the power-of-two and minimum constraints.
    pub fn validate(&self) -> Result<(), SequencerError> {
        let invalid = |reason| SequencerError::InvalidConfiguration {
            total_elements: self.total_elements,
            size_limit: self.size_limit,
            reason,
        };

        if self.total_elements < 4 || !self.total_elements.is_power_of_two() {
            return Err(invalid("total elements must be a power of two >= 4"));
        }
        if self.total_elements > MAX_TOTAL_ELEMENTS {
            return Err(invalid("total elements exceed 2^30"));
        }
        if self.size_limit < 2 || !self.size_limit.is_power_of_two() {
            return Err(invalid("size limit must be a power of two >= 2"));
        }
        if self.workgroup_size() == 0 {
            return Err(invalid("workgroup size computes to zero"));
        }
        Ok(())
    }

    /// Threads per workgroup: half the elements, capped by the size limit.
    pub fn workgroup_size(&self) -> u32 {
        (self.total_elements / 2).min(self.size_limit)
    }

    /// Largest span a single workgroup can handle locally.
    pub fn local_span_limit(&self) -> u32 {
        self.workgroup_size() * 2
    }

    /// Number of workgroups one dispatch covers.
    pub fn workgroup_count(&self) -> u32 {
        match self.local_span_limit() {
            0 => 0,
            limit => self.total_elements / limit,
        }
    }

    /// Total stages needed to sort this many elements.
    pub fn total_steps(&self) -> u32 {
        total_steps(self.total_elements)
    }
}

impl Default for SortConfiguration {
    fn default() -> Self {
        Self {
            total_elements: 16,
            size_limit: 256,
        }
    }
}

impl std::fmt::Display for SortConfiguration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} elements / limit {}", self.total_elements, self.size_limit)
    }
}

/// Stage count of a bitonic network over `n` elements: `log2(n) * (log2(n) + 1) / 2`.
///
/// Non-powers of two are rounded down to the nearest power; 0 yields 0.
pub fn total_steps(n: u32) -> u32 {
    if n == 0 {
        return 0;
    }
    let log2 = n.ilog2();
    log2 * (log2 + 1) / 2
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_steps_closed_form() {
        assert_eq!(total_steps(4), 3);
        assert_eq!(total_steps(8), 6);
        assert_eq!(total_steps(16), 10);
        assert_eq!(total_steps(1024), 55);
        assert_eq!(total_steps(0), 0);
    }

    #[test]
    fn test_workgroup_size_is_clamped() {
        assert_eq!(SortConfiguration::new(16, 16).workgroup_size(), 8);
        assert_eq!(SortConfiguration::new(1024, 64).workgroup_size(), 64);
        assert_eq!(SortConfiguration::new(1024, 64).workgroup_count(), 8);
        assert_eq!(SortConfiguration::new(16, 256).workgroup_count(), 1);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        assert!(SortConfiguration::new(16, 16).validate().is_ok());
        assert!(SortConfiguration::new(4, 2).validate().is_ok());
        for (total, limit) in [(2, 2), (12, 4), (0, 4), (1 << 31, 4), (16, 1), (16, 6), (16, 0)] {
            let err = SortConfiguration::new(total, limit).validate().unwrap_err();
            assert!(matches!(err, SequencerError::InvalidConfiguration { .. }));
        }
    }

    #[test]
    fn test_default_matches_demo() {
        let config = SortConfiguration::default();
        assert_eq!(config.total_elements, 16);
        assert_eq!(config.size_limit, 256);
        assert!(config.validate().is_ok());
    }
}
