//! Per-configuration sort timing statistics.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::sort::SortConfiguration;

/// Completion totals for one configuration.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct StatsEntry {
    pub sorts_completed: u32,
    pub total_time_ms: f64,
}

impl StatsEntry {
    /// Mean completion time, 0 when nothing has completed.
    pub fn average_ms(&self) -> f64 {
        if self.sorts_completed == 0 {
            return 0.0;
        }
        let average = self.total_time_ms / self.sorts_completed as f64;
        if average.is_finite() {
            average
        } else {
            0.0
        }
    }
}

/// Timing totals keyed by sort configuration.
///
/// Entries are created on first use and never removed.
#[derive(Debug, Clone, Default)]
pub struct RunStatistics {
    entries: HashMap<SortConfiguration, StatsEntry>,
}

/// Serializable row of [`RunStatistics`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatsRecord {
    pub total_elements: u32,
    pub size_limit: u32,
    pub sorts_completed: u32,
    pub total_time_ms: f64,
    pub average_sort_time_ms: f64,
}

impl RunStatistics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one finished sort of `config` and return the updated average.
    ///
    /// Non-finite or negative timings are counted as 0 ms so the average
    /// stays finite.
    pub fn record_completion(&mut self, config: SortConfiguration, elapsed_ms: f64) -> f64 {
        let elapsed_ms = if elapsed_ms.is_finite() && elapsed_ms > 0.0 {
            elapsed_ms
        } else {
            0.0
        };

        let entry = self.entries.entry(config).or_default();
        entry.sorts_completed += 1;
        entry.total_time_ms += elapsed_ms;

        let average = entry.average_ms();
        log::info!(
            "Sort {} completed in {:.3} ms (average {:.3} ms over {} runs)",
            config,
            elapsed_ms,
            average,
            entry.sorts_completed
        );
        average
    }

    /// Make sure `config` has an entry without counting a completion.
    pub fn register(&mut self, config: SortConfiguration) {
        self.entries.entry(config).or_default();
    }

    /// Average completion time for `config`, 0 when unknown.
    pub fn average(&self, config: SortConfiguration) -> f64 {
        self.entries
            .get(&config)
            .map(StatsEntry::average_ms)
            .unwrap_or(0.0)
    }

    pub fn get(&self, config: SortConfiguration) -> Option<&StatsEntry> {
        self.entries.get(&config)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Rows sorted by configuration.
    pub fn records(&self) -> Vec<StatsRecord> {
        let mut configs: Vec<&SortConfiguration> = self.entries.keys().collect();
        configs.sort();
        configs
            .into_iter()
            .map(|config| {
                let entry = &self.entries[config];
                StatsRecord {
                    total_elements: config.total_elements,
                    size_limit: config.size_limit,
                    sorts_completed: entry.sorts_completed,
                    total_time_ms: entry.total_time_ms,
                    average_sort_time_ms: entry.average_ms(),
                }
            })
            .collect()
    }

    /// Pretty JSON of [`records`](Self::records).
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self.records())
    }
}
