use serde::{Deserialize, Serialize};

/// Snapshot of batch counters published after every item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchProgress {
    pub processed: usize,
    pub succeeded: usize,
    pub total: usize,
    pub message: String,
}

impl BatchProgress {
    pub fn failed(&self) -> usize {
        self.processed - self.succeeded
    }

    /// Share of the snapshot already processed, 0..=100
    pub fn percent_done(&self) -> u32 {
        if self.total == 0 {
            return 100;
        }
        ((self.processed * 100) / self.total) as u32
    }
}

/// How a batch stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BatchOutcome {
    /// Every item in the snapshot received one attempt
    Completed,
    /// Stopped between items on request
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchSummary {
    pub outcome: BatchOutcome,
    pub processed: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub total: usize,
    pub message: String,
}
