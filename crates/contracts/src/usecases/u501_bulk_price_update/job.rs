use serde::{Deserialize, Serialize};

use super::progress::{BatchOutcome, BatchProgress, BatchSummary};
use crate::domain::a001_product::Product;

/// Price after applying `percent`, rounded to cents.
///
/// `percent = -100` yields exactly zero; anything lower is rejected by
/// [`PriceBatchJob`] before a price is ever computed.
pub fn compute_new_price(price: f64, percent: f64) -> f64 {
    let raw = price * (1.0 + percent / 100.0);
    let rounded = (raw * 100.0).round() / 100.0;
    if rounded <= 0.0 {
        0.0
    } else {
        rounded
    }
}

/// Part of a product captured when the batch is confirmed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceTarget {
    pub id: String,
    pub name: String,
    pub price: f64,
}

impl From<&Product> for PriceTarget {
    fn from(p: &Product) -> Self {
        Self {
            id: p.id.clone(),
            name: p.name.clone(),
            price: p.price,
        }
    }
}

/// The next remote mutation the batch wants to issue
#[derive(Debug, Clone, PartialEq)]
pub struct PriceUpdate {
    pub id: String,
    pub name: String,
    pub old_price: f64,
    pub new_price: f64,
}

/// State of one bulk price update over a fixed snapshot.
///
/// Counters only move forward through [`PriceBatchJob::record`], which keeps
/// `succeeded <= processed <= total` at every step.
#[derive(Debug, Clone)]
pub struct PriceBatchJob {
    snapshot: Vec<PriceTarget>,
    percent: f64,
    processed: usize,
    succeeded: usize,
    message: String,
}

impl PriceBatchJob {
    pub fn new(products: &[Product], percent: f64) -> Result<Self, String> {
        Self::from_targets(products.iter().map(PriceTarget::from).collect(), percent)
    }

    pub fn from_targets(snapshot: Vec<PriceTarget>, percent: f64) -> Result<Self, String> {
        if !percent.is_finite() {
            return Err("Percentage must be a number".into());
        }
        if percent < -100.0 {
            return Err("Percentage below -100 would make prices negative".into());
        }
        let message = format!("Ready to update {} products", snapshot.len());
        Ok(Self {
            snapshot,
            percent,
            processed: 0,
            succeeded: 0,
            message,
        })
    }

    pub fn total(&self) -> usize {
        self.snapshot.len()
    }

    pub fn processed(&self) -> usize {
        self.processed
    }

    pub fn succeeded(&self) -> usize {
        self.succeeded
    }

    pub fn percent(&self) -> f64 {
        self.percent
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn is_done(&self) -> bool {
        self.processed >= self.snapshot.len()
    }

    /// Update for the item under the cursor, `None` once the snapshot is exhausted
    pub fn next_update(&self) -> Option<PriceUpdate> {
        self.snapshot.get(self.processed).map(|target| PriceUpdate {
            id: target.id.clone(),
            name: target.name.clone(),
            old_price: target.price,
            new_price: compute_new_price(target.price, self.percent),
        })
    }

    /// Record the result for the item under the cursor and advance it
    pub fn record(&mut self, success: bool) -> BatchProgress {
        if !self.is_done() {
            if success {
                self.succeeded += 1;
            }
            self.processed += 1;
            self.message = format!(
                "{} of {} products ({} total)",
                self.succeeded,
                self.processed,
                self.total()
            );
        }
        self.progress()
    }

    pub fn progress(&self) -> BatchProgress {
        BatchProgress {
            processed: self.processed,
            succeeded: self.succeeded,
            total: self.total(),
            message: self.message.clone(),
        }
    }

    pub fn finish(mut self, outcome: BatchOutcome) -> BatchSummary {
        let failed = self.processed - self.succeeded;
        self.message = match outcome {
            BatchOutcome::Completed => format!(
                "Price update finished: {} of {} products updated, {} failed",
                self.succeeded,
                self.total(),
                failed
            ),
            BatchOutcome::Cancelled => format!(
                "Price update cancelled after {} of {} products: {} updated, {} failed",
                self.processed,
                self.total(),
                self.succeeded,
                failed
            ),
        };
        BatchSummary {
            outcome,
            processed: self.processed,
            succeeded: self.succeeded,
            failed,
            total: self.total(),
            message: self.message,
        }
    }
}
