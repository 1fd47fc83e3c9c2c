pub mod job;
pub mod progress;
pub mod request;

pub use job::{compute_new_price, PriceBatchJob, PriceTarget, PriceUpdate};
pub use progress::{BatchOutcome, BatchProgress, BatchSummary};
pub use request::{parse_percent_input, PERCENT_MAX, PERCENT_MIN};

use crate::usecases::common::UseCaseMetadata;

pub struct BulkPriceUpdate;

impl UseCaseMetadata for BulkPriceUpdate {
    fn usecase_index() -> &'static str {
        "u501"
    }

    fn usecase_name() -> &'static str {
        "bulk_price_update"
    }

    fn display_name() -> &'static str {
        "Bulk price update"
    }

    fn description() -> &'static str {
        "Applies one percentage change to the price of every product, one product at a time"
    }
}
