pub mod runner;
pub mod view;

pub use view::BulkPriceUpdatePanel;
