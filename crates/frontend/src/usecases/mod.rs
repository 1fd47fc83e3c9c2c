pub mod u501_bulk_price_update;
