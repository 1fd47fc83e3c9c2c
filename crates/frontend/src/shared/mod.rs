pub mod api_client;
pub mod api_utils;
pub mod config;
pub mod date_utils;
pub mod list_utils;
pub mod settings_store;
pub mod storage;
