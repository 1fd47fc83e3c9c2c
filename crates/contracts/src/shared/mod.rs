pub mod serde_helpers;
pub mod settings;
