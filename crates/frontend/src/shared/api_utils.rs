//! API utilities for frontend-backend communication

use crate::shared::config::config;

/// Get the base URL for API requests
///
/// Uses the configured base when one is set, otherwise the current window
/// location with port 3000 for the backend server.
///
/// # Returns
/// - API base URL like "http://localhost:3000" or "https://example.com:3000"
/// - Empty string if window is not available
pub fn api_base() -> String {
    let configured = &config().api.base_url;
    if !configured.is_empty() {
        return configured.clone();
    }
    let window = match web_sys::window() {
        Some(w) => w,
        None => return String::new(),
    };
    let location = window.location();
    let protocol = location.protocol().unwrap_or_else(|_| "http:".to_string());
    let hostname = location
        .hostname()
        .unwrap_or_else(|_| "127.0.0.1".to_string());
    format!("{}//{}:3000", protocol, hostname)
}

/// Join a base URL and a path without doubling or dropping the slash
pub fn join_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

/// Path segment for an entity id
pub fn id_segment(id: &str) -> String {
    urlencoding::encode(id).into_owned()
}
