use leptos::prelude::*;

use super::session::SessionStore;
use crate::shared::api_client::ApiClient;

/// Hook to access the session
pub fn use_session() -> SessionStore {
    use_context::<SessionStore>().expect("SessionStore not found in component tree")
}

/// Hook to access the REST client
pub fn use_api() -> ApiClient {
    use_context::<ApiClient>().expect("ApiClient not found in component tree")
}

/// Helper: Perform logout
pub fn do_logout(session: &SessionStore) {
    log::info!("User {} logged out", session.user_id().unwrap_or_default());
    session.logout();
}
