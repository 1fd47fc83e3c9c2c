use std::sync::Arc;

use leptos::prelude::*;

use crate::routes::routes::AppRoutes;
use crate::shared::api_client::ApiClient;
use crate::shared::api_utils::api_base;
use crate::shared::settings_store::SettingsStore;
use crate::shared::storage::{KeyValueStore, LocalStorage};
use crate::system::auth::session::SessionStore;

#[component]
pub fn App() -> impl IntoView {
    let storage: Arc<dyn KeyValueStore> = Arc::new(LocalStorage);

    // Stored credentials are checked once, before anything renders
    let session = SessionStore::restore(storage.clone(), chrono::Utc::now().timestamp());
    let settings = SettingsStore::load(storage);
    let client = ApiClient::new(api_base(), session.clone());
    log::debug!("API base: {}", client.url(""));

    provide_context(session);
    provide_context(settings);
    provide_context(client);

    view! {
        <AppRoutes />
    }
}
