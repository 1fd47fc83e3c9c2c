use std::sync::Arc;

use contracts::shared::settings::AppSettings;
use leptos::prelude::*;

use crate::shared::config::config;
use crate::shared::storage::KeyValueStore;

pub const SETTINGS_KEY: &str = "appSettings";

/// User settings, persisted as a JSON array under `appSettings`
#[derive(Clone)]
pub struct SettingsStore {
    settings: ArcRwSignal<AppSettings>,
    storage: Arc<dyn KeyValueStore>,
}

impl SettingsStore {
    pub fn load(storage: Arc<dyn KeyValueStore>) -> Self {
        let settings = match storage.get(SETTINGS_KEY) {
            Some(raw) => AppSettings::from_json(&raw).unwrap_or_else(|e| {
                log::warn!("Ignoring stored settings: {}", e);
                AppSettings::default()
            }),
            None => AppSettings::default(),
        };
        Self {
            settings: ArcRwSignal::new(settings),
            storage,
        }
    }

    pub fn snapshot(&self) -> AppSettings {
        self.settings.get_untracked()
    }

    /// Apply `f` and persist the result
    pub fn update(&self, f: impl FnOnce(&mut AppSettings)) {
        self.settings.update(f);
        let json = self.settings.with_untracked(|s| s.to_json());
        self.storage.set(SETTINGS_KEY, &json);
    }

    pub fn page_size(&self) -> usize {
        self.settings.with(|s| s.page_size())
    }

    pub fn confirm_deletes(&self) -> bool {
        self.settings.with_untracked(|s| s.confirm_deletes())
    }

    /// Delay between batch steps; the user setting wins over the config
    pub fn batch_step_delay_ms(&self) -> u32 {
        self.settings
            .with_untracked(|s| s.batch_step_delay_ms())
            .unwrap_or(config().batch.step_delay_ms)
    }
}

pub fn use_settings() -> SettingsStore {
    use_context::<SettingsStore>().expect("SettingsStore not found in component tree")
}
