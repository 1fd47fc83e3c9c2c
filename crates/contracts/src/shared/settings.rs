use serde::{Deserialize, Serialize};

/// One entry of the `appSettings` array kept in local storage
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct AppSetting {
    pub key: String,
    pub value: serde_json::Value,
}

pub const PAGE_SIZE_KEY: &str = "pageSize";
pub const BATCH_STEP_DELAY_KEY: &str = "batchStepDelayMs";
pub const CONFIRM_DELETES_KEY: &str = "confirmDeletes";

pub const DEFAULT_PAGE_SIZE: usize = 20;
pub const DEFAULT_BATCH_STEP_DELAY_MS: u32 = 50;

/// Ordered settings array with typed accessors.
///
/// Keys this client does not know are carried along untouched so that a
/// newer build's settings survive a round trip through an older one.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Default)]
#[serde(transparent)]
pub struct AppSettings(pub Vec<AppSetting>);

impl AppSettings {
    pub fn from_json(raw: &str) -> Result<Self, String> {
        serde_json::from_str(raw).map_err(|e| format!("Invalid settings: {}", e))
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(&self.0).unwrap_or_else(|_| "[]".to_string())
    }

    pub fn get(&self, key: &str) -> Option<&serde_json::Value> {
        self.0.iter().find(|s| s.key == key).map(|s| &s.value)
    }

    pub fn set(&mut self, key: &str, value: serde_json::Value) {
        match self.0.iter_mut().find(|s| s.key == key) {
            Some(entry) => entry.value = value,
            None => self.0.push(AppSetting {
                key: key.to_string(),
                value,
            }),
        }
    }

    pub fn page_size(&self) -> usize {
        self.get(PAGE_SIZE_KEY)
            .and_then(|v| v.as_u64())
            .filter(|v| *v > 0)
            .map(|v| v as usize)
            .unwrap_or(DEFAULT_PAGE_SIZE)
    }

    pub fn batch_step_delay_ms(&self) -> Option<u32> {
        self.get(BATCH_STEP_DELAY_KEY)
            .and_then(|v| v.as_u64())
            .and_then(|v| u32::try_from(v).ok())
    }

    pub fn confirm_deletes(&self) -> bool {
        self.get(CONFIRM_DELETES_KEY)
            .and_then(|v| v.as_bool())
            .unwrap_or(true)
    }
}
