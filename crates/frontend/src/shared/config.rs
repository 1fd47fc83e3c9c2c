use once_cell::sync::Lazy;
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct Config {
    pub api: ApiConfig,
    pub batch: BatchConfig,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct ApiConfig {
    /// Empty means "same host as the page, port 3000"
    #[serde(default)]
    pub base_url: String,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct BatchConfig {
    /// Pause between two price updates so the status line can repaint
    pub step_delay_ms: u32,
}

/// Default configuration embedded in the bundle
const DEFAULT_CONFIG: &str = r#"
[api]
base_url = ""

[batch]
step_delay_ms = 50
"#;

pub fn parse_config(raw: &str) -> Result<Config, toml::de::Error> {
    toml::from_str(raw)
}

/// Load configuration.
///
/// The API base can be pinned at build time with `ADMIN_API_BASE`.
pub fn load_config() -> Result<Config, toml::de::Error> {
    let mut config = parse_config(DEFAULT_CONFIG)?;
    if let Some(base) = option_env!("ADMIN_API_BASE") {
        config.api.base_url = base.trim_end_matches('/').to_string();
    }
    Ok(config)
}

static CONFIG: Lazy<Config> = Lazy::new(|| match load_config() {
    Ok(config) => {
        log::info!("Loaded configuration: {:?}", config);
        config
    }
    Err(e) => {
        log::error!("Embedded configuration is invalid: {}", e);
        Config {
            api: ApiConfig {
                base_url: String::new(),
            },
            batch: BatchConfig { step_delay_ms: 50 },
        }
    }
});

pub fn config() -> &'static Config {
    &CONFIG
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_loads() {
        let config = parse_config(DEFAULT_CONFIG).unwrap();
        assert_eq!(config.batch.step_delay_ms, 50);
        assert!(config.api.base_url.is_empty());
    }

    #[test]
    fn test_base_url_is_optional() {
        let config = parse_config("[api]\n[batch]\nstep_delay_ms = 10\n").unwrap();
        assert_eq!(config.api.base_url, "");
        assert_eq!(config.batch.step_delay_ms, 10);
    }

    #[test]
    fn test_missing_batch_section_is_an_error() {
        assert!(parse_config("[api]\nbase_url = \"http://x\"\n").is_err());
    }
}
