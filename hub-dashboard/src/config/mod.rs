use secrecy::Secret;
use serde::Deserialize;
use std::time::Duration;

#[derive(Deserialize, Clone)]
pub struct Settings {
    pub backend: BackendSettings,
    #[serde(default)]
    pub auth: AuthSettings,
    #[serde(default)]
    pub dashboard: DashboardSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Deserialize, Clone)]
pub struct BackendSettings {
    /// Base URL of the REST backend (e.g. http://localhost:5000).
    pub url: String,
    /// Per-request timeout enforced by the HTTP client.
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
}

impl BackendSettings {
    /// Never zero; a zero timeout would fail every request immediately.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms.max(1))
    }
}

/// The session credential is owned outside this crate (login flow); it is
/// only read here and handed to the controller at construction.
#[derive(Deserialize, Clone, Default)]
pub struct AuthSettings {
    #[serde(default)]
    pub token: Option<Secret<String>>,
}

#[derive(Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct DashboardSettings {
    #[serde(default = "default_limit")]
    pub default_limit: u32,
    /// Quiet period after the last keystroke before a search fetch is issued.
    #[serde(default = "default_search_debounce_ms")]
    pub search_debounce_ms: u64,
    /// Documents sampled to build the tag filter list.
    #[serde(default = "default_tag_sample_limit")]
    pub tag_sample_limit: u32,
    /// Page-number buttons rendered at once.
    #[serde(default = "default_page_window")]
    pub page_window: u32,
    /// Upper bound on any single fetch issued by the controller.
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
}

impl DashboardSettings {
    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms)
    }

    /// Never zero; see [`BackendSettings::request_timeout`].
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms.max(1))
    }
}

impl Default for DashboardSettings {
    fn default() -> Self {
        Self {
            default_limit: default_limit(),
            search_debounce_ms: default_search_debounce_ms(),
            tag_sample_limit: default_tag_sample_limit(),
            page_window: default_page_window(),
            request_timeout_ms: default_request_timeout_ms(),
        }
    }
}

#[derive(Deserialize, Clone, Debug)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

fn default_limit() -> u32 {
    5
}

fn default_search_debounce_ms() -> u64 {
    500
}

fn default_tag_sample_limit() -> u32 {
    100
}

fn default_page_window() -> u32 {
    5
}

fn default_request_timeout_ms() -> u64 {
    15_000
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Settings {
    /// Reject values that load fine but cannot work at runtime.
    pub fn validate(&self) -> Result<(), config::ConfigError> {
        if self.backend.request_timeout_ms == 0 {
            return Err(config::ConfigError::Message(
                "backend.request_timeout_ms must be greater than 0".to_string(),
            ));
        }
        if self.dashboard.request_timeout_ms == 0 {
            return Err(config::ConfigError::Message(
                "dashboard.request_timeout_ms must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}

pub fn get_configuration() -> Result<Settings, config::ConfigError> {
    let configuration_directory = hub_core::config::config_dir_for("hub-dashboard")?;
    let settings: Settings = hub_core::config::load_layered(&configuration_directory, "APP")?;
    settings.validate()?;
    Ok(settings)
}
