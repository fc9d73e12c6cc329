use std::collections::BTreeMap;

use serde::Deserialize;

use crate::macros::MacroTable;

pub const DEFAULT_START_PORT: u16 = 5800;
pub const DEFAULT_HEALTH_CHECK_TIMEOUT_SECS: u64 = 120;
pub const MIN_HEALTH_CHECK_TIMEOUT_SECS: u64 = 15;
pub const DEFAULT_CHECK_ENDPOINT: &str = "/health";

/// Root of the configuration document.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Config {
    /// Shared `${name}` replacements available to every model.
    pub macros: MacroTable,
    /// Model id → backend definition, iterated in id order.
    pub models: BTreeMap<String, ModelEntry>,
    /// Global default for streaming loading-state notifications.
    pub send_loading_state: bool,
    /// First port handed out for `${PORT}`.
    pub start_port: u16,
    /// Seconds to wait for a spawned backend to become healthy.
    pub health_check_timeout: u64,
    /// Default tracing filter for the CLI.
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            macros: MacroTable::default(),
            models: BTreeMap::new(),
            send_loading_state: false,
            start_port: DEFAULT_START_PORT,
            health_check_timeout: DEFAULT_HEALTH_CHECK_TIMEOUT_SECS,
            log_level: "info".to_string(),
        }
    }
}

/// One backend definition under `models:`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ModelEntry {
    /// Launch command; empty for backends the proxy does not spawn.
    pub cmd: String,
    /// Optional command used to stop the backend instead of a signal.
    pub cmd_stop: String,
    /// Upstream URL requests are forwarded to.
    pub proxy: String,
    /// Extra names the router accepts for this model.
    pub aliases: Vec<String>,
    /// `KEY=VALUE` pairs for the spawned process.
    pub env: Vec<String>,
    /// Health probe path; `none` disables probing.
    pub check_endpoint: String,
    /// Idle seconds before unloading; 0 keeps the backend loaded.
    pub ttl: u64,
    /// Hide from model listings.
    pub unlisted: bool,
    /// Model name forwarded upstream instead of the id.
    pub use_model_name: String,
    pub filters: Filters,
    /// Per-model override; `None` inherits the global default.
    pub send_loading_state: Option<bool>,
}

impl Default for ModelEntry {
    fn default() -> Self {
        Self {
            cmd: String::new(),
            cmd_stop: String::new(),
            proxy: String::new(),
            aliases: Vec::new(),
            env: Vec::new(),
            check_endpoint: DEFAULT_CHECK_ENDPOINT.to_string(),
            ttl: 0,
            unlisted: false,
            use_model_name: String::new(),
            filters: Filters::default(),
            send_loading_state: None,
        }
    }
}

/// Request filtering rules for a model.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Filters {
    #[serde(default, rename = "stripParams")]
    pub strip_params: Option<String>,
    /// Older spelling, read only when `stripParams` is absent.
    #[serde(default, rename = "strip_params")]
    pub legacy_strip_params: Option<String>,
}
