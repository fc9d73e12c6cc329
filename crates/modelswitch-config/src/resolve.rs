//! Per-model resolution: macro expansion, port assignment, and the resolved
//! record handed to the router.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::config::{Config, Filters, ModelEntry};
use crate::error::ConfigError;
use crate::macros::{MacroScope, MacroTable, PORT_MACRO, references};

/// Proxy target used when a spawned model does not name one.
pub const DEFAULT_LOCAL_PROXY: &str = "http://localhost:${PORT}";

/// Fully derived view of one model. Built fresh on every call; never cached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedModel {
    pub id: String,
    /// Launch arguments; `None` when the proxy does not spawn this model.
    pub argv: Option<Vec<String>>,
    pub stop_argv: Option<Vec<String>>,
    pub proxy: String,
    pub port: Option<u16>,
    pub strip_params: Vec<String>,
    pub send_loading_state: bool,
    pub is_remote: bool,
    pub aliases: Vec<String>,
    pub env: Vec<String>,
    pub check_endpoint: String,
    pub ttl: u64,
    pub unlisted: bool,
    pub use_model_name: Option<String>,
}

impl ModelEntry {
    fn effective_proxy(&self) -> &str {
        if self.proxy.trim().is_empty() && self.has_cmd() {
            DEFAULT_LOCAL_PROXY
        } else {
            &self.proxy
        }
    }

    /// Checked after user macros are expanded, since a macro value may
    /// carry `${PORT}`.
    fn wants_port(&self, macros: &MacroTable) -> bool {
        references(&macros.expand(&self.cmd), PORT_MACRO)
            || references(&macros.expand(self.effective_proxy()), PORT_MACRO)
    }

    /// Per-model override if set, otherwise the global default.
    pub fn send_loading_state_or(&self, global: bool) -> bool {
        self.send_loading_state.unwrap_or(global)
    }

    fn expand(&self, scope: &MacroScope<'_>) -> ModelEntry {
        let strip_params = match (&self.filters.strip_params, &self.filters.legacy_strip_params) {
            (None, None) => None,
            _ => Some(scope.expand(self.filters.raw_strip_params())),
        };
        ModelEntry {
            cmd: scope.expand(&self.cmd),
            cmd_stop: scope.expand(&self.cmd_stop),
            proxy: scope.expand(self.effective_proxy()),
            env: self.env.iter().map(|e| scope.expand(e)).collect(),
            filters: Filters {
                strip_params,
                legacy_strip_params: None,
            },
            ..self.clone()
        }
    }
}

impl Config {
    /// Ports for every model that references `${PORT}`, handed out from
    /// `startPort` upward in model id order.
    pub fn assign_ports(&self) -> Result<BTreeMap<&str, u16>, ConfigError> {
        let mut ports = BTreeMap::new();
        let mut next = u32::from(self.start_port);
        for (id, model) in &self.models {
            if !model.wants_port(&self.macros) {
                continue;
            }
            let port =
                u16::try_from(next).map_err(|_| ConfigError::PortExhausted(id.clone()))?;
            tracing::debug!("assigned port {} to model '{}'", port, id);
            ports.insert(id.as_str(), port);
            next += 1;
        }
        Ok(ports)
    }

    /// Effective loading-state flag for a model, or `None` for unknown ids.
    pub fn send_loading_state_for(&self, id: &str) -> Option<bool> {
        self.models
            .get(id)
            .map(|m| m.send_loading_state_or(self.send_loading_state))
    }

    /// Copy of a model entry with every macro expanded, the default proxy
    /// filled in, and a legacy strip-params value moved to `stripParams`.
    pub fn expanded_model(&self, id: &str) -> Result<ModelEntry, ConfigError> {
        let ports = self.assign_ports()?;
        self.expanded_with_ports(id, &ports)
    }

    fn expanded_with_ports(
        &self,
        id: &str,
        ports: &BTreeMap<&str, u16>,
    ) -> Result<ModelEntry, ConfigError> {
        let (id, model) = self
            .models
            .get_key_value(id)
            .ok_or_else(|| ConfigError::UnknownModel(id.to_string()))?;
        let scope = MacroScope::new(&self.macros)
            .with_model_id(id)
            .with_port(ports.get(id.as_str()).copied());
        Ok(model.expand(&scope))
    }

    pub fn resolve_model(&self, id: &str) -> Result<ResolvedModel, ConfigError> {
        let ports = self.assign_ports()?;
        self.resolve_with_ports(id, &ports)
    }

    /// Resolve every model. A failing model does not affect the others.
    pub fn resolve_all(&self) -> Vec<(String, Result<ResolvedModel, ConfigError>)> {
        match self.assign_ports() {
            Ok(ports) => self
                .models
                .keys()
                .map(|id| (id.clone(), self.resolve_with_ports(id, &ports)))
                .collect(),
            Err(_) => self
                .models
                .keys()
                .map(|id| (id.clone(), self.resolve_model(id)))
                .collect(),
        }
    }

    fn resolve_with_ports(
        &self,
        id: &str,
        ports: &BTreeMap<&str, u16>,
    ) -> Result<ResolvedModel, ConfigError> {
        let model = self.expanded_with_ports(id, ports)?;
        let argv = if model.has_cmd() {
            Some(model.sanitized_command()?)
        } else {
            None
        };
        Ok(ResolvedModel {
            id: id.to_string(),
            argv,
            stop_argv: model.sanitized_stop_command()?,
            strip_params: model.filters.sanitized_strip_params()?,
            send_loading_state: model.send_loading_state_or(self.send_loading_state),
            is_remote: model.is_remote_model(),
            port: ports.get(id).copied(),
            use_model_name: Some(model.use_model_name.clone()).filter(|n| !n.is_empty()),
            proxy: model.proxy,
            aliases: model.aliases,
            env: model.env,
            check_endpoint: model.check_endpoint,
            ttl: model.ttl,
            unlisted: model.unlisted,
        })
    }
}
