//! YAML loading and load-time validation.

use std::collections::HashMap;
use std::path::Path;

use super::types::{Config, MIN_HEALTH_CHECK_TIMEOUT_SECS};
use crate::error::ConfigError;

impl Config {
    /// Parse and validate a configuration document.
    pub fn from_yaml_str(s: &str) -> Result<Self, ConfigError> {
        let mut cfg: Config = serde_yaml::from_str(s)?;
        cfg.normalize();
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&content)
    }

    /// Model id for `name`, which may be an id or one of a model's aliases.
    pub fn real_model_name(&self, name: &str) -> Option<&str> {
        if let Some((id, _)) = self.models.get_key_value(name) {
            return Some(id.as_str());
        }
        self.models
            .iter()
            .find(|(_, m)| m.aliases.iter().any(|a| a == name))
            .map(|(id, _)| id.as_str())
    }

    fn normalize(&mut self) {
        if self.health_check_timeout < MIN_HEALTH_CHECK_TIMEOUT_SECS {
            tracing::debug!(
                "healthCheckTimeout {}s raised to minimum {}s",
                self.health_check_timeout,
                MIN_HEALTH_CHECK_TIMEOUT_SECS
            );
            self.health_check_timeout = MIN_HEALTH_CHECK_TIMEOUT_SECS;
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        self.macros.validate()?;

        let mut alias_owner: HashMap<&str, &str> = HashMap::new();
        for (id, model) in &self.models {
            for alias in &model.aliases {
                if alias != id && self.models.contains_key(alias) {
                    return Err(ConfigError::AliasShadowsModel {
                        alias: alias.clone(),
                        model: id.clone(),
                    });
                }
                if let Some(first) = alias_owner.insert(alias.as_str(), id.as_str())
                    && first != id.as_str()
                {
                    return Err(ConfigError::DuplicateAlias {
                        alias: alias.clone(),
                        first: first.to_string(),
                        second: id.clone(),
                    });
                }
            }
            for entry in &model.env {
                match entry.split_once('=') {
                    Some((key, _)) if !key.trim().is_empty() => {}
                    _ => {
                        return Err(ConfigError::InvalidEnv {
                            model: id.clone(),
                            entry: entry.clone(),
                        });
                    }
                }
            }
        }

        // surfaces port exhaustion at load rather than at first resolve
        self.assign_ports()?;
        Ok(())
    }
}
