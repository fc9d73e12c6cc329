//! Strip-params directive cleanup.

use std::collections::BTreeSet;

use crate::config::Filters;
use crate::error::ConfigError;

/// Parameters that can never be stripped. The router reads `model` to pick a
/// backend.
pub const PROTECTED_PARAMS: &[&str] = &["model"];

/// Split on commas, trim, drop empties and protected names, dedupe, sort.
pub fn clean_param_list(resolved: &str) -> Vec<String> {
    resolved
        .split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty() && !PROTECTED_PARAMS.contains(p))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}

impl Filters {
    /// The raw directive, preferring `stripParams` over the legacy
    /// `strip_params` spelling.
    pub fn raw_strip_params(&self) -> &str {
        match (&self.strip_params, &self.legacy_strip_params) {
            (Some(canonical), _) => canonical.as_str(),
            (None, Some(legacy)) => {
                tracing::debug!("using legacy filters.strip_params field");
                legacy.as_str()
            }
            (None, None) => "",
        }
    }

    /// Cleaned list of request parameters to strip. Expects macros to have
    /// been expanded already (see `Config::expanded_model`).
    pub fn sanitized_strip_params(&self) -> Result<Vec<String>, ConfigError> {
        Ok(clean_param_list(self.raw_strip_params()))
    }
}
