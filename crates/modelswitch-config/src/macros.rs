//! `${name}` placeholder substitution.
//!
//! User macros are substituted in a single, non-recursive pass: their values
//! are never rescanned for other user macros. Built-ins (`${PORT}`,
//! `${MODEL_ID}`) are substituted afterwards, so a user macro value may carry
//! them. Placeholders with no value are left exactly as written.

use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Built-in macro that expands to the port assigned to a model.
pub const PORT_MACRO: &str = "PORT";
/// Built-in macro that expands to the id of the model being resolved.
pub const MODEL_ID_MACRO: &str = "MODEL_ID";

static PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$\{([A-Za-z0-9_-]+)\}").expect("placeholder regex"));
static MACRO_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_-]+$").expect("macro name regex"));

/// User-defined macros from the root `macros:` key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MacroTable(BTreeMap<String, String>);

impl MacroTable {
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Expand user macros only. Built-ins and unknown names are left as-is.
    pub fn expand(&self, input: &str) -> String {
        replace_placeholders(input, |name| self.get(name).map(str::to_string))
    }

    /// Reject names the placeholder syntax could never reference, and names
    /// that would shadow a built-in.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for name in self.0.keys() {
            if !MACRO_NAME.is_match(name) {
                return Err(ConfigError::InvalidMacroName(name.clone()));
            }
            if name == PORT_MACRO || name == MODEL_ID_MACRO {
                return Err(ConfigError::ReservedMacro(name.clone()));
            }
        }
        Ok(())
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for MacroTable {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

fn replace_placeholders(input: &str, lookup: impl Fn(&str) -> Option<String>) -> String {
    if !input.contains("${") {
        return input.to_string();
    }
    PLACEHOLDER
        .replace_all(input, |caps: &Captures| {
            lookup(&caps[1]).unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

/// Whether `input` contains a `${name}` placeholder.
pub fn references(input: &str, name: &str) -> bool {
    PLACEHOLDER
        .captures_iter(input)
        .any(|caps| &caps[1] == name)
}

/// Macro lookup context for one model: the shared table plus the built-ins.
#[derive(Debug, Clone, Copy)]
pub struct MacroScope<'a> {
    table: &'a MacroTable,
    model_id: Option<&'a str>,
    port: Option<u16>,
}

impl<'a> MacroScope<'a> {
    pub fn new(table: &'a MacroTable) -> Self {
        Self {
            table,
            model_id: None,
            port: None,
        }
    }

    pub fn with_model_id(mut self, model_id: &'a str) -> Self {
        self.model_id = Some(model_id);
        self
    }

    pub fn with_port(mut self, port: Option<u16>) -> Self {
        self.port = port;
        self
    }

    fn builtin(&self, name: &str) -> Option<String> {
        match name {
            MODEL_ID_MACRO => self.model_id.map(str::to_string),
            PORT_MACRO => self.port.map(|p| p.to_string()),
            _ => None,
        }
    }

    /// User macros first, then built-ins over the result.
    pub fn expand(&self, input: &str) -> String {
        let user = self.table.expand(input);
        replace_placeholders(&user, |name| {
            let value = self.builtin(name);
            if value.is_none() {
                tracing::warn!("macro '{}' is not defined; leaving it as-is", name);
            }
            value
        })
    }
}
