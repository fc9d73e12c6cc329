//! Error types surfaced by loading and resolution.

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid command {command:?}: {source}")]
    InvalidCommand {
        command: String,
        #[source]
        source: shell_words::ParseError,
    },

    #[error("command {command:?} contains no executable")]
    EmptyCommand { command: String },

    #[error("invalid macro name '{0}': only letters, digits, '_' and '-' are allowed")]
    InvalidMacroName(String),

    #[error("macro '{0}' is reserved and cannot be redefined")]
    ReservedMacro(String),

    #[error("alias '{alias}' is used by both '{first}' and '{second}'")]
    DuplicateAlias {
        alias: String,
        first: String,
        second: String,
    },

    #[error("alias '{alias}' of model '{model}' collides with an existing model id")]
    AliasShadowsModel { alias: String, model: String },

    #[error("model '{model}' has invalid env entry {entry:?}: expected KEY=VALUE")]
    InvalidEnv { model: String, entry: String },

    #[error("ran out of ports assigning ${{PORT}} to model '{0}'")]
    PortExhausted(String),

    #[error("unknown model '{0}'")]
    UnknownModel(String),
}
