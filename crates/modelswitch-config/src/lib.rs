//! Model configuration core for a model-routing proxy.
//!
//! A YAML document lists named model backends. Each backend either has a
//! launch command (the proxy spawns it) or only a proxy target (someone else
//! runs it). This crate turns that document into resolved, ready-to-use
//! records: macros expanded, commands tokenized, strip-param filters cleaned,
//! and each model classified as local or remote.
//!
//! ```text
//! YAML → Config (validated, immutable)
//!      → MacroScope (table + ${MODEL_ID}/${PORT})
//!      → command / filters / remote
//!      → ResolvedModel (handed to the router)
//! ```

pub mod command;
pub mod config;
pub mod error;
pub mod filters;
pub mod macros;
pub mod remote;
pub mod resolve;

pub use command::sanitize_command;
pub use config::{Config, Filters, ModelEntry};
pub use error::ConfigError;
pub use macros::{MacroScope, MacroTable};
pub use remote::is_loopback_proxy;
pub use resolve::ResolvedModel;
