use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context as _;
use env_flags::env_flags;
use modelswitch_config::Config;
use serde_json::{Map, Value, json};

fn init_tracing(config_level: &str) {
    env_flags! {
        /// Tracing filter, e.g. "info", "debug", or targets format.
        RUST_LOG: &str = "info";
        /// Preferred filter env (alias). If set, overrides RUST_LOG.
        TRACING_FILTER: &str = "";
        /// JSON formatting for logs
        TRACING_JSON: bool = false;
        /// Compact single-line formatting for logs (ignored if TRACING_JSON=true)
        TRACING_COMPACT: bool = true;
    }

    use tracing_subscriber::{EnvFilter, prelude::*};

    let env_set = |k: &str| std::env::var_os(k).is_some();

    // TRACING_FILTER first, then RUST_LOG, then the config's logLevel.
    let level = if !(*TRACING_FILTER).is_empty() {
        (*TRACING_FILTER).to_string()
    } else if env_set("RUST_LOG") {
        (*RUST_LOG).to_string()
    } else {
        config_level.to_string()
    };
    let filter = EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("info"));

    let base = tracing_subscriber::fmt::layer()
        .with_file(false)
        .with_line_number(false)
        .with_target(true)
        // stdout carries the JSON result
        .with_writer(std::io::stderr);
    let reg = tracing_subscriber::registry().with(filter);
    let result = if *TRACING_JSON {
        reg.with(base.json()).try_init()
    } else if *TRACING_COMPACT {
        reg.with(base.compact()).try_init()
    } else {
        reg.with(base).try_init()
    };
    if let Err(e) = result {
        tracing::debug!("tracing already set: {:?}", e);
    }
}

fn main() -> anyhow::Result<ExitCode> {
    env_flags! {
        /// Path to the YAML model configuration.
        MODELSWITCH_CONFIG: &str = "config.yaml";
        /// Resolve only this model (id or alias). Empty resolves every model.
        MODELSWITCH_MODEL: &str = "";
    }

    let path = PathBuf::from(*MODELSWITCH_CONFIG);
    let cfg = Config::load_from_file(&path)
        .with_context(|| format!("failed to load config {}", path.display()))?;
    init_tracing(&cfg.log_level);
    tracing::info!(
        "loaded {} (models={}, macros={}, startPort={})",
        path.display(),
        cfg.models.len(),
        cfg.macros.len(),
        cfg.start_port
    );

    let results = if (*MODELSWITCH_MODEL).is_empty() {
        cfg.resolve_all()
    } else {
        let requested = *MODELSWITCH_MODEL;
        let id = cfg
            .real_model_name(requested)
            .with_context(|| format!("no model or alias named '{}'", requested))?;
        vec![(id.to_string(), cfg.resolve_model(id))]
    };

    let mut out = Map::new();
    let mut failed = 0usize;
    for (id, result) in results {
        match result {
            Ok(resolved) => {
                tracing::debug!("resolved '{}' (remote={})", id, resolved.is_remote);
                out.insert(id, serde_json::to_value(&resolved)?);
            }
            Err(e) => {
                tracing::error!("model '{}' failed to resolve: {}", id, e);
                failed += 1;
                out.insert(id, json!({ "error": e.to_string() }));
            }
        }
    }
    println!("{}", serde_json::to_string_pretty(&Value::Object(out))?);

    if failed > 0 {
        tracing::warn!("{} model(s) failed to resolve", failed);
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}
