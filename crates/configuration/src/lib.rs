use crate::error::ConfigError;
use std::path::Path;

// Declare the modules that make up this crate.
pub mod error;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use settings::{
    AnalysisConfig, DataParams, OutlierParams, OutputFormat, RiskParams, RollingParams, SeasonalParams,
};

/// Loads the analysis parameters.
///
/// Sources are layered in order: built-in defaults, then the optional TOML file,
/// then `EDA_*` environment variables (nested keys separated by `__`, e.g.
/// `EDA_ROLLING__WINDOW=20`). The merged result is validated before it is returned.
pub fn load_config(path: Option<&Path>) -> Result<AnalysisConfig, ConfigError> {
    load_layered(path, environment())
}

fn environment() -> config::Environment {
    config::Environment::with_prefix("EDA")
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
}

fn load_layered(
    path: Option<&Path>,
    environment: config::Environment,
) -> Result<AnalysisConfig, ConfigError> {
    let mut builder = config::Config::builder();

    if let Some(path) = path {
        tracing::debug!(path = %path.display(), "Loading configuration file.");
        builder = builder.add_source(config::File::from(path));
    }

    let settings = builder.add_source(environment).build()?;

    // Attempt to deserialize the merged sources into our `AnalysisConfig` struct
    let config = settings.try_deserialize::<AnalysisConfig>()?;
    config.validate().map_err(ConfigError::InvalidParameters)?;

    Ok(config)
}
