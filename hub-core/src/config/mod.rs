use config::{Config, ConfigError, Environment, File};
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};

/// Load settings from `<config_dir>/base.yaml`, overridden by environment
/// variables such as `APP_BACKEND__URL` for `prefix = "APP"`.
///
/// A `.env` file in the working directory is read first when present.
pub fn load_layered<T: DeserializeOwned>(config_dir: &Path, prefix: &str) -> Result<T, ConfigError> {
    dotenvy::dotenv().ok();

    let settings = Config::builder()
        .add_source(File::from(config_dir.join("base.yaml")).required(true))
        .add_source(
            Environment::with_prefix(prefix)
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?;

    settings.try_deserialize::<T>()
}

/// Resolve a crate's `config` directory whether the process runs from the
/// workspace root or from the crate directory itself.
pub fn config_dir_for(crate_dir_name: &str) -> Result<PathBuf, ConfigError> {
    let base_path = std::env::current_dir()
        .map_err(|e| ConfigError::Message(format!("Failed to determine the current directory: {e}")))?;

    if base_path.ends_with(crate_dir_name) {
        Ok(base_path.join("config"))
    } else {
        Ok(base_path.join(crate_dir_name).join("config"))
    }
}
