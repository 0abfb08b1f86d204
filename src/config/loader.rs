// Configuration loader
// Merges ~/.prodscribe/config.toml with environment variables.

use anyhow::{Context, Result};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use super::settings::{FileSettings, Settings};

const ENV_PROJECT: &str = "GOOGLE_CLOUD_PROJECT";
const ENV_LOCATION: &str = "GOOGLE_CLOUD_LOCATION";
const ENV_BUCKET: &str = "GOOGLE_CLOUD_STORAGE_BUCKET";
const ENV_STAGING_BUCKET: &str = "STAGING_BUCKET";
const ENV_MODEL: &str = "MODEL";
const ENV_DATASET_ID: &str = "DATASET_ID";
const ENV_TABLE_ID: &str = "TABLE_ID";
const ENV_DISABLE_WEB_DRIVER: &str = "DISABLE_WEB_DRIVER";
const ENV_API_KEY: &str = "GEMINI_API_KEY";
const ENV_API_KEY_FALLBACK: &str = "GOOGLE_API_KEY";

/// Load settings from the config file (if present) and the process
/// environment. Command-line overrides are applied by the caller afterwards.
pub fn load_settings() -> Result<Settings> {
    let file = match config_file_path() {
        Some(path) if path.exists() => Some(read_config_file(&path)?),
        _ => None,
    };
    let env: HashMap<String, String> = std::env::vars().collect();
    Ok(merge(file, &env))
}

fn config_file_path() -> Option<std::path::PathBuf> {
    dirs::home_dir().map(|home| home.join(".prodscribe/config.toml"))
}

fn read_config_file(path: &Path) -> Result<FileSettings> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;
    toml::from_str(&contents)
        .with_context(|| format!("Failed to parse config file {}", path.display()))
}

/// Pure merge of file and environment sources, in that precedence order.
fn merge(file: Option<FileSettings>, env: &HashMap<String, String>) -> Settings {
    let file = file.unwrap_or_default();
    let defaults = Settings::default();

    let env_get = |key: &str| env.get(key).filter(|v| !v.is_empty()).cloned();

    Settings {
        project: file.project.or_else(|| env_get(ENV_PROJECT)),
        location: file
            .location
            .or_else(|| env_get(ENV_LOCATION))
            .unwrap_or(defaults.location),
        bucket: file
            .bucket
            .or_else(|| env_get(ENV_BUCKET))
            .or_else(|| env_get(ENV_STAGING_BUCKET)),
        model: file
            .model
            .or_else(|| env_get(ENV_MODEL))
            .unwrap_or(defaults.model),
        dataset_id: file
            .dataset_id
            .or_else(|| env_get(ENV_DATASET_ID))
            .unwrap_or(defaults.dataset_id),
        table_id: file
            .table_id
            .or_else(|| env_get(ENV_TABLE_ID))
            .unwrap_or(defaults.table_id),
        disable_web_driver: file.disable_web_driver.unwrap_or_else(|| {
            env_get(ENV_DISABLE_WEB_DRIVER)
                .map(|v| truthy(&v))
                .unwrap_or(false)
        }),
        api_key: file
            .api_key
            .or_else(|| env_get(ENV_API_KEY))
            .or_else(|| env_get(ENV_API_KEY_FALLBACK)),
    }
}

fn truthy(value: &str) -> bool {
    matches!(value.trim(), "1" | "true" | "TRUE" | "True" | "yes")
}
