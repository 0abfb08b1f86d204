// Configuration structs

use serde::{Deserialize, Serialize};

pub const DEFAULT_LOCATION: &str = "us-central1";
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";
pub const DEFAULT_DATASET_ID: &str = "products_data_agent";
pub const DEFAULT_TABLE_ID: &str = "shoe_items";

/// Resolved runtime configuration, constructed once at startup.
///
/// Precedence: command-line overrides, then ~/.prodscribe/config.toml, then
/// environment variables, then defaults.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Cloud project identifier; required for deployment, no default.
    pub project: Option<String>,
    pub location: String,
    /// Staging bucket for agent registration; required for deployment.
    pub bucket: Option<String>,
    pub model: String,
    pub dataset_id: String,
    pub table_id: String,
    pub disable_web_driver: bool,
    /// Gemini API key; required for running the pipeline locally.
    pub api_key: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            project: None,
            location: DEFAULT_LOCATION.to_string(),
            bucket: None,
            model: DEFAULT_MODEL.to_string(),
            dataset_id: DEFAULT_DATASET_ID.to_string(),
            table_id: DEFAULT_TABLE_ID.to_string(),
            disable_web_driver: false,
            api_key: None,
        }
    }
}

impl Settings {
    /// Apply command-line overrides (highest precedence).
    pub fn apply_overrides(
        &mut self,
        project: Option<String>,
        location: Option<String>,
        bucket: Option<String>,
    ) {
        if let Some(project) = project {
            self.project = Some(project);
        }
        if let Some(location) = location {
            self.location = location;
        }
        if let Some(bucket) = bucket {
            self.bucket = Some(bucket);
        }
    }
}

/// On-disk shape of ~/.prodscribe/config.toml. Every field optional; unset
/// fields fall through to environment variables, then defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FileSettings {
    pub project: Option<String>,
    pub location: Option<String>,
    pub bucket: Option<String>,
    pub model: Option<String>,
    pub dataset_id: Option<String>,
    pub table_id: Option<String>,
    pub disable_web_driver: Option<bool>,
    pub api_key: Option<String>,
}
