use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

use crate::domain::error::{AppError, Result};
use crate::domain::page::{RESULT_REGION, UPLOAD_ENDPOINT};
use crate::domain::submission::RenderOrdering;
use crate::domain::verification::VerificationScenario;

pub const CONFIG_FILE: &str = "automail.toml";
pub const ENV_PREFIX: &str = "AUTOMAIL_";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Root of the running instance, e.g. `http://127.0.0.1:5000`.
    pub base_url: String,
    pub upload_endpoint: String,
    pub result_region: String,
    pub request_timeout_secs: u64,
    pub ordering: RenderOrdering,
    pub log_filter: String,
    pub verification: VerificationScenario,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:5000".to_string(),
            upload_endpoint: UPLOAD_ENDPOINT.to_string(),
            result_region: RESULT_REGION.to_string(),
            request_timeout_secs: 30,
            ordering: RenderOrdering::default(),
            log_filter: "info".to_string(),
            verification: VerificationScenario::default(),
        }
    }
}

impl AppConfig {
    pub fn validate(&self) -> Result<()> {
        let base = Url::parse(self.base_url.trim()).map_err(|e| {
            AppError::ConfigError(format!("base_url '{}' is not a valid URL: {}", self.base_url, e))
        })?;
        if base.scheme() != "http" && base.scheme() != "https" {
            return Err(AppError::ConfigError(format!(
                "base_url must use http or https, got '{}'",
                base.scheme()
            )));
        }
        if !self.upload_endpoint.starts_with('/') {
            return Err(AppError::ConfigError(
                "upload_endpoint must be an absolute path".to_string(),
            ));
        }
        if self.request_timeout_secs == 0 {
            return Err(AppError::ConfigError(
                "request_timeout_secs must be greater than zero".to_string(),
            ));
        }
        if self.verification.text_field_candidates.is_empty() {
            return Err(AppError::ConfigError(
                "verification.text_field_candidates must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    pub fn base(&self) -> Result<Url> {
        Ok(Url::parse(self.base_url.trim())?)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Defaults, then the TOML file, then `AUTOMAIL_*` variables
/// (`__` separates nested keys, e.g. `AUTOMAIL_VERIFICATION__INPUT_TEXT`).
pub fn figment_for(path: &Path) -> Figment {
    Figment::from(Serialized::defaults(AppConfig::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed(ENV_PREFIX).split("__"))
}

/// Loads `.env`, then the layered configuration. An explicitly named file
/// must exist; the default `automail.toml` is optional.
pub fn load_config(path: Option<&Path>) -> Result<AppConfig> {
    let _ = dotenvy::dotenv();

    let file = match path {
        Some(path) => {
            if !path.exists() {
                return Err(AppError::ConfigError(format!(
                    "Config file not found: {}",
                    path.display()
                )));
            }
            path.to_path_buf()
        }
        None => PathBuf::from(CONFIG_FILE),
    };

    let config: AppConfig = figment_for(&file).extract()?;
    config.validate()?;
    tracing::debug!(file = %file.display(), base_url = %config.base_url, "Configuration loaded");
    Ok(config)
}
