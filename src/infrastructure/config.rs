// Sync configuration - defaults, config file, environment and CLI overrides
use crate::error::Result;
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const DEFAULT_URL: &str = "http://localhost:3000";
pub const DEFAULT_DIR: &str = "./grafana_provisioning/dashboards";
pub const DEFAULT_CONFIG_FILE: &str = "config/grafana-sync";
const ENV_PREFIX: &str = "GRAFANA_SYNC";

#[derive(Debug, Deserialize, Clone)]
pub struct SyncConfig {
    pub url: String,
    pub dir: PathBuf,
    pub page_size: u32,
    pub timeout_secs: u64,
    pub folders: bool,
    pub diff_context: usize,
    pub sanitize: SanitizeConfig,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct SanitizeConfig {
    pub enabled: bool,
    pub time_from: String,
    pub time_to: String,
    pub refresh: String,
}

impl Default for SanitizeConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            time_from: "now-30m".to_string(),
            time_to: "now".to_string(),
            refresh: "5s".to_string(),
        }
    }
}

/// Values given explicitly on the command line. `None`/`false` leaves the
/// configured value in place.
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    pub url: Option<String>,
    pub dir: Option<PathBuf>,
    pub folders: bool,
    pub raw: bool,
}

/// Loads settings: built-in defaults, then the config file, then
/// `GRAFANA_SYNC_*` environment variables.
pub fn load_sync_config(path: Option<&Path>) -> Result<SyncConfig> {
    let sanitize = SanitizeConfig::default();

    // An explicit path must exist; the default one is optional.
    let (file_name, required) = match path {
        Some(p) => (p.to_string_lossy().into_owned(), true),
        None => (DEFAULT_CONFIG_FILE.to_string(), false),
    };

    let settings = config::Config::builder()
        .set_default("url", DEFAULT_URL)?
        .set_default("dir", DEFAULT_DIR)?
        .set_default("page_size", 5000)?
        .set_default("timeout_secs", 30)?
        .set_default("folders", false)?
        .set_default("diff_context", 3)?
        .set_default("sanitize.enabled", sanitize.enabled)?
        .set_default("sanitize.time_from", sanitize.time_from)?
        .set_default("sanitize.time_to", sanitize.time_to)?
        .set_default("sanitize.refresh", sanitize.refresh)?
        .add_source(config::File::with_name(&file_name).required(required))
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    let config: SyncConfig = settings.try_deserialize()?;
    config.validate()?;
    Ok(config)
}

impl SyncConfig {
    pub fn apply_overrides(mut self, overrides: CliOverrides) -> Result<Self> {
        if let Some(url) = overrides.url {
            self.url = url;
        }
        if let Some(dir) = overrides.dir {
            self.dir = dir;
        }
        if overrides.folders {
            self.folders = true;
        }
        if overrides.raw {
            self.sanitize.enabled = false;
        }
        self.validate()?;
        Ok(self)
    }

    fn validate(&self) -> Result<()> {
        if !(self.url.starts_with("http://") || self.url.starts_with("https://")) {
            return Err(crate::error::SyncError::Config(format!(
                "url must start with http:// or https://, got '{}'",
                self.url
            )));
        }
        if self.page_size == 0 {
            return Err(crate::error::SyncError::Config(
                "page_size must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}
