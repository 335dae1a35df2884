use crate::constants::{
    DEFAULT_BUCKET, DEFAULT_OUTPUT_DIR, DEFAULT_REGION, MAX_WINDOW_MONTHS, PUBLIC_URL_TEMPLATE,
    WINDOW_MONTHS,
};
use crate::errors::{AppError, AppResult};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Resolved configuration with all values filled in.
///
/// This struct represents the run defaults and can be deserialized by the TOML
/// loader. The defaults reproduce the fixed behaviour of the tool: the public
/// `divvy-tripdata` bucket, a twelve month window and extraction into `data/`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ResolvedConfig {
    /// Bucket holding the monthly trip archives
    pub bucket: String,
    /// Region used to sign listing requests
    pub region: String,
    /// Custom S3-compatible endpoint for listing; `None` uses AWS
    pub endpoint_url: Option<String>,
    /// Base URL archives are downloaded from; `None` derives it from the bucket
    pub public_url: Option<String>,
    /// Directory the archives are extracted into
    pub output_dir: PathBuf,
    /// Number of calendar months preceding the current one to fetch
    pub window_months: u32,
    /// Key prefix applied to the listing; empty lists the whole bucket
    pub prefix: String,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        Self {
            bucket: DEFAULT_BUCKET.to_string(),
            region: DEFAULT_REGION.to_string(),
            endpoint_url: None,
            public_url: None,
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            window_months: WINDOW_MONTHS,
            prefix: String::new(),
        }
    }
}

impl ResolvedConfig {
    /// Returns the base URL archives are fetched from.
    pub fn public_base_url(&self) -> String {
        self.public_url
            .clone()
            .unwrap_or_else(|| PUBLIC_URL_TEMPLATE.replace("{bucket}", &self.bucket))
    }

    /// Checks the values a run cannot proceed without.
    pub fn validate(&self) -> AppResult<()> {
        if self.bucket.trim().is_empty() {
            return Err(AppError::InvalidInput("Bucket must not be empty".into()));
        }
        if self.window_months == 0 {
            return Err(AppError::InvalidInput(
                "Window months must be greater than 0".into(),
            ));
        }
        if self.window_months > MAX_WINDOW_MONTHS {
            return Err(AppError::InvalidInput(format!(
                "Window months must be at most {MAX_WINDOW_MONTHS}, got {}",
                self.window_months
            )));
        }
        Ok(())
    }
}

/// Configuration that can be loaded from a TOML file.
///
/// Deserializes the required credentials path and optional run configuration.
/// The parser rejects unknown keys to catch typos.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ResolvedConfigFile {
    /// Path to the credentials CSV
    pub credentials: PathBuf,
    /// Flattened resolved configuration with run defaults
    #[serde(flatten)]
    pub resolved: ResolvedConfig,
}

impl ResolvedConfigFile {
    /// Loads and validates configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if the TOML is malformed, the credentials path is
    /// missing, unknown keys are present, the bucket is empty or the window is
    /// zero or more than `MAX_WINDOW_MONTHS` months long. Returns `IoError` if
    /// the file cannot be read.
    pub fn from_toml_file(path: &Path) -> AppResult<Self> {
        let contents = fs::read_to_string(path)?;
        let config: ResolvedConfigFile = toml::from_str(&contents)
            .map_err(|e| AppError::InvalidInput(format!("Failed to parse config: {e}")))?;

        config.resolved.validate()?;
        Ok(config)
    }
}
