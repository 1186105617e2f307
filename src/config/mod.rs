use serde::{Deserialize, Serialize};
use std::{
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use crate::{
    core::services::{DEFAULT_OCCURRENCES, PROJECTION_LABEL},
    errors::EngineError,
    simulation::{DEFAULT_HORIZON_DAYS, DEFAULT_LOOKBACK_DAYS},
};

const APP_DIR_NAME: &str = "cashflow_core";
const CONFIG_FILE: &str = "config.json";
const TMP_SUFFIX: &str = "tmp";

/// Tunables handed to the simulator by its caller.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct EngineConfig {
    pub horizon_days: u32,
    pub lookback_days: u32,
    /// Periods generated per recurrence, both at creation and when extending.
    pub recurrence_batch: u32,
    pub projection_label: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            horizon_days: DEFAULT_HORIZON_DAYS,
            lookback_days: DEFAULT_LOOKBACK_DAYS,
            recurrence_batch: DEFAULT_OCCURRENCES,
            projection_label: PROJECTION_LABEL.into(),
        }
    }
}

impl EngineConfig {
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.recurrence_batch == 0 {
            return Err(EngineError::invalid("recurrence_batch must be at least 1"));
        }
        Ok(())
    }
}

pub struct ConfigManager {
    path: PathBuf,
}

impl ConfigManager {
    /// Uses `<user config dir>/cashflow_core/config.json`.
    pub fn new() -> Self {
        let base = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        Self::with_path(base.join(APP_DIR_NAME).join(CONFIG_FILE))
    }

    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Reads the config file, falling back to defaults when it does not exist.
    pub fn load(&self) -> Result<EngineConfig, EngineError> {
        let config = if self.path.exists() {
            let data = fs::read_to_string(&self.path)?;
            serde_json::from_str::<EngineConfig>(&data)?
        } else {
            EngineConfig::default()
        };
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self, config: &EngineConfig) -> Result<(), EngineError> {
        config.validate()?;
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(config)?;
        let tmp = tmp_path(&self.path);
        write_atomic(&tmp, &json)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_atomic(path: &Path, data: &str) -> Result<(), EngineError> {
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    Ok(())
}
