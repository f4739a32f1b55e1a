use anyhow::Result;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::platformtools::fastboot::{DEFAULT_LOCK_POLL_ATTEMPTS, DEFAULT_LOCK_POLL_INTERVAL};

/// Main configuration structure for device-flasher
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct DeviceFlasherConfig {
    /// Where adb and fastboot live
    pub platform_tools: PlatformToolsConfig,
    /// Bootloader lock handling
    pub fastboot: FastbootConfig,
    /// Logging settings
    pub logging: LoggingConfig,
    /// Multi-device behaviour
    pub flashing: FlashingConfig,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct PlatformToolsConfig {
    /// Directory containing adb and fastboot; searched on PATH when unset
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct FastbootConfig {
    /// How many times to re-read the lock state after `fastboot flashing`
    pub lock_poll_attempts: u32,
    /// Delay between lock state reads
    pub lock_poll_interval_ms: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level
    pub level: String,
    /// Emit JSON lines instead of human readable output
    pub json: bool,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct FlashingConfig {
    /// Flash all discovered devices at once
    pub parallel: bool,
}

impl Default for FastbootConfig {
    fn default() -> Self {
        Self {
            lock_poll_attempts: DEFAULT_LOCK_POLL_ATTEMPTS,
            lock_poll_interval_ms: DEFAULT_LOCK_POLL_INTERVAL.as_millis() as u64,
        }
    }
}

impl FastbootConfig {
    pub fn lock_poll_interval(&self) -> Duration {
        Duration::from_millis(self.lock_poll_interval_ms)
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

impl DeviceFlasherConfig {
    /// Load configuration from multiple sources with precedence:
    /// 1. Default values
    /// 2. Configuration file (device-flasher.toml, or `file` when given)
    /// 3. Environment variables (prefixed with DEVICE_FLASHER__)
    pub fn load(file: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder();

        match file {
            Some(path) => builder = builder.add_source(File::from(path)),
            None => {
                if Path::new("device-flasher.toml").exists() {
                    builder = builder.add_source(File::with_name("device-flasher"));
                }
            }
        }

        // DEVICE_FLASHER__FASTBOOT__LOCK_POLL_ATTEMPTS=10
        builder = builder.add_source(
            Environment::with_prefix("DEVICE_FLASHER")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build()?;
        let device_flasher_config: DeviceFlasherConfig = config.try_deserialize()?;
        Ok(device_flasher_config)
    }

    /// Save configuration to file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let toml_content = toml::to_string_pretty(self)?;
        std::fs::write(path, toml_content)?;
        Ok(())
    }

    /// Load .env file if it exists
    pub fn load_env_file() -> Result<()> {
        if Path::new(".env").exists() {
            dotenvy::dotenv()?;
        }
        Ok(())
    }
}
