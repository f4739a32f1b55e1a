//! Extracted factory image: codename validation and the flash-all script.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info};

use crate::external::{CommandError, CommandExecutor, CommandOptions};
use crate::flash::FactoryImageFlasher;
use crate::platformtools::PlatformToolsPath;

#[derive(Debug, Error)]
pub enum FactoryImageError {
    #[error("factory image {image} does not match device codename {codename}")]
    Validation { codename: String, image: String },
    #[error("no {script} found in factory image {image}")]
    MissingFlashAll { script: String, image: PathBuf },
    #[error("flash-all exited with status {status}")]
    FailedToFlash { status: i32 },
    #[error("Command execution error: {source}")]
    Command {
        #[from]
        source: CommandError,
    },
    #[error("invalid PATH for flash-all: {message}")]
    InvalidPath { message: String },
}

/// `adb` and `fastboot` read this to pick a device when no `-s` is given.
const SERIAL_ENV: &str = "ANDROID_SERIAL";

#[derive(Clone)]
pub struct FactoryImage {
    dir: PathBuf,
    name: String,
    host_os: String,
    serial: Option<String>,
    executor: Arc<dyn CommandExecutor>,
}

impl FactoryImage {
    /// Open an extracted factory image directory (`<codename>-<build>...`).
    pub fn open(
        dir: impl Into<PathBuf>,
        host_os: &str,
        executor: Arc<dyn CommandExecutor>,
    ) -> Result<Self, FactoryImageError> {
        let dir = dir.into();
        let script = flash_all_script(host_os);
        if !dir.join(script).is_file() {
            return Err(FactoryImageError::MissingFlashAll {
                script: script.to_string(),
                image: dir,
            });
        }

        let name = dir
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();

        Ok(Self {
            dir,
            name,
            host_os: host_os.to_string(),
            serial: None,
            executor,
        })
    }

    /// The same image, with flash-all pinned to the device `serial`.
    pub fn for_device(&self, serial: impl Into<String>) -> Self {
        Self {
            serial: Some(serial.into()),
            ..self.clone()
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn serial(&self) -> Option<&str> {
        self.serial.as_deref()
    }

    fn search_path(&self, platform_tools: &PlatformToolsPath) -> Result<String, FactoryImageError> {
        let mut paths = vec![platform_tools.as_path().to_path_buf()];
        if let Some(existing) = std::env::var_os("PATH") {
            paths.extend(std::env::split_paths(&existing));
        }
        let joined = std::env::join_paths(paths).map_err(|e| FactoryImageError::InvalidPath {
            message: e.to_string(),
        })?;
        Ok(joined.to_string_lossy().into_owned())
    }
}

fn flash_all_script(host_os: &str) -> &'static str {
    if host_os == "windows" {
        "flash-all.bat"
    } else {
        "flash-all.sh"
    }
}

impl FactoryImageFlasher for FactoryImage {
    fn validate(&self, codename: &str) -> Result<(), FactoryImageError> {
        if codename.is_empty() || !self.name.starts_with(&format!("{codename}-")) {
            return Err(FactoryImageError::Validation {
                codename: codename.to_string(),
                image: self.name.clone(),
            });
        }
        Ok(())
    }

    fn flash_all(&self, platform_tools: &PlatformToolsPath) -> Result<(), FactoryImageError> {
        let mut options = CommandOptions {
            current_dir: Some(self.dir.clone()),
            env: vec![("PATH".to_string(), self.search_path(platform_tools)?)],
        };
        if let Some(serial) = &self.serial {
            options.env.push((SERIAL_ENV.to_string(), serial.clone()));
        }
        let script = flash_all_script(&self.host_os);
        let (program, args): (&str, Vec<&str>) = if self.host_os == "windows" {
            ("cmd", vec!["/C", script])
        } else {
            ("bash", vec![script])
        };

        info!(image = %self.name, device.id = ?self.serial, "running {script}");
        let output = self.executor.execute_with(program, &args, &options)?;
        if !output.success() {
            error!(image = %self.name, "{}", output.combined().trim());
            return Err(FactoryImageError::FailedToFlash {
                status: output.status_code,
            });
        }
        Ok(())
    }
}
