//! `fastboot` wrapper: talks to devices in bootloader mode and owns the
//! bootloader lock state.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::{Arc, LazyLock};
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

use super::{PlatformToolsPath, ToolName};
use crate::external::{CommandError, CommandExecutor};
use crate::flash::FastbootFlasher;

/// `name: value` lines of `fastboot getvar`, with or without the
/// `(bootloader) ` prefix some bootloaders add.
static GETVAR_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^(?:\(bootloader\)\s*)?([A-Za-z0-9_.-]+):[ \t]*(\S*)[ \t\r]*$")
        .expect("getvar pattern is valid")
});

pub const DEFAULT_LOCK_POLL_ATTEMPTS: u32 = 120;
pub const DEFAULT_LOCK_POLL_INTERVAL: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BootloaderLockStatus {
    Locked,
    Unlocked,
    /// Only ever paired with an error; never a state to flash from.
    Unknown,
}

impl fmt::Display for BootloaderLockStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BootloaderLockStatus::Locked => write!(f, "locked"),
            BootloaderLockStatus::Unlocked => write!(f, "unlocked"),
            BootloaderLockStatus::Unknown => write!(f, "unknown"),
        }
    }
}

#[derive(Debug, Error)]
pub enum FastbootError {
    #[error("fastboot command failed: {message}")]
    CommandFailure { message: String },
    #[error("Command execution error: {source}")]
    Command {
        #[from]
        source: CommandError,
    },
    #[error("failed to unlock bootloader on {device}")]
    UnlockBootloader { device: String },
    #[error("failed to lock bootloader on {device}")]
    LockBootloader { device: String },
    #[error("failed to reboot {device}")]
    RebootFailure { device: String },
}

pub struct FastbootTool {
    executable: String,
    executor: Arc<dyn CommandExecutor>,
    lock_poll_attempts: u32,
    lock_poll_interval: Duration,
}

impl FastbootTool {
    pub fn new(path: &PlatformToolsPath, host_os: &str, executor: Arc<dyn CommandExecutor>) -> Self {
        Self {
            executable: path
                .executable(ToolName::Fastboot, host_os)
                .to_string_lossy()
                .into_owned(),
            executor,
            lock_poll_attempts: DEFAULT_LOCK_POLL_ATTEMPTS,
            lock_poll_interval: DEFAULT_LOCK_POLL_INTERVAL,
        }
    }

    /// How long to wait for the device to report a requested lock state.
    /// The operator may have to confirm unlocking on the device itself.
    pub fn with_lock_polling(mut self, attempts: u32, interval: Duration) -> Self {
        self.lock_poll_attempts = attempts.max(1);
        self.lock_poll_interval = interval;
        self
    }

    fn command(&self, args: &[&str]) -> Result<String, FastbootError> {
        let output = self.executor.execute(&self.executable, args)?;
        if !output.success() {
            return Err(FastbootError::CommandFailure {
                message: format!("fastboot {}: {}", args.join(" "), output.combined().trim()),
            });
        }
        Ok(output.combined())
    }

    fn getvar(&self, device_id: &str, var: &str) -> Result<String, FastbootError> {
        let response = self.command(&["-s", device_id, "getvar", var])?;
        parse_getvar(&response, var).ok_or_else(|| FastbootError::CommandFailure {
            message: format!("getvar {var} returned no value for {device_id}"),
        })
    }

    fn wait_for_lock_status(&self, device_id: &str, wanted: BootloaderLockStatus) -> bool {
        for attempt in 1..=self.lock_poll_attempts {
            match self.get_bootloader_lock_status(device_id) {
                Ok(status) if status == wanted => return true,
                Ok(status) => debug!(device.id = device_id, %status, attempt, "waiting for bootloader {wanted}"),
                Err(e) => debug!(device.id = device_id, attempt, "lock status poll failed: {e}"),
            }
            if attempt < self.lock_poll_attempts {
                std::thread::sleep(self.lock_poll_interval);
            }
        }
        false
    }
}

fn parse_getvar(output: &str, var: &str) -> Option<String> {
    GETVAR_LINE
        .captures_iter(output)
        .find(|caps| &caps[1] == var)
        .map(|caps| caps[2].to_string())
        .filter(|value| !value.is_empty())
}

fn parse_device_list(output: &str) -> Vec<String> {
    output
        .lines()
        .filter_map(|line| line.split_whitespace().next())
        .map(str::to_string)
        .collect()
}

impl FastbootFlasher for FastbootTool {
    fn get_device_ids(&self) -> Result<Vec<String>, FastbootError> {
        let response = self.command(&["devices"])?;
        Ok(parse_device_list(&response))
    }

    fn get_device_codename(&self, device_id: &str) -> Result<String, FastbootError> {
        self.getvar(device_id, "product")
    }

    fn get_bootloader_lock_status(&self, device_id: &str) -> Result<BootloaderLockStatus, FastbootError> {
        match self.getvar(device_id, "unlocked")?.as_str() {
            "yes" => Ok(BootloaderLockStatus::Unlocked),
            "no" => Ok(BootloaderLockStatus::Locked),
            other => Err(FastbootError::CommandFailure {
                message: format!("unexpected unlocked value {other:?} from {device_id}"),
            }),
        }
    }

    fn set_bootloader_lock_status(
        &self,
        device_id: &str,
        wanted: BootloaderLockStatus,
    ) -> Result<(), FastbootError> {
        let (verb, failure) = match wanted {
            BootloaderLockStatus::Unlocked => (
                "unlock",
                FastbootError::UnlockBootloader {
                    device: device_id.to_string(),
                },
            ),
            BootloaderLockStatus::Locked => (
                "lock",
                FastbootError::LockBootloader {
                    device: device_id.to_string(),
                },
            ),
            BootloaderLockStatus::Unknown => {
                return Err(FastbootError::CommandFailure {
                    message: "cannot set bootloader lock status to unknown".to_string(),
                })
            }
        };

        if let Err(e) = self.command(&["-s", device_id, "flashing", verb]) {
            debug!(device.id = device_id, "fastboot flashing {verb} failed: {e}");
            return Err(failure);
        }
        if !self.wait_for_lock_status(device_id, wanted) {
            return Err(failure);
        }
        Ok(())
    }

    fn reboot(&self, device_id: &str) -> Result<(), FastbootError> {
        self.command(&["-s", device_id, "reboot"])
            .map(|_| ())
            .map_err(|_| FastbootError::RebootFailure {
                device: device_id.to_string(),
            })
    }

    fn name(&self) -> ToolName {
        ToolName::Fastboot
    }
}
