//! `adb` wrapper: talks to devices while Android is running.

use std::sync::Arc;
use thiserror::Error;

use super::{PlatformToolsPath, ToolName};
use crate::external::{CommandError, CommandExecutor};
use crate::flash::AdbFlasher;

const CODENAME_PROPERTY: &str = "ro.product.device";

#[derive(Debug, Error)]
pub enum AdbError {
    #[error("Command execution error: {source}")]
    Command {
        #[from]
        source: CommandError,
    },
    #[error("adb {args} failed: {output}")]
    CommandFailed { args: String, output: String },
    #[error("property {property} is empty on device {device}")]
    EmptyProperty { property: String, device: String },
}

pub struct AdbTool {
    executable: String,
    executor: Arc<dyn CommandExecutor>,
}

impl AdbTool {
    pub fn new(path: &PlatformToolsPath, host_os: &str, executor: Arc<dyn CommandExecutor>) -> Self {
        Self {
            executable: path
                .executable(ToolName::Adb, host_os)
                .to_string_lossy()
                .into_owned(),
            executor,
        }
    }

    fn command(&self, args: &[&str]) -> Result<String, AdbError> {
        let output = self.executor.execute(&self.executable, args)?;
        if !output.success() {
            return Err(AdbError::CommandFailed {
                args: args.join(" "),
                output: output.combined().trim().to_string(),
            });
        }
        Ok(output.combined())
    }

    fn get_prop(&self, property: &str, device_id: &str) -> Result<String, AdbError> {
        let response = self.command(&["-s", device_id, "shell", "getprop", property])?;
        let value = response.trim_matches(|c| matches!(c, '[' | ']' | '\n' | '\r'));
        if value.is_empty() {
            return Err(AdbError::EmptyProperty {
                property: property.to_string(),
                device: device_id.to_string(),
            });
        }
        Ok(value.to_string())
    }
}

/// Serials from `adb devices` output, skipping the header and daemon chatter.
fn parse_device_list(output: &str) -> Vec<String> {
    output
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter(|line| !line.starts_with("List of devices") && !line.starts_with('*'))
        .filter_map(|line| line.split_whitespace().next())
        .map(str::to_string)
        .collect()
}

impl AdbFlasher for AdbTool {
    fn get_device_ids(&self) -> Result<Vec<String>, AdbError> {
        let response = self.command(&["devices"])?;
        Ok(parse_device_list(&response))
    }

    fn get_device_codename(&self, device_id: &str) -> Result<String, AdbError> {
        self.get_prop(CODENAME_PROPERTY, device_id)
    }

    fn reboot_into_bootloader(&self, device_id: &str) -> Result<(), AdbError> {
        self.command(&["-s", device_id, "reboot", "bootloader"])?;
        Ok(())
    }

    fn kill_server(&self) -> Result<(), AdbError> {
        self.command(&["kill-server"])?;
        Ok(())
    }

    fn name(&self) -> ToolName {
        ToolName::Adb
    }
}
