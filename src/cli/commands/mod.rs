use anyhow::{Context, Result};
use std::path::PathBuf;
use std::sync::Arc;

use crate::config::DeviceFlasherConfig;
use crate::external::{CommandExecutor, ProcessCommandExecutor};
use crate::flash::{DeviceDiscovery, PlatformToolsFlasher};
use crate::platformtools::{AdbTool, FastbootTool, PlatformTools};

pub mod config;
pub mod devices;
pub mod flash;

pub use config::ConfigCommand;
pub use devices::DevicesCommand;
pub use flash::FlashCommand;

/// Host OS name as used for executable names (`windows`, `linux`, `macos`)
pub fn host_os() -> &'static str {
    std::env::consts::OS
}

/// The real platform tools, wired to spawn processes
pub struct Toolchain {
    pub host_os: String,
    pub executor: Arc<dyn CommandExecutor>,
    pub platform_tools: Arc<PlatformTools>,
    pub adb: Arc<AdbTool>,
    pub fastboot: Arc<FastbootTool>,
}

impl Toolchain {
    pub fn from_config(config: &DeviceFlasherConfig, override_path: Option<PathBuf>) -> Result<Self> {
        let host_os = host_os().to_string();
        let configured = override_path.or_else(|| config.platform_tools.path.clone());
        let platform_tools = PlatformTools::locate(configured.as_deref(), &host_os)
            .context("Failed to locate platform-tools")?;
        tracing::debug!(path = %platform_tools.path(), "using platform-tools");

        let executor: Arc<dyn CommandExecutor> = Arc::new(ProcessCommandExecutor);
        let path = platform_tools.path();
        let adb = AdbTool::new(&path, &host_os, executor.clone());
        let fastboot = FastbootTool::new(&path, &host_os, executor.clone()).with_lock_polling(
            config.fastboot.lock_poll_attempts,
            config.fastboot.lock_poll_interval(),
        );

        Ok(Self {
            host_os,
            executor,
            platform_tools: Arc::new(platform_tools),
            adb: Arc::new(adb),
            fastboot: Arc::new(fastboot),
        })
    }

    pub fn discovery(&self) -> DeviceDiscovery {
        DeviceDiscovery::new(self.adb.clone(), self.fastboot.clone())
    }
}
