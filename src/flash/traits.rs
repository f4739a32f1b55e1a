//! Collaborator interfaces injected into the flasher

#[cfg(any(test, feature = "testing"))]
use mockall::automock;

use crate::factoryimage::FactoryImageError;
use crate::platformtools::{AdbError, BootloaderLockStatus, FastbootError, PlatformToolsPath, ToolName};

/// Factory image for the device being flashed
#[cfg_attr(any(test, feature = "testing"), automock)]
pub trait FactoryImageFlasher: Send + Sync {
    /// Check the image was built for `codename`
    fn validate(&self, codename: &str) -> Result<(), FactoryImageError>;

    /// Flash every partition using the tools in `platform_tools`
    fn flash_all(&self, platform_tools: &PlatformToolsPath) -> Result<(), FactoryImageError>;
}

/// Location of the platform-tools executables
#[cfg_attr(any(test, feature = "testing"), automock)]
pub trait PlatformToolsFlasher: Send + Sync {
    fn path(&self) -> PlatformToolsPath;
}

/// Bridge tool (adb) operations
#[cfg_attr(any(test, feature = "testing"), automock)]
pub trait AdbFlasher: Send + Sync {
    fn get_device_ids(&self) -> Result<Vec<String>, AdbError>;

    fn get_device_codename(&self, device_id: &str) -> Result<String, AdbError>;

    fn reboot_into_bootloader(&self, device_id: &str) -> Result<(), AdbError>;

    /// Stop the background adb server
    fn kill_server(&self) -> Result<(), AdbError>;

    fn name(&self) -> ToolName;
}

/// Bootloader tool (fastboot) operations
#[cfg_attr(any(test, feature = "testing"), automock)]
pub trait FastbootFlasher: Send + Sync {
    fn get_device_ids(&self) -> Result<Vec<String>, FastbootError>;

    fn get_device_codename(&self, device_id: &str) -> Result<String, FastbootError>;

    fn get_bootloader_lock_status(&self, device_id: &str) -> Result<BootloaderLockStatus, FastbootError>;

    fn set_bootloader_lock_status(
        &self,
        device_id: &str,
        status: BootloaderLockStatus,
    ) -> Result<(), FastbootError>;

    fn reboot(&self, device_id: &str) -> Result<(), FastbootError>;

    fn name(&self) -> ToolName;
}
