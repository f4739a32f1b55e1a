//! Flashing orchestrator and device discovery
//!
//! Both operate purely on injected collaborators so the whole
//! unlock/flash/lock sequence can be driven by mocks in tests.

pub mod discovery;
pub mod traits;
pub mod types;


use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::platformtools::{BootloaderLockStatus, ToolName};

pub use discovery::DeviceDiscovery;
pub use traits::{AdbFlasher, FactoryImageFlasher, FastbootFlasher, PlatformToolsFlasher};
#[cfg(any(test, feature = "testing"))]
pub use traits::{MockAdbFlasher, MockFactoryImageFlasher, MockFastbootFlasher, MockPlatformToolsFlasher};
pub use types::{Device, DiscoveredDevices, FlashError, FlashStep};

/// Collaborators the flasher drives
pub struct FlasherDeps {
    pub factory_image: Arc<dyn FactoryImageFlasher>,
    pub platform_tools: Arc<dyn PlatformToolsFlasher>,
    pub adb: Arc<dyn AdbFlasher>,
    pub fastboot: Arc<dyn FastbootFlasher>,
}

/// Runs discovery and the per-device flashing pipeline.
///
/// Cheap to clone; each clone shares the same collaborators and no state.
#[derive(Clone)]
pub struct Flasher {
    factory_image: Arc<dyn FactoryImageFlasher>,
    platform_tools: Arc<dyn PlatformToolsFlasher>,
    adb: Arc<dyn AdbFlasher>,
    fastboot: Arc<dyn FastbootFlasher>,
}

/// Stops the adb server when dropped, whichever way `flash` returns.
struct BridgeSession<'a> {
    adb: &'a dyn AdbFlasher,
}

impl<'a> BridgeSession<'a> {
    fn new(adb: &'a dyn AdbFlasher) -> Self {
        Self { adb }
    }
}

impl Drop for BridgeSession<'_> {
    fn drop(&mut self) {
        debug!("{}", FlashStep::CleaningUp);
        if let Err(e) = self.adb.kill_server() {
            debug!("ignoring adb kill-server failure: {}", e);
        }
    }
}

impl Flasher {
    pub fn new(deps: FlasherDeps) -> Self {
        Self {
            factory_image: deps.factory_image,
            platform_tools: deps.platform_tools,
            adb: deps.adb,
            fastboot: deps.fastboot,
        }
    }

    /// Flash the factory image onto `device` and re-lock its bootloader.
    ///
    /// Returns the first fatal error unchanged. Failing to reboot into the
    /// bootloader or out of it is only logged. If flashing itself fails the
    /// bootloader is left unlocked so a retry does not need to unlock again.
    pub fn flash(&self, device: &Device) -> Result<(), FlashError> {
        let _session = BridgeSession::new(self.adb.as_ref());
        let id = device.id.as_str();

        info!(device.id = id, device.codename = %device.codename, "{}", FlashStep::Validating);
        self.factory_image.validate(&device.codename)?;

        if device.discovery_tool == ToolName::Adb {
            info!(device.id = id, "{}", FlashStep::RebootingToBootloader);
            if let Err(e) = self.adb.reboot_into_bootloader(id) {
                warn!(device.id = id, "failed to reboot into bootloader, continuing: {}", e);
            }
        }

        info!(device.id = id, "{}", FlashStep::CheckingLock);
        let lock_status = self.fastboot.get_bootloader_lock_status(id)?;
        debug!(device.id = id, %lock_status, "bootloader lock status");

        if lock_status == BootloaderLockStatus::Locked {
            info!(device.id = id, "{}", FlashStep::Unlocking);
            self.fastboot
                .set_bootloader_lock_status(id, BootloaderLockStatus::Unlocked)?;
        }

        let platform_tools = self.platform_tools.path();
        info!(device.id = id, platform_tools = %platform_tools, "{}", FlashStep::Flashing);
        self.factory_image.flash_all(&platform_tools)?;

        info!(device.id = id, "{}", FlashStep::Relocking);
        self.fastboot
            .set_bootloader_lock_status(id, BootloaderLockStatus::Locked)?;

        info!(device.id = id, "{}", FlashStep::RebootingOut);
        if let Err(e) = self.fastboot.reboot(id) {
            warn!(device.id = id, "failed to reboot device, flash already complete: {}", e);
        }

        info!(device.id = id, "flashing complete");
        Ok(())
    }

    /// Discovery over the same adb and fastboot collaborators.
    pub fn discover_devices(&self) -> Result<DiscoveredDevices, FlashError> {
        DeviceDiscovery::new(self.adb.clone(), self.fastboot.clone()).discover_devices()
    }
}
