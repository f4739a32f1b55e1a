//! Device discovery across adb and fastboot

use std::fmt::Display;
use std::sync::Arc;
use tracing::{debug, info};

use super::traits::{AdbFlasher, FastbootFlasher};
use super::types::{Device, DiscoveredDevices, FlashError};
use crate::platformtools::ToolName;

/// Builds the set of attached devices from both discovery tools.
#[derive(Clone)]
pub struct DeviceDiscovery {
    adb: Arc<dyn AdbFlasher>,
    fastboot: Arc<dyn FastbootFlasher>,
}

impl DeviceDiscovery {
    pub fn new(adb: Arc<dyn AdbFlasher>, fastboot: Arc<dyn FastbootFlasher>) -> Self {
        Self { adb, fastboot }
    }

    /// Find attached devices through adb and fastboot.
    ///
    /// The adb pass runs first and the fastboot pass overwrites it, so a
    /// device seen by both tools is recorded once, as the fastboot entry.
    /// Listing failures count as no devices from that tool, and devices whose
    /// codename cannot be read are left out.
    pub fn discover_devices(&self) -> Result<DiscoveredDevices, FlashError> {
        let mut devices = DiscoveredDevices::new();

        collect_devices(&mut devices, ToolName::Adb, self.adb.get_device_ids(), |id| {
            self.adb.get_device_codename(id)
        });
        collect_devices(
            &mut devices,
            ToolName::Fastboot,
            self.fastboot.get_device_ids(),
            |id| self.fastboot.get_device_codename(id),
        );

        info!(
            "discovered {} device(s) via {} and {}",
            devices.len(),
            self.adb.name(),
            self.fastboot.name()
        );

        if devices.is_empty() {
            return Err(FlashError::NoDevicesFound);
        }
        Ok(devices)
    }
}

fn collect_devices<E, F>(
    devices: &mut DiscoveredDevices,
    tool: ToolName,
    ids: Result<Vec<String>, E>,
    codename: F,
) where
    E: Display,
    F: Fn(&str) -> Result<String, E>,
{
    let ids = match ids {
        Ok(ids) => ids,
        Err(e) => {
            debug!(tool = %tool, "device listing failed: {}", e);
            return;
        }
    };

    for id in ids {
        match codename(&id) {
            Ok(codename) => {
                debug!(tool = %tool, device.id = %id, device.codename = %codename, "found device");
                devices.insert(id.clone(), Device::new(id, codename, tool));
            }
            Err(e) => debug!(tool = %tool, device.id = %id, "skipping device without codename: {}", e),
        }
    }
}
