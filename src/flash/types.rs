//! Core types shared by discovery and the flashing pipeline

use serde::Serialize;
use std::collections::BTreeMap;
use thiserror::Error;

use crate::factoryimage::FactoryImageError;
use crate::platformtools::{FastbootError, ToolName};

/// One attached device as reported by a discovery tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Device {
    /// Serial number, unique among attached devices
    pub id: String,
    /// Product codename used to match the factory image
    pub codename: String,
    /// Tool that reported the device; `Adb` means it still has to be
    /// rebooted into the bootloader
    pub discovery_tool: ToolName,
}

impl Device {
    pub fn new(id: impl Into<String>, codename: impl Into<String>, discovery_tool: ToolName) -> Self {
        Self {
            id: id.into(),
            codename: codename.into(),
            discovery_tool,
        }
    }
}

/// Devices found by one discovery run, keyed by serial.
pub type DiscoveredDevices = BTreeMap<String, Device>;

/// Fatal flashing and discovery errors.
///
/// Collaborator errors are wrapped transparently so callers can match on
/// the collaborator's own variant.
#[derive(Debug, Error)]
pub enum FlashError {
    #[error(transparent)]
    FactoryImage(#[from] FactoryImageError),
    #[error(transparent)]
    Fastboot(#[from] FastbootError),
    #[error("no devices found")]
    NoDevicesFound,
}

/// Pipeline stages, in order. Used to label log output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlashStep {
    Validating,
    RebootingToBootloader,
    CheckingLock,
    Unlocking,
    Flashing,
    Relocking,
    RebootingOut,
    CleaningUp,
}

impl std::fmt::Display for FlashStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            FlashStep::Validating => "validating factory image",
            FlashStep::RebootingToBootloader => "rebooting into bootloader",
            FlashStep::CheckingLock => "checking bootloader lock status",
            FlashStep::Unlocking => "unlocking bootloader",
            FlashStep::Flashing => "flashing factory image",
            FlashStep::Relocking => "locking bootloader",
            FlashStep::RebootingOut => "rebooting device",
            FlashStep::CleaningUp => "stopping adb server",
        };
        write!(f, "{name}")
    }
}
