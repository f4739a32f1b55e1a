// device-flasher - Android factory image flashing over adb and fastboot
// This exposes the core components for testing and integration

pub mod cli;
pub mod config;
pub mod external;
pub mod factoryimage;
pub mod flash;
pub mod platformtools;
pub mod telemetry;

// Re-export key types for easy access
pub use config::DeviceFlasherConfig;
pub use factoryimage::{FactoryImage, FactoryImageError};
pub use flash::{Device, DeviceDiscovery, DiscoveredDevices, FlashError, Flasher, FlasherDeps};
pub use platformtools::{
    AdbTool, BootloaderLockStatus, FastbootError, FastbootTool, PlatformTools, PlatformToolsPath,
    ToolName,
};
pub use telemetry::{create_flash_span, generate_correlation_id, init_telemetry};
