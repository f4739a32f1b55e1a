use anyhow::{bail, Context, Result};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::task::JoinSet;
use tracing::error;

use super::Toolchain;
use crate::factoryimage::FactoryImage;
use crate::flash::{Device, DiscoveredDevices, FlashError, Flasher, FlasherDeps};
use crate::telemetry::{create_flash_span, generate_correlation_id};

pub struct FlashCommand {
    pub image: PathBuf,
    pub parallel: bool,
}

/// Result of flashing one device
#[derive(Debug)]
pub struct FlashOutcome {
    pub device: Device,
    pub result: Result<(), FlashError>,
}

impl FlashCommand {
    pub fn new(image: PathBuf) -> Self {
        Self {
            image,
            parallel: false,
        }
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub async fn execute(&self, toolchain: &Toolchain) -> Result<()> {
        let image = FactoryImage::open(&self.image, &toolchain.host_os, toolchain.executor.clone())
            .with_context(|| format!("Failed to open factory image {}", self.image.display()))?;

        let devices = toolchain.discovery().discover_devices()?;
        if devices.len() > 1 && !self.parallel {
            bail!(
                "{} devices attached; connect one device or pass --parallel to flash them all",
                devices.len()
            );
        }

        for device in devices.values() {
            println!("📱 {} ({}) via {}", device.id, device.codename, device.discovery_tool);
        }
        println!();

        let flasher_for = |device: &Device| {
            Flasher::new(FlasherDeps {
                factory_image: Arc::new(image.for_device(&device.id)),
                platform_tools: toolchain.platform_tools.clone(),
                adb: toolchain.adb.clone(),
                fastboot: toolchain.fastboot.clone(),
            })
        };
        let outcomes = flash_devices(devices, flasher_for, &generate_correlation_id()).await?;
        report(&outcomes)
    }
}

/// Flash every device on its own blocking task.
///
/// `flasher_for` builds the flasher for one device, so the factory image
/// can be pinned to that device's serial.
pub async fn flash_devices<F>(
    devices: DiscoveredDevices,
    flasher_for: F,
    correlation_id: &str,
) -> Result<Vec<FlashOutcome>>
where
    F: Fn(&Device) -> Flasher,
{
    let mut tasks = JoinSet::new();
    for device in devices.into_values() {
        let flasher = flasher_for(&device);
        let span = create_flash_span(&device, correlation_id);
        tasks.spawn_blocking(move || {
            let _guard = span.enter();
            let result = flasher.flash(&device);
            FlashOutcome { device, result }
        });
    }

    let mut outcomes = Vec::new();
    while let Some(outcome) = tasks.join_next().await {
        outcomes.push(outcome.context("flashing task panicked")?);
    }
    outcomes.sort_by(|a, b| a.device.id.cmp(&b.device.id));
    Ok(outcomes)
}

fn report(outcomes: &[FlashOutcome]) -> Result<()> {
    let mut failed = 0;
    for outcome in outcomes {
        match &outcome.result {
            Ok(()) => println!("✅ {} flashed successfully", outcome.device.id),
            Err(e) => {
                failed += 1;
                error!(device.id = %outcome.device.id, "flashing failed: {}", e);
                println!("❌ {} failed: {}", outcome.device.id, e);
            }
        }
    }

    if failed > 0 {
        bail!("{} of {} device(s) failed to flash", failed, outcomes.len());
    }
    Ok(())
}
