use anyhow::Result;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use uuid::Uuid;

use crate::flash::Device;

/// Initialize structured logging.
///
/// Logs go to stderr so command output on stdout stays parseable.
/// `RUST_LOG` takes precedence over `level` when set.
pub fn init_telemetry(level: &str, json: bool) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(level))?;

    tracing_subscriber::registry()
        .with(filter)
        .with(json.then(|| {
            tracing_subscriber::fmt::layer()
                .json()
                .with_writer(std::io::stderr)
                .with_current_span(true)
                .with_span_list(true)
        }))
        .with((!json).then(|| {
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
        }))
        .try_init()?;

    tracing::debug!("device-flasher logging initialized");
    Ok(())
}

/// Generate a correlation ID for linking the log lines of one run
pub fn generate_correlation_id() -> String {
    Uuid::new_v4().to_string()
}

/// Span wrapping everything done to a single device
pub fn create_flash_span(device: &Device, correlation_id: &str) -> tracing::Span {
    tracing::info_span!(
        "flash",
        device.id = %device.id,
        device.codename = %device.codename,
        discovery.tool = %device.discovery_tool,
        correlation.id = correlation_id,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platformtools::ToolName;

    #[test]
    fn test_correlation_ids_are_unique() {
        assert_ne!(generate_correlation_id(), generate_correlation_id());
    }

    #[test]
    fn test_flash_span_can_be_entered_without_subscriber() {
        let device = Device::new("8AAY0GK9A", "crosshatch", ToolName::Adb);
        let span = create_flash_span(&device, "run-1");
        let _guard = span.enter();
    }
}
