use anyhow::Result;

use crate::flash::{DeviceDiscovery, DiscoveredDevices};

pub struct DevicesCommand {
    pub json: bool,
}

impl DevicesCommand {
    pub fn new(json: bool) -> Self {
        Self { json }
    }

    pub fn execute(&self, discovery: &DeviceDiscovery) -> Result<()> {
        let devices = discovery.discover_devices()?;
        println!("{}", self.render(&devices)?);
        Ok(())
    }

    pub fn render(&self, devices: &DiscoveredDevices) -> Result<String> {
        if self.json {
            let list: Vec<_> = devices.values().collect();
            return Ok(serde_json::to_string_pretty(&list)?);
        }

        let mut out = format!("📱 {} device(s) attached\n", devices.len());
        for device in devices.values() {
            out.push_str(&format!(
                "   {:<20} {:<16} via {}\n",
                device.id, device.codename, device.discovery_tool
            ));
        }
        Ok(out.trim_end().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flash::Device;
    use crate::platformtools::ToolName;

    fn devices() -> DiscoveredDevices {
        let mut devices = DiscoveredDevices::new();
        devices.insert(
            "8AAY0GK9A".to_string(),
            Device::new("8AAY0GK9A", "crosshatch", ToolName::Fastboot),
        );
        devices
    }

    #[test]
    fn test_render_table() {
        let out = DevicesCommand::new(false).render(&devices()).unwrap();
        assert!(out.contains("1 device(s) attached"));
        assert!(out.contains("8AAY0GK9A"));
        assert!(out.contains("via fastboot"));
    }

    #[test]
    fn test_render_json() {
        let out = DevicesCommand::new(true).render(&devices()).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(parsed[0]["id"], "8AAY0GK9A");
        assert_eq!(parsed[0]["codename"], "crosshatch");
        assert_eq!(parsed[0]["discovery_tool"], "fastboot");
    }
}
