use anyhow::{Context, Result};
use std::path::PathBuf;

use crate::config::DeviceFlasherConfig;

pub struct ConfigCommand {
    pub write: Option<PathBuf>,
}

impl ConfigCommand {
    pub fn new(write: Option<PathBuf>) -> Self {
        Self { write }
    }

    pub fn execute(&self, config: &DeviceFlasherConfig) -> Result<()> {
        match &self.write {
            Some(path) => {
                config
                    .save_to_file(path)
                    .with_context(|| format!("Failed to write {}", path.display()))?;
                println!("✅ Configuration written to {}", path.display());
            }
            None => print!("{}", toml::to_string_pretty(config)?),
        }
        Ok(())
    }
}
