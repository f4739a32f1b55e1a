use anyhow::{Context, Result};
use clap::Parser;

use device_flasher::cli::commands::{ConfigCommand, DevicesCommand, FlashCommand, Toolchain};
use device_flasher::cli::{Cli, Commands};
use device_flasher::config::DeviceFlasherConfig;
use device_flasher::telemetry::init_telemetry;

fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Err(e) = DeviceFlasherConfig::load_env_file() {
        eprintln!("WARNING: failed to load .env: {e}");
    }
    let config = DeviceFlasherConfig::load(cli.config.as_deref()).context("Failed to load configuration")?;

    let level = if cli.verbose { "debug" } else { config.logging.level.as_str() };
    init_telemetry(level, cli.json_logs || config.logging.json)?;

    match cli.command {
        Commands::Config { write } => ConfigCommand::new(write).execute(&config),
        Commands::Devices { json } => {
            let toolchain = Toolchain::from_config(&config, cli.platform_tools)?;
            DevicesCommand::new(json).execute(&toolchain.discovery())
        }
        Commands::Flash { image, parallel } => {
            let toolchain = Toolchain::from_config(&config, cli.platform_tools)?;
            let command = FlashCommand::new(image).with_parallel(parallel || config.flashing.parallel);
            tokio::runtime::Runtime::new()?.block_on(async { command.execute(&toolchain).await })
        }
    }
}
