use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub mod commands;

#[derive(Parser)]
#[command(name = "device-flasher")]
#[command(about = "Flash Android factory images onto attached devices")]
#[command(long_about = "device-flasher discovers devices over adb and fastboot, unlocks their \
                       bootloader, flashes a factory image and locks the bootloader again. \
                       Start with 'device-flasher devices' to see what is attached.")]
pub struct Cli {
    /// Directory containing adb and fastboot (overrides config and PATH lookup)
    #[arg(long, global = true)]
    pub platform_tools: Option<PathBuf>,

    /// Configuration file (defaults to ./device-flasher.toml when present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List devices visible to adb and fastboot
    Devices {
        /// Print the device list as JSON
        #[arg(long, help = "Print discovered devices as JSON")]
        json: bool,
    },
    /// Flash a factory image onto every attached device
    Flash {
        /// Extracted factory image directory (must contain flash-all.sh)
        #[arg(long, help = "Path to the extracted factory image directory")]
        image: PathBuf,
        /// Flash multiple devices at the same time
        #[arg(long, help = "Allow flashing more than one device, all at once")]
        parallel: bool,
    },
    /// Show the effective configuration
    Config {
        /// Write the effective configuration to a TOML file
        #[arg(long, help = "Write the configuration to this file instead of printing it")]
        write: Option<PathBuf>,
    },
}
