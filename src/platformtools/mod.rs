//! Android platform-tools: locating `adb`/`fastboot` and wrapping them.

pub mod adb;
pub mod fastboot;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::flash::PlatformToolsFlasher;

pub use adb::{AdbError, AdbTool};
pub use fastboot::{BootloaderLockStatus, FastbootError, FastbootTool};

/// The two platform tools that can discover a device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolName {
    Adb,
    Fastboot,
}

impl ToolName {
    /// Executable file name for the host OS (`adb.exe` on windows).
    pub fn executable(&self, host_os: &str) -> String {
        if host_os == "windows" {
            format!("{self}.exe")
        } else {
            self.to_string()
        }
    }
}

impl fmt::Display for ToolName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ToolName::Adb => write!(f, "adb"),
            ToolName::Fastboot => write!(f, "fastboot"),
        }
    }
}

/// Directory holding the platform-tools executables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformToolsPath(PathBuf);

impl PlatformToolsPath {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self(path.into())
    }

    pub fn as_path(&self) -> &Path {
        &self.0
    }

    pub fn executable(&self, tool: ToolName, host_os: &str) -> PathBuf {
        self.0.join(tool.executable(host_os))
    }
}

impl From<&str> for PlatformToolsPath {
    fn from(path: &str) -> Self {
        Self::new(path)
    }
}

impl fmt::Display for PlatformToolsPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.display())
    }
}

#[derive(Debug, Error)]
pub enum PlatformToolsError {
    #[error("{tool} executable not found at {path}")]
    MissingExecutable { tool: ToolName, path: PathBuf },
    #[error("platform-tools not found on PATH; install them or pass --platform-tools")]
    NotFound,
}

/// Resolved platform-tools installation.
#[derive(Debug, Clone)]
pub struct PlatformTools {
    path: PlatformToolsPath,
}

impl PlatformTools {
    pub fn new(dir: impl Into<PathBuf>, host_os: &str) -> Result<Self, PlatformToolsError> {
        let path = PlatformToolsPath::new(dir);
        for tool in [ToolName::Adb, ToolName::Fastboot] {
            let executable = path.executable(tool, host_os);
            if !executable.is_file() {
                return Err(PlatformToolsError::MissingExecutable {
                    tool,
                    path: executable,
                });
            }
        }
        Ok(Self { path })
    }

    /// Use `configured` when given, otherwise the first `PATH` entry that has
    /// both `adb` and `fastboot`.
    pub fn locate(configured: Option<&Path>, host_os: &str) -> Result<Self, PlatformToolsError> {
        if let Some(dir) = configured {
            return Self::new(dir, host_os);
        }

        let search_path = std::env::var_os("PATH").ok_or(PlatformToolsError::NotFound)?;
        std::env::split_paths(&search_path)
            .find_map(|dir| Self::new(dir, host_os).ok())
            .ok_or(PlatformToolsError::NotFound)
    }
}

impl PlatformToolsFlasher for PlatformTools {
    fn path(&self) -> PlatformToolsPath {
        self.path.clone()
    }
}
