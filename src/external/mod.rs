//! External tool abstractions
//!
//! Trait-based process execution shared by the `adb`, `fastboot` and
//! flash-all wrappers, so tool output can be scripted in tests.

pub mod command;

#[cfg(test)]
pub mod mocks;

pub use command::{CommandError, CommandExecutor, CommandOptions, CommandOutput, ProcessCommandExecutor};
