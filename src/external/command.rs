//! Base command execution abstraction
//!
//! Every platform tool wrapper goes through [`CommandExecutor`] so tests can
//! script tool output without spawning `adb` or `fastboot`.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Clone)]
pub struct CommandOutput {
    pub status_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.status_code == 0
    }

    /// Stdout followed by stderr. `fastboot getvar` answers on stderr.
    pub fn combined(&self) -> String {
        let mut combined = String::with_capacity(self.stdout.len() + self.stderr.len());
        combined.push_str(&self.stdout);
        combined.push_str(&self.stderr);
        combined
    }
}

/// Extra process settings for commands that need more than argv
#[derive(Debug, Clone, Default)]
pub struct CommandOptions {
    pub current_dir: Option<PathBuf>,
    pub env: Vec<(String, String)>,
}

#[derive(Debug, Error, Clone)]
pub enum CommandError {
    #[error("Command not found: {command}")]
    CommandNotFound { command: String },
    #[error("IO error: {message}")]
    Io { message: String },
}

/// Trait for executing external commands
///
/// A non-zero exit status is reported through [`CommandOutput`], not as an
/// error; callers decide what a failed exit means for their tool.
pub trait CommandExecutor: Send + Sync {
    fn execute(&self, program: &str, args: &[&str]) -> Result<CommandOutput, CommandError> {
        self.execute_with(program, args, &CommandOptions::default())
    }

    fn execute_with(
        &self,
        program: &str,
        args: &[&str],
        options: &CommandOptions,
    ) -> Result<CommandOutput, CommandError>;
}

/// Real implementation using std::process::Command
pub struct ProcessCommandExecutor;

impl CommandExecutor for ProcessCommandExecutor {
    fn execute_with(
        &self,
        program: &str,
        args: &[&str],
        options: &CommandOptions,
    ) -> Result<CommandOutput, CommandError> {
        use std::process::Command;

        let mut command = Command::new(program);
        command.args(args);
        if let Some(dir) = &options.current_dir {
            command.current_dir(dir);
        }
        for (key, value) in &options.env {
            command.env(key, value);
        }

        tracing::debug!(program, ?args, "running external command");

        let output = command.output().map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                CommandError::CommandNotFound {
                    command: program.to_string(),
                }
            } else {
                CommandError::Io { message: e.to_string() }
            }
        })?;

        Ok(CommandOutput {
            status_code: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        })
    }
}
