//! Scripted command executor for tool wrapper tests; no processes are spawned

use std::collections::HashMap;
use std::sync::Mutex;

use super::command::{CommandError, CommandExecutor, CommandOptions, CommandOutput};

/// Replays canned responses keyed by `"program arg1 arg2"`.
///
/// A key can be scripted with several responses; they are handed out in order
/// and the last one repeats. Unscripted commands fail with `CommandNotFound`.
#[derive(Default)]
pub struct ScriptedExecutor {
    responses: Mutex<HashMap<String, Vec<Result<CommandOutput, CommandError>>>>,
    calls: Mutex<Vec<String>>,
    options: Mutex<Vec<CommandOptions>>,
}

impl ScriptedExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn expect_command(
        self,
        program: &str,
        args: &[&str],
        response: Result<CommandOutput, CommandError>,
    ) -> Self {
        let key = format!("{} {}", program, args.join(" "));
        self.responses
            .lock()
            .unwrap()
            .entry(key)
            .or_default()
            .push(response);
        self
    }

    pub fn ok(stdout: &str) -> Result<CommandOutput, CommandError> {
        Ok(CommandOutput {
            status_code: 0,
            stdout: stdout.to_string(),
            stderr: String::new(),
        })
    }

    pub fn ok_stderr(stderr: &str) -> Result<CommandOutput, CommandError> {
        Ok(CommandOutput {
            status_code: 0,
            stdout: String::new(),
            stderr: stderr.to_string(),
        })
    }

    pub fn failed(status_code: i32, stderr: &str) -> Result<CommandOutput, CommandError> {
        Ok(CommandOutput {
            status_code,
            stdout: String::new(),
            stderr: stderr.to_string(),
        })
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn options(&self) -> Vec<CommandOptions> {
        self.options.lock().unwrap().clone()
    }
}

impl CommandExecutor for ScriptedExecutor {
    fn execute_with(
        &self,
        program: &str,
        args: &[&str],
        options: &CommandOptions,
    ) -> Result<CommandOutput, CommandError> {
        let key = format!("{} {}", program, args.join(" "));
        self.calls.lock().unwrap().push(key.clone());
        self.options.lock().unwrap().push(options.clone());

        let mut responses = self.responses.lock().unwrap();
        match responses.get_mut(&key) {
            Some(queue) if queue.len() > 1 => queue.remove(0),
            Some(queue) if !queue.is_empty() => queue[0].clone(),
            _ => Err(CommandError::CommandNotFound {
                command: program.to_string(),
            }),
        }
    }
}
