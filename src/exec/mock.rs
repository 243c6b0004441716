//! Scripted command runner for tests

use std::cell::RefCell;

use anyhow::{anyhow, Result};

use super::subprocess::CommandResult;
use super::{CommandRunner, Invocation};

enum Reply {
    Result(CommandResult),
    SpawnError(String),
}

/// Replies to commands by command-line prefix and records every call.
///
/// Unscripted commands succeed with empty output.
#[derive(Default)]
pub struct ScriptedRunner {
    replies: Vec<(String, Reply)>,
    calls: RefCell<Vec<Invocation>>,
}

impl ScriptedRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reply with `result` to commands starting with `prefix`
    pub fn on(mut self, prefix: &str, result: CommandResult) -> Self {
        self.replies.push((prefix.to_string(), Reply::Result(result)));
        self
    }

    /// Fail to start commands starting with `prefix`
    pub fn on_spawn_error(mut self, prefix: &str, message: &str) -> Self {
        self.replies
            .push((prefix.to_string(), Reply::SpawnError(message.to_string())));
        self
    }

    /// Command lines run so far, in order
    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().iter().map(Invocation::command_line).collect()
    }

    /// Every invocation run so far, in order
    pub fn invocations(&self) -> Vec<Invocation> {
        self.calls.borrow().clone()
    }

    pub fn was_called(&self, prefix: &str) -> bool {
        self.calls().iter().any(|c| c.starts_with(prefix))
    }
}

impl CommandRunner for ScriptedRunner {
    fn run(&self, invocation: &Invocation) -> Result<CommandResult> {
        self.calls.borrow_mut().push(invocation.clone());
        let line = invocation.command_line();

        match self.replies.iter().find(|(prefix, _)| line.starts_with(prefix.as_str())) {
            Some((_, Reply::Result(result))) => Ok(result.clone()),
            Some((_, Reply::SpawnError(message))) => Err(anyhow!("Failed to execute {}: {}", invocation.program, message)),
            None => Ok(CommandResult::ok("")),
        }
    }
}
