//! Subprocess execution behind a mockable runner

use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};

use crate::error::DevflowError;

/// Result of a subprocess execution
#[derive(Debug, Clone, Default)]
pub struct CommandResult {
    /// Whether the command succeeded (exit code 0)
    pub success: bool,

    /// Process exit code (-1 when killed by a signal)
    pub exit_code: i32,

    /// Captured standard output (empty for inherited I/O)
    pub stdout: String,

    /// Captured standard error (empty for inherited I/O)
    pub stderr: String,

    /// Execution duration
    pub duration: Duration,
}

impl CommandResult {
    /// Create a CommandResult from an exit status
    pub fn from_status(status: ExitStatus, stdout: String, stderr: String, duration: Duration) -> Self {
        let exit_code = status.code().unwrap_or(-1);
        Self {
            success: status.success(),
            exit_code,
            stdout,
            stderr,
            duration,
        }
    }

    /// A successful result with the given stdout
    #[cfg(test)]
    pub fn ok(stdout: impl Into<String>) -> Self {
        Self {
            success: true,
            exit_code: 0,
            stdout: stdout.into(),
            ..Default::default()
        }
    }

    /// A failed result with the given exit code and stderr
    #[cfg(test)]
    pub fn failed(exit_code: i32, stderr: impl Into<String>) -> Self {
        Self {
            success: false,
            exit_code,
            stderr: stderr.into(),
            ..Default::default()
        }
    }
}

/// A single external command to run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
    pub cwd: Option<PathBuf>,
    /// Stream output to the terminal instead of capturing it
    pub inherit_io: bool,
}

impl Invocation {
    pub fn new<I, S>(program: &str, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.to_string(),
            args: args.into_iter().map(Into::into).collect(),
            cwd: None,
            inherit_io: false,
        }
    }

    pub fn current_dir(mut self, dir: &Path) -> Self {
        self.cwd = Some(dir.to_path_buf());
        self
    }

    pub fn inherit_io(mut self) -> Self {
        self.inherit_io = true;
        self
    }

    /// Program and arguments joined by spaces, for logs and error messages
    pub fn command_line(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Runs external commands.
///
/// Implementations return `Err` only when the process could not be started;
/// a non-zero exit is reported through [`CommandResult::success`].
pub trait CommandRunner {
    fn run(&self, invocation: &Invocation) -> Result<CommandResult>;

    /// Run and turn a non-zero exit into [`DevflowError::CommandFailed`]
    fn run_checked(&self, invocation: &Invocation) -> Result<CommandResult> {
        let result = self.run(invocation)?;
        if !result.success {
            return Err(DevflowError::CommandFailed {
                command: invocation.command_line(),
                exit_code: result.exit_code,
                stderr: result.stderr,
            }
            .into());
        }
        Ok(result)
    }
}

/// Runner backed by real processes
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, invocation: &Invocation) -> Result<CommandResult> {
        log::debug!(
            "running `{}` in {}",
            invocation.command_line(),
            invocation
                .cwd
                .as_deref()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| ".".to_string())
        );

        let start = Instant::now();
        let program = &invocation.program;

        let mut cmd = Command::new(program);
        cmd.args(&invocation.args);
        if let Some(ref cwd) = invocation.cwd {
            cmd.current_dir(cwd);
        }

        let result = if invocation.inherit_io {
            // Inherit stdin/stdout/stderr for interactive commands
            cmd.stdin(Stdio::inherit());
            cmd.stdout(Stdio::inherit());
            cmd.stderr(Stdio::inherit());

            let status = cmd
                .status()
                .with_context(|| format!("Failed to execute {}", program))?;

            CommandResult::from_status(status, String::new(), String::new(), start.elapsed())
        } else {
            let output = cmd
                .output()
                .with_context(|| format!("Failed to execute {}", program))?;

            let stdout = String::from_utf8_lossy(&output.stdout).to_string();
            let stderr = String::from_utf8_lossy(&output.stderr).to_string();

            CommandResult::from_status(output.status, stdout, stderr, start.elapsed())
        };

        log::debug!(
            "`{}` exited with {} after {:?}",
            invocation.command_line(),
            result.exit_code,
            result.duration
        );
        Ok(result)
    }
}

/// Check if a command exists in PATH
pub fn command_exists(program: &str) -> bool {
    which::which(program).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_line() {
        let inv = Invocation::new("git", ["push", "origin", "main"]);
        assert_eq!(inv.command_line(), "git push origin main");
        assert!(!inv.inherit_io);
        assert!(inv.cwd.is_none());
    }

    #[test]
    fn test_run_checked_maps_failure() {
        struct Failing;
        impl CommandRunner for Failing {
            fn run(&self, _invocation: &Invocation) -> Result<CommandResult> {
                Ok(CommandResult::failed(1, "fatal: not a git repository"))
            }
        }

        let err = Failing
            .run_checked(&Invocation::new("git", ["status"]))
            .unwrap_err();
        match err.downcast_ref::<DevflowError>() {
            Some(DevflowError::CommandFailed {
                command,
                exit_code,
                stderr,
            }) => {
                assert_eq!(command, "git status");
                assert_eq!(*exit_code, 1);
                assert!(stderr.contains("not a git repository"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_system_runner_captures_output() {
        let result = SystemRunner
            .run(&Invocation::new("sh", ["-c", "echo out; echo err >&2; exit 3"]))
            .unwrap();
        assert!(!result.success);
        assert_eq!(result.exit_code, 3);
        assert_eq!(result.stdout.trim(), "out");
        assert_eq!(result.stderr.trim(), "err");
    }

    #[test]
    fn test_system_runner_spawn_error() {
        let result = SystemRunner.run(&Invocation::new("devflow-no-such-binary-xyz", Vec::<String>::new()));
        assert!(result.is_err());
    }
}
