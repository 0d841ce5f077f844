//! Process launching seam.

use crate::error::CommandError;
use async_trait::async_trait;
use log::{debug, info};
use std::path::PathBuf;
use std::process::Stdio;
use tokio::process::Command;

/// Program invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    /// Command path.
    pub command: PathBuf,
    /// Command arguments.
    pub args: Vec<String>,
}

impl CommandSpec {
    /// Invocation of `command` with no arguments.
    pub fn new(command: impl Into<PathBuf>) -> Self {
        Self {
            command: command.into(),
            args: Vec::new(),
        }
    }

    /// Append arguments.
    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }
}

/// Result of a command that was waited on.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit status code if available.
    pub status_code: Option<i32>,
    /// Captured stdout content.
    pub stdout: String,
    /// Captured stderr content.
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.status_code == Some(0)
    }
}

/// Resolves and runs host programs.
#[async_trait]
pub trait ProcessRunner: Send + Sync {
    /// Resolve a program name to an executable path.
    fn resolve(&self, program: &str) -> Result<PathBuf, CommandError>;

    /// Start a program without waiting for it to exit.
    async fn spawn(&self, spec: CommandSpec) -> Result<(), CommandError>;

    /// Run a program to completion and capture its output.
    async fn run(&self, spec: CommandSpec) -> Result<CommandOutput, CommandError>;
}

/// Runs programs directly on the host.
#[derive(Debug, Clone, Copy, Default)]
pub struct HostProcessRunner;

impl HostProcessRunner {
    pub fn new() -> Self {
        Self
    }

    fn command(spec: &CommandSpec) -> Command {
        let mut command = Command::new(&spec.command);
        command.args(&spec.args);
        command
    }
}

#[async_trait]
impl ProcessRunner for HostProcessRunner {
    fn resolve(&self, program: &str) -> Result<PathBuf, CommandError> {
        which::which(program).map_err(|_| CommandError::ProgramNotFound(program.to_string()))
    }

    async fn spawn(&self, spec: CommandSpec) -> Result<(), CommandError> {
        let mut command = Self::command(&spec);
        command
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());
        let child = command.spawn()?;
        info!(
            "spawned detached process (command={}, pid={:?})",
            spec.command.display(),
            child.id()
        );
        Ok(())
    }

    async fn run(&self, spec: CommandSpec) -> Result<CommandOutput, CommandError> {
        debug!(
            "running process (command={}, args_len={})",
            spec.command.display(),
            spec.args.len()
        );
        let mut command = Self::command(&spec);
        command.stdin(Stdio::null());
        let output = command.output().await?;
        let result = CommandOutput {
            status_code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };
        debug!(
            "process finished (command={}, status={:?})",
            spec.command.display(),
            result.status_code
        );
        Ok(result)
    }
}
