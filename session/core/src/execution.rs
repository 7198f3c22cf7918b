//! Command Execution Lifecycle
//!
//! Drives a block through `Idle -> Running -> {Succeeded, Failed}`.
//!
//! The controller calls [`begin`] when a command is requested and emits a
//! run effect; the runtime executes it through a [`ShellRunner`] on its own
//! task and reports back with a `CommandCompleted` event, which the
//! controller applies with [`complete`]. The event loop never waits on the
//! process.
//!
//! # Process boundary
//!
//! Commands run as `<shell> -c <command>`. Standard output and standard
//! error are captured into one stream in the order chunks arrive. The exit
//! status (zero, non-zero, or a spawn failure) is the only signal that
//! separates success from failure.

use std::process::Stdio;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::io::AsyncReadExt;

use crate::block::{Block, BlockType, META_EXECUTING};
use crate::error::ExecutionError;

/// Prefixes that turn submitted input into a shell command
pub const COMMAND_PREFIXES: [char; 2] = ['/', '!'];

/// Where a block is in the execution lifecycle
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExecutionState {
    /// Never run, or not a command block
    Idle,
    /// Waiting for the shell
    Running,
    /// Last run exited zero
    Succeeded,
    /// Last run failed
    Failed,
}

impl ExecutionState {
    /// Derive the state from a block's fields
    #[must_use]
    pub fn of(block: &Block) -> Self {
        if block.is_executing() {
            return Self::Running;
        }
        match block.block_type {
            BlockType::Success => Self::Succeeded,
            BlockType::Error => Self::Failed,
            _ => Self::Idle,
        }
    }

    /// Whether `x` may start the block's command now
    #[must_use]
    pub fn can_start(self) -> bool {
        self != Self::Running
    }
}

/// How a command ended
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CommandStatus {
    /// Exit status zero
    Success,
    /// Non-zero exit; `code` is `None` when killed by a signal
    Exited {
        /// Exit code, if the process reported one
        code: Option<i32>,
    },
    /// The shell could not be started
    SpawnFailed(String),
}

/// Captured result of one shell invocation
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandOutcome {
    /// Interleaved stdout and stderr
    pub output: String,
    /// Exit status
    pub status: CommandStatus,
}

impl CommandOutcome {
    /// Outcome of a command that exited zero
    pub fn success(output: impl Into<String>) -> Self {
        Self {
            output: output.into(),
            status: CommandStatus::Success,
        }
    }

    /// Outcome of a command that exited non-zero
    pub fn exited(code: i32, output: impl Into<String>) -> Self {
        Self {
            output: output.into(),
            status: CommandStatus::Exited { code: Some(code) },
        }
    }

    /// Outcome of a shell that never started
    pub fn spawn_failed(message: impl Into<String>) -> Self {
        Self {
            output: String::new(),
            status: CommandStatus::SpawnFailed(message.into()),
        }
    }

    /// Whether the command succeeded
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status == CommandStatus::Success
    }

    /// Message stored in the block's `error` field on failure
    #[must_use]
    pub fn failure_message(&self) -> Option<String> {
        match &self.status {
            CommandStatus::Success => None,
            CommandStatus::Exited { code: Some(code) } => Some(format!("exit status {code}")),
            CommandStatus::Exited { code: None } => Some("terminated by signal".to_string()),
            CommandStatus::SpawnFailed(message) => Some(message.clone()),
        }
    }
}

/// Runs shell commands
///
/// Failures are part of the outcome; a runner never errors out of band.
#[async_trait]
pub trait ShellRunner: Send + Sync {
    /// Run `command` to completion
    async fn run(&self, command: &str) -> CommandOutcome;
}

/// The host shell, invoked as `<shell> -c <command>`
#[derive(Clone, Debug)]
pub struct HostShell {
    shell: String,
}

impl HostShell {
    /// Use `shell` as the interpreter
    pub fn new(shell: impl Into<String>) -> Self {
        Self {
            shell: shell.into(),
        }
    }

    /// Interpreter path
    #[must_use]
    pub fn shell(&self) -> &str {
        &self.shell
    }

    /// Spawn the shell and capture its combined output
    pub async fn execute(&self, command: &str) -> Result<CommandOutcome, ExecutionError> {
        let mut child = tokio::process::Command::new(&self.shell)
            .arg("-c")
            .arg(command)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| ExecutionError::Spawn {
                shell: self.shell.clone(),
                source,
            })?;

        let mut stdout = child.stdout.take().ok_or(ExecutionError::MissingPipe("stdout"))?;
        let mut stderr = child.stderr.take().ok_or(ExecutionError::MissingPipe("stderr"))?;

        let mut combined = Vec::new();
        let mut out_buf = [0u8; 4096];
        let mut err_buf = [0u8; 4096];
        let mut out_open = true;
        let mut err_open = true;

        while out_open || err_open {
            tokio::select! {
                read = stdout.read(&mut out_buf), if out_open => match read? {
                    0 => out_open = false,
                    n => combined.extend_from_slice(&out_buf[..n]),
                },
                read = stderr.read(&mut err_buf), if err_open => match read? {
                    0 => err_open = false,
                    n => combined.extend_from_slice(&err_buf[..n]),
                },
            }
        }

        let status = child.wait().await?;
        let output = String::from_utf8_lossy(&combined).into_owned();

        Ok(if status.success() {
            CommandOutcome::success(output)
        } else {
            CommandOutcome {
                output,
                status: CommandStatus::Exited {
                    code: status.code(),
                },
            }
        })
    }
}

#[async_trait]
impl ShellRunner for HostShell {
    async fn run(&self, command: &str) -> CommandOutcome {
        tracing::info!(shell = %self.shell, command = %command, "Running command");
        match self.execute(command).await {
            Ok(outcome) => {
                tracing::debug!(status = ?outcome.status, bytes = outcome.output.len(), "Command finished");
                outcome
            }
            Err(e) => {
                tracing::warn!("Command failed to run: {}", e);
                CommandOutcome::spawn_failed(e.to_string())
            }
        }
    }
}

/// Shell command carried by submitted input, if it has a command prefix
///
/// A leading `/` is stripped, then a leading `!`.
#[must_use]
pub fn command_from_input(input: &str) -> Option<&str> {
    if !input.starts_with(COMMAND_PREFIXES) {
        return None;
    }
    let rest = input.strip_prefix('/').unwrap_or(input);
    Some(rest.strip_prefix('!').unwrap_or(rest))
}

/// Move a block into `Running`
pub fn begin(block: &mut Block) {
    block.is_loading = true;
    block
        .metadata
        .insert(META_EXECUTING.to_string(), "true".to_string());
}

/// Move a running block into `Succeeded` or `Failed`
pub fn complete(block: &mut Block, outcome: CommandOutcome) {
    match outcome.failure_message() {
        Some(message) => {
            block.block_type = BlockType::Error;
            block.error = message;
        }
        None => {
            block.block_type = BlockType::Success;
            block.error.clear();
        }
    }
    block.output = outcome.output;
    block.is_loading = false;
    block.metadata.remove(META_EXECUTING);
    block.rebuild_viewport();
}

/// Canned result for input without a command prefix
///
/// Only drives the demo experience; prefixed input always reaches the shell.
pub fn apply_demo_reply(block: &mut Block, input: &str) {
    if input.starts_with("ls") {
        block.output = "file1.txt\nfile2.txt\nfile3.txt\ndirectory1\ndirectory2".to_string();
        block.block_type = BlockType::Success;
    } else if input.starts_with("error") {
        block.error = "Error: Command failed".to_string();
        block.block_type = BlockType::Error;
    } else {
        block.output = format!("Executed: {input}\nStatus: OK");
        block.block_type = BlockType::Success;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::BlockId;
    use pretty_assertions::assert_eq;

    fn command_block() -> Block {
        Block::new(BlockId(1), BlockType::Command, "User Input").with_command("echo hi")
    }

    #[test]
    fn test_command_from_input() {
        assert_eq!(command_from_input("/ls -la"), Some("ls -la"));
        assert_eq!(command_from_input("!echo hi"), Some("echo hi"));
        assert_eq!(command_from_input("/!pwd"), Some("pwd"));
        assert_eq!(command_from_input("ls"), None);
        assert_eq!(command_from_input(""), None);
    }

    #[test]
    fn test_begin_marks_running() {
        let mut block = command_block();
        assert_eq!(ExecutionState::of(&block), ExecutionState::Idle);
        begin(&mut block);
        assert!(block.is_loading);
        assert_eq!(block.metadata.get(META_EXECUTING).map(String::as_str), Some("true"));
        assert_eq!(ExecutionState::of(&block), ExecutionState::Running);
    }

    #[test]
    fn test_complete_success() {
        let mut block = command_block();
        begin(&mut block);
        complete(&mut block, CommandOutcome::success("hi\n"));

        assert_eq!(block.block_type, BlockType::Success);
        assert_eq!(block.output, "hi\n");
        assert!(block.error.is_empty());
        assert!(!block.is_loading);
        assert!(!block.is_executing());
        assert_eq!(block.viewport.content_lines, 1);
        assert_eq!(ExecutionState::of(&block), ExecutionState::Succeeded);
    }

    #[test]
    fn test_rerun_success_clears_previous_failure() {
        let mut block = command_block();
        begin(&mut block);
        complete(&mut block, CommandOutcome::exited(2, "boom\n"));
        assert_eq!(block.error, "exit status 2");

        begin(&mut block);
        complete(&mut block, CommandOutcome::success("ok"));

        assert_eq!(block.block_type, BlockType::Success);
        assert_eq!(block.output, "ok");
        assert!(block.error.is_empty());
        assert_eq!(ExecutionState::of(&block), ExecutionState::Succeeded);
    }

    #[test]
    fn test_complete_failure_keeps_output() {
        let mut block = command_block();
        begin(&mut block);
        complete(&mut block, CommandOutcome::exited(2, "no such file\n"));

        assert_eq!(block.block_type, BlockType::Error);
        assert_eq!(block.error, "exit status 2");
        assert_eq!(block.output, "no such file\n");
        assert!(!block.is_loading);
        assert_eq!(ExecutionState::of(&block), ExecutionState::Failed);
    }

    #[test]
    fn test_failure_messages() {
        assert_eq!(CommandOutcome::success("").failure_message(), None);
        assert_eq!(
            CommandOutcome {
                output: String::new(),
                status: CommandStatus::Exited { code: None }
            }
            .failure_message()
            .as_deref(),
            Some("terminated by signal")
        );
        assert_eq!(
            CommandOutcome::spawn_failed("no shell").failure_message().as_deref(),
            Some("no shell")
        );
    }

    #[test]
    fn test_demo_replies() {
        let mut block = command_block();
        apply_demo_reply(&mut block, "ls stuff");
        assert_eq!(block.block_type, BlockType::Success);
        assert!(block.output.contains("directory1"));

        let mut block = command_block();
        apply_demo_reply(&mut block, "error please");
        assert_eq!(block.block_type, BlockType::Error);
        assert_eq!(block.error, "Error: Command failed");

        let mut block = command_block();
        apply_demo_reply(&mut block, "hello");
        assert_eq!(block.output, "Executed: hello\nStatus: OK");
    }

    #[tokio::test]
    async fn test_host_shell_echo() {
        let shell = HostShell::new("sh");
        let outcome = shell.run("echo hello").await;
        assert!(outcome.is_success());
        assert!(outcome.output.contains("hello"));
    }

    #[tokio::test]
    async fn test_host_shell_false_fails() {
        let shell = HostShell::new("sh");
        let outcome = shell.run("false").await;
        assert_eq!(outcome.status, CommandStatus::Exited { code: Some(1) });
        assert_eq!(outcome.failure_message().as_deref(), Some("exit status 1"));
    }

    #[tokio::test]
    async fn test_host_shell_captures_stderr() {
        let shell = HostShell::new("sh");
        let outcome = shell.run("echo out; echo err 1>&2; exit 3").await;
        assert!(outcome.output.contains("out"));
        assert!(outcome.output.contains("err"));
        assert_eq!(outcome.status, CommandStatus::Exited { code: Some(3) });
    }

    #[tokio::test]
    async fn test_execute_reports_outcome() {
        let shell = HostShell::new("sh");
        let outcome = tokio_test::assert_ok!(shell.execute("printf 'a\\nb'").await);
        assert_eq!(outcome.output, "a\nb");
        assert!(outcome.is_success());
    }

    #[tokio::test]
    async fn test_missing_shell_is_spawn_failure() {
        let shell = HostShell::new("/nonexistent/gbloxs-shell");
        let outcome = shell.run("echo hi").await;
        assert!(matches!(outcome.status, CommandStatus::SpawnFailed(_)));
        assert!(outcome
            .failure_message()
            .unwrap()
            .contains("/nonexistent/gbloxs-shell"));
    }
}
