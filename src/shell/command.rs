//! Argument-vector process execution.
//!
//! Every subprocess comfyup starts is described by a [`ProcessCommand`] and
//! executed through a [`CommandRunner`]. Arguments are passed to the OS as a
//! vector; nothing is ever interpreted by a shell, so paths containing spaces
//! or quotes need no escaping.

use std::ffi::{OsStr, OsString};
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use std::time::{Duration, Instant};

/// A program invocation: executable, arguments, working directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessCommand {
    program: OsString,
    args: Vec<OsString>,
    cwd: Option<PathBuf>,
    capture: bool,
}

impl ProcessCommand {
    /// Create a command for the given program.
    pub fn new(program: impl AsRef<OsStr>) -> Self {
        Self {
            program: program.as_ref().to_os_string(),
            args: Vec::new(),
            cwd: None,
            capture: false,
        }
    }

    /// Append one argument.
    pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
        self.args.push(arg.as_ref().to_os_string());
        self
    }

    /// Append several arguments.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.args
            .extend(args.into_iter().map(|a| a.as_ref().to_os_string()));
        self
    }

    /// Run the command from `dir`.
    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cwd = Some(dir.into());
        self
    }

    /// Capture stdout and stderr instead of inheriting the parent's.
    pub fn captured(mut self) -> Self {
        self.capture = true;
        self
    }

    /// The executable.
    pub fn program(&self) -> &OsStr {
        &self.program
    }

    /// The arguments, excluding the program.
    pub fn get_args(&self) -> &[OsString] {
        &self.args
    }

    /// The working directory, if one was set.
    pub fn cwd(&self) -> Option<&Path> {
        self.cwd.as_deref()
    }

    /// Whether output is captured.
    pub fn is_captured(&self) -> bool {
        self.capture
    }

    fn to_std(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);
        if let Some(cwd) = &self.cwd {
            cmd.current_dir(cwd);
        }
        cmd
    }
}

impl fmt::Display for ProcessCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program.to_string_lossy())?;
        for arg in &self.args {
            write!(f, " {}", arg.to_string_lossy())?;
        }
        Ok(())
    }
}

/// Result of executing a command to completion.
#[derive(Debug, Clone)]
pub struct CommandResult {
    /// Exit code (None if killed by signal).
    pub exit_code: Option<i32>,

    /// Standard output (empty unless captured).
    pub stdout: String,

    /// Standard error (empty unless captured).
    pub stderr: String,

    /// Execution duration.
    pub duration: Duration,

    /// Whether command succeeded (exit code 0).
    pub success: bool,
}

impl CommandResult {
    /// Create a success result.
    pub fn success(stdout: String, stderr: String, duration: Duration) -> Self {
        Self {
            exit_code: Some(0),
            stdout,
            stderr,
            duration,
            success: true,
        }
    }

    /// Create a failure result.
    pub fn failure(
        exit_code: Option<i32>,
        stdout: String,
        stderr: String,
        duration: Duration,
    ) -> Self {
        Self {
            exit_code,
            stdout,
            stderr,
            duration,
            success: false,
        }
    }

    /// Trimmed stderr, falling back to stdout when stderr is empty.
    pub fn diagnostic(&self) -> String {
        let stderr = self.stderr.trim();
        if stderr.is_empty() {
            self.stdout.trim().to_string()
        } else {
            stderr.to_string()
        }
    }
}

/// Observed state of a spawned process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessState {
    /// Still running.
    Running,
    /// Exited with the given code (None if killed by signal).
    Exited(Option<i32>),
}

/// A process started with [`CommandRunner::spawn`].
pub trait RunningProcess: fmt::Debug {
    /// OS process id.
    fn id(&self) -> u32;

    /// Check whether the process has exited, without blocking.
    fn state(&mut self) -> std::io::Result<ProcessState>;
}

/// Executes process commands.
///
/// Returns `Err` only when the program could not be started at all; a
/// program that ran and failed yields `Ok` with `success == false`.
pub trait CommandRunner {
    /// Run a command to completion.
    fn run(&self, command: &ProcessCommand) -> std::io::Result<CommandResult>;

    /// Start a command without waiting for it.
    ///
    /// The child inherits stdout/stderr and gets a null stdin.
    fn spawn(&self, command: &ProcessCommand) -> std::io::Result<Box<dyn RunningProcess>>;
}

/// [`CommandRunner`] backed by `std::process`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, command: &ProcessCommand) -> std::io::Result<CommandResult> {
        tracing::debug!("Running: {}", command);
        let start = Instant::now();
        let mut cmd = command.to_std();
        cmd.stdin(Stdio::null());

        let (status, stdout, stderr) = if command.is_captured() {
            let output = cmd.output()?;
            (
                output.status,
                String::from_utf8_lossy(&output.stdout).to_string(),
                String::from_utf8_lossy(&output.stderr).to_string(),
            )
        } else {
            cmd.stdout(Stdio::inherit()).stderr(Stdio::inherit());
            (cmd.status()?, String::new(), String::new())
        };

        let duration = start.elapsed();
        tracing::debug!(
            "Finished in {:?} with {:?}: {}",
            duration,
            status.code(),
            command
        );

        if status.success() {
            Ok(CommandResult::success(stdout, stderr, duration))
        } else {
            Ok(CommandResult::failure(
                status.code(),
                stdout,
                stderr,
                duration,
            ))
        }
    }

    fn spawn(&self, command: &ProcessCommand) -> std::io::Result<Box<dyn RunningProcess>> {
        tracing::debug!("Spawning: {}", command);
        let child = command
            .to_std()
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .spawn()?;
        Ok(Box::new(SystemProcess { child }))
    }
}

/// A real child process. Dropping it does not kill the child.
#[derive(Debug)]
struct SystemProcess {
    child: Child,
}

impl RunningProcess for SystemProcess {
    fn id(&self) -> u32 {
        self.child.id()
    }

    fn state(&mut self) -> std::io::Result<ProcessState> {
        Ok(match self.child.try_wait()? {
            Some(status) => ProcessState::Exited(status.code()),
            None => ProcessState::Running,
        })
    }
}
