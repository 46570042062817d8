//! Mock command runner for testing.
//!
//! `MockRunner` implements [`CommandRunner`] without starting processes.
//! Replies are matched against the rendered command line (see
//! [`ProcessCommand`]'s `Display`) by substring; the most recently added
//! matching rule wins. Unmatched commands succeed with empty output.
//!
//! # Example
//!
//! ```
//! use comfyup::shell::{CommandRunner, MockRunner, ProcessCommand};
//!
//! let mut runner = MockRunner::new();
//! runner.on("--version", "Python 3.11.4\n");
//!
//! let result = runner.run(&ProcessCommand::new("python3").arg("--version")).unwrap();
//! assert_eq!(result.stdout, "Python 3.11.4\n");
//! assert!(runner.was_called("python3 --version"));
//! ```

use std::cell::RefCell;
use std::io;
use std::time::Duration;

use super::command::{CommandResult, CommandRunner, ProcessCommand, ProcessState, RunningProcess};

type Handler = Box<dyn Fn(&ProcessCommand) -> io::Result<CommandResult>>;

struct Rule {
    pattern: String,
    handler: Handler,
}

/// Mock command runner.
///
/// Records every command passed to `run` and `spawn`.
#[derive(Default)]
pub struct MockRunner {
    rules: Vec<Rule>,
    calls: RefCell<Vec<ProcessCommand>>,
    spawned: RefCell<Vec<ProcessCommand>>,
    spawn_exit: Option<Option<i32>>,
    spawn_fails: bool,
}

impl std::fmt::Debug for MockRunner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockRunner")
            .field("rules", &self.rules.len())
            .field("calls", &self.calls.borrow().len())
            .finish()
    }
}

impl MockRunner {
    /// Create a runner where every command succeeds silently.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reply with success and the given stdout.
    pub fn on(&mut self, pattern: &str, stdout: &str) -> &mut Self {
        let stdout = stdout.to_string();
        self.on_with(pattern, move |_| {
            Ok(CommandResult::success(
                stdout.clone(),
                String::new(),
                Duration::ZERO,
            ))
        })
    }

    /// Reply with a non-zero exit code and the given stderr.
    pub fn fail(&mut self, pattern: &str, code: i32, stderr: &str) -> &mut Self {
        let stderr = stderr.to_string();
        self.on_with(pattern, move |_| {
            Ok(CommandResult::failure(
                Some(code),
                String::new(),
                stderr.clone(),
                Duration::ZERO,
            ))
        })
    }

    /// Behave as if the program does not exist.
    pub fn missing(&mut self, pattern: &str) -> &mut Self {
        self.on_with(pattern, |cmd| {
            Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("{} not found", cmd.program().to_string_lossy()),
            ))
        })
    }

    /// Reply with a custom handler (useful for filesystem side effects).
    pub fn on_with<F>(&mut self, pattern: &str, handler: F) -> &mut Self
    where
        F: Fn(&ProcessCommand) -> io::Result<CommandResult> + 'static,
    {
        self.rules.push(Rule {
            pattern: pattern.to_string(),
            handler: Box::new(handler),
        });
        self
    }

    /// Make spawned processes report that they already exited.
    pub fn spawn_exits_with(&mut self, code: Option<i32>) -> &mut Self {
        self.spawn_exit = Some(code);
        self
    }

    /// Make `spawn` fail.
    pub fn fail_spawn(&mut self) -> &mut Self {
        self.spawn_fails = true;
        self
    }

    /// All commands passed to `run`, in order.
    pub fn calls(&self) -> Vec<ProcessCommand> {
        self.calls.borrow().clone()
    }

    /// Rendered command lines passed to `run`, in order.
    pub fn call_lines(&self) -> Vec<String> {
        self.calls.borrow().iter().map(|c| c.to_string()).collect()
    }

    /// Check if any `run` command line contains `pattern`.
    pub fn was_called(&self, pattern: &str) -> bool {
        self.calls
            .borrow()
            .iter()
            .any(|c| c.to_string().contains(pattern))
    }

    /// All commands passed to `spawn`, in order.
    pub fn spawned(&self) -> Vec<ProcessCommand> {
        self.spawned.borrow().clone()
    }
}

impl CommandRunner for MockRunner {
    fn run(&self, command: &ProcessCommand) -> io::Result<CommandResult> {
        self.calls.borrow_mut().push(command.clone());
        let line = command.to_string();
        match self.rules.iter().rev().find(|r| line.contains(&r.pattern)) {
            Some(rule) => (rule.handler)(command),
            None => Ok(CommandResult::success(
                String::new(),
                String::new(),
                Duration::ZERO,
            )),
        }
    }

    fn spawn(&self, command: &ProcessCommand) -> io::Result<Box<dyn RunningProcess>> {
        self.spawned.borrow_mut().push(command.clone());
        if self.spawn_fails {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("{} not found", command.program().to_string_lossy()),
            ));
        }
        let state = match self.spawn_exit {
            Some(code) => ProcessState::Exited(code),
            None => ProcessState::Running,
        };
        Ok(Box::new(MockProcess { pid: 4242, state }))
    }
}

/// A fake process with a fixed state.
#[derive(Debug, Clone)]
pub struct MockProcess {
    pid: u32,
    state: ProcessState,
}

impl MockProcess {
    /// Create a fake process.
    pub fn new(pid: u32, state: ProcessState) -> Self {
        Self { pid, state }
    }
}

impl RunningProcess for MockProcess {
    fn id(&self) -> u32 {
        self.pid
    }

    fn state(&mut self) -> io::Result<ProcessState> {
        Ok(self.state)
    }
}
