//! Process execution.

pub mod command;
pub mod mock;

pub use command::{
    CommandResult, CommandRunner, ProcessCommand, ProcessState, RunningProcess, SystemRunner,
};
pub use mock::{MockProcess, MockRunner};
