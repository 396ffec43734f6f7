pub mod cli;
pub mod domain;
pub mod infra;
pub mod services;

// Exposed for the integration tests in tests/
pub mod test_support;

pub use domain::{
    CommandHandle, Completion, Error, ExecutionOutcome, GlobalCommand, Invocation, ProcessRunner,
    ProjectConfig, ServiceAction,
};
pub use infra::{ConfigStore, SystemRunner};
pub use services::{CommandExecutor, CommandRegistry, Workspace};
