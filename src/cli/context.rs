use crate::domain::{CommandHandle, Completion, ProcessRunner};
use crate::services::{CommandExecutor, CommandRegistry, Workspace};
use std::fmt;
use std::sync::Arc;

/// How the tool was started
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// No command on the command line: menu loop with prompts
    Interactive,
    /// One command from argv, executed once
    Batch,
}

impl Mode {
    pub fn detect(command: Option<&str>) -> Self {
        match command {
            Some(_) => Self::Batch,
            None => Self::Interactive,
        }
    }

    pub fn is_interactive(&self) -> bool {
        matches!(self, Self::Interactive)
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Interactive => write!(f, "interativo"),
            Self::Batch => write!(f, "linha de comando"),
        }
    }
}

/// Everything a session needs, passed explicitly to the controller and the
/// batch router
pub struct AppContext {
    pub mode: Mode,
    pub workspace: Workspace,
    pub executor: CommandExecutor,
    registry: CommandRegistry,
}

impl AppContext {
    pub fn new(mode: Mode, workspace: Workspace, runner: Arc<dyn ProcessRunner>) -> Self {
        let registry = CommandRegistry::build(&workspace.config);
        Self {
            mode,
            workspace,
            executor: CommandExecutor::new(runner),
            registry,
        }
    }

    pub fn registry(&self) -> &CommandRegistry {
        &self.registry
    }

    pub fn engine_available(&self) -> bool {
        self.executor.engine_available(&self.workspace.config)
    }

    /// Runs `handle` and rebuilds the registry, since `scan` may have added
    /// services
    pub fn execute(&mut self, handle: &CommandHandle) -> Completion {
        let completion = self.executor.execute(&mut self.workspace, handle);
        self.registry = CommandRegistry::build(&self.workspace.config);
        completion
    }

    pub fn project_name(&self) -> &str {
        &self.workspace.config.project_name
    }
}
