pub mod batch;
pub mod context;
pub mod controller;
pub mod help;
pub mod menu;
pub mod terminal;

pub use context::{AppContext, Mode};
pub use controller::InteractionController;
pub use terminal::{ConsoleTerminal, Terminal};

use crate::infra::{ConfigStore, SystemRunner, plugins};
use crate::services::Workspace;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, warn};

/// What `main` parsed from the command line
#[derive(Debug, Clone, Default)]
pub struct LaunchOptions {
    pub command: Option<String>,
    pub subcommand: Option<String>,
    pub parameter: Option<String>,
    pub project_dir: PathBuf,
    pub config_path: PathBuf,
}

/// Loads the project, runs startup detection and plugin checks, then hands
/// over to the menu loop or the batch router. Returns the exit status.
pub fn run(options: LaunchOptions) -> i32 {
    let mode = Mode::detect(options.command.as_deref());
    debug!("modo {}", mode);
    println!("⚡ Iniciando Docker CLI...");

    let store = ConfigStore::new(&options.config_path);
    let mut workspace = Workspace::load(&options.project_dir, store);

    // `scan` merges on its own and persists
    if mode.is_interactive() {
        workspace.detect_services();
    }

    plugins::check_plugins(&workspace.config.plugins, workspace.project_dir());

    let runner = Arc::new(SystemRunner::new(&options.project_dir));
    let mut ctx = AppContext::new(mode, workspace, runner);
    let mut terminal = ConsoleTerminal::new();

    match options.command.as_deref() {
        None => {
            terminal.clear();
            terminal.write_line(&format!(
                "🐳 Bem-vindo ao {} Docker CLI! 🐳\n",
                ctx.project_name()
            ));
            InteractionController::new(ctx, terminal).run()
        }
        Some(command) => {
            if let Some(parameter) = &options.parameter {
                warn!("⚠️  Parâmetro extra ignorado: {}", parameter);
            }
            batch::run_batch(
                &mut ctx,
                &mut terminal,
                command,
                options.subcommand.as_deref(),
            )
        }
    }
}
