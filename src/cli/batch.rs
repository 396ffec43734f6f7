use crate::cli::context::AppContext;
use crate::cli::controller::{print_engine_hints, settle_pending};
use crate::cli::help::help_text;
use crate::cli::terminal::Terminal;
use crate::domain::{Completion, GlobalCommand};
use tracing::warn;

/// Executes exactly one command from argv and returns the exit status.
///
/// Unknown commands and invalid service subcommands are reported and exit
/// normally; only an unreachable engine yields a non-zero status.
pub fn run_batch(
    ctx: &mut AppContext,
    terminal: &mut impl Terminal,
    command: &str,
    subcommand: Option<&str>,
) -> i32 {
    let needs_engine = ctx.registry().is_service(command)
        || GlobalCommand::from_name(command).is_none_or(GlobalCommand::requires_engine);

    if needs_engine && !ctx.engine_available() {
        print_engine_hints(terminal, ctx.workspace.config.engine_binary());
        return 1;
    }

    let handle = match ctx.registry().resolve(command, subcommand) {
        Ok(handle) => handle,
        Err(e) => {
            terminal.write_line(&e.to_string());
            if !ctx.registry().is_service(command) {
                terminal.write_line(&help_text(&ctx.workspace.config));
            }
            return 0;
        }
    };

    let outcome = match ctx.execute(&handle) {
        Completion::Immediate(outcome) => outcome,
        Completion::Pending(pending) => settle_pending(ctx, terminal, &pending),
    };
    if !outcome.succeeded {
        warn!("⚠️  {} terminou com falha", handle);
    }

    0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::context::Mode;
    use crate::domain::ProjectConfig;
    use crate::infra::ConfigStore;
    use crate::services::Workspace;
    use crate::test_support::{MockRunner, ScriptedTerminal};
    use std::sync::Arc;
    use tempfile::TempDir;

    fn context(temp: &TempDir) -> (AppContext, Arc<MockRunner>) {
        let mock = Arc::new(MockRunner::with_working_dir(temp.path()));
        let store = ConfigStore::new(temp.path().join("dockctl.config.json"));
        let workspace = Workspace::new(ProjectConfig::default(), temp.path(), store);
        (AppContext::new(Mode::Batch, workspace, mock.clone()), mock)
    }

    #[test]
    fn engine_down_exits_one() {
        let temp = TempDir::new().unwrap();
        let (mut ctx, mock) = context(&temp);
        mock.set_engine_down(true);
        let mut terminal = ScriptedTerminal::default();

        assert_eq!(run_batch(&mut ctx, &mut terminal, "up", None), 1);
        assert_eq!(mock.get_commands(), vec!["docker info"]);
        assert!(terminal.output_text().contains("indisponível"));
    }

    #[test]
    fn config_skips_engine_probe() {
        let temp = TempDir::new().unwrap();
        let (mut ctx, mock) = context(&temp);
        mock.set_engine_down(true);
        let mut terminal = ScriptedTerminal::default();

        assert_eq!(run_batch(&mut ctx, &mut terminal, "config", None), 0);
        assert!(mock.get_commands().is_empty());
    }

    #[test]
    fn unknown_command_prints_help() {
        let temp = TempDir::new().unwrap();
        let (mut ctx, _) = context(&temp);
        let mut terminal = ScriptedTerminal::default();

        assert_eq!(run_batch(&mut ctx, &mut terminal, "frobnicate", None), 0);
        let text = terminal.output_text();
        assert!(text.contains("Comando não reconhecido"));
        assert!(text.contains("Serviços disponíveis:"));
    }

    #[test]
    fn service_subcommand_runs_once() {
        let temp = TempDir::new().unwrap();
        let (mut ctx, mock) = context(&temp);
        let mut terminal = ScriptedTerminal::default();

        assert_eq!(run_batch(&mut ctx, &mut terminal, "redis", Some("restart")), 0);
        assert_eq!(
            mock.get_commands(),
            vec!["docker info", "docker compose restart redis"]
        );
        assert!(terminal.prompts().is_empty());
    }

    #[test]
    fn invalid_service_subcommand_is_reported() {
        let temp = TempDir::new().unwrap();
        let (mut ctx, mock) = context(&temp);
        let mut terminal = ScriptedTerminal::default();

        assert_eq!(run_batch(&mut ctx, &mut terminal, "redis", Some("dance")), 0);
        assert!(terminal.output_text().starts_with("Comando inválido para redis"));
        assert_eq!(mock.get_commands(), vec!["docker info"]);
    }

    #[test]
    fn clean_asks_before_running() {
        let temp = TempDir::new().unwrap();
        let (mut ctx, mock) = context(&temp);
        let mut terminal = ScriptedTerminal::new(["n"]);

        assert_eq!(run_batch(&mut ctx, &mut terminal, "clean", None), 0);
        assert_eq!(terminal.prompts().len(), 1);
        assert_eq!(mock.get_commands(), vec!["docker info"]);
    }
}
