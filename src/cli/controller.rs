use crate::cli::context::AppContext;
use crate::cli::menu::{MenuEntry, MenuTable};
use crate::cli::terminal::{Terminal, is_affirmative, is_quit};
use crate::domain::{
    CommandHandle, Completion, Continuation, Error, ExecutionOutcome, PendingConfirmation,
};
use std::time::Duration;
use tracing::{debug, warn};

pub const INVALID_CHOICE_DELAY: Duration = Duration::from_secs(2);

/// States of an interactive session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum State {
    GuardCheck,
    RecoveryWait,
    MenuDisplay,
    AwaitChoice,
    Executing(CommandHandle),
    AwaitContinue,
    Terminated,
}

/// Drives the menu loop: engine guard, menu, choice, execution and the
/// "run another command?" prompt
pub struct InteractionController<T: Terminal> {
    ctx: AppContext,
    terminal: T,
    table: Option<MenuTable>,
}

impl<T: Terminal> InteractionController<T> {
    pub fn new(ctx: AppContext, terminal: T) -> Self {
        Self {
            ctx,
            terminal,
            table: None,
        }
    }

    pub fn terminal(&self) -> &T {
        &self.terminal
    }

    pub fn context(&self) -> &AppContext {
        &self.ctx
    }

    /// Runs until the session terminates and returns the exit status
    pub fn run(&mut self) -> i32 {
        let mut state = State::GuardCheck;
        while state != State::Terminated {
            debug!("estado: {:?}", state);
            state = self.step(state);
        }
        0
    }

    /// Performs one transition
    pub fn step(&mut self, state: State) -> State {
        match state {
            State::GuardCheck => self.guard_check(),
            State::RecoveryWait => self.recovery_wait(),
            State::MenuDisplay => self.menu_display(),
            State::AwaitChoice => self.await_choice(),
            State::Executing(handle) => self.executing(&handle),
            State::AwaitContinue => self.await_continue(),
            State::Terminated => State::Terminated,
        }
    }

    fn guard_check(&mut self) -> State {
        if self.ctx.engine_available() {
            State::MenuDisplay
        } else {
            print_engine_hints(&mut self.terminal, self.ctx.workspace.config.engine_binary());
            State::RecoveryWait
        }
    }

    fn recovery_wait(&mut self) -> State {
        let answer = self.terminal.read_line(
            "🔄 Pressione Enter para tentar novamente ou digite \"sair\" para finalizar: ",
        );

        match answer {
            Some(answer) if !is_quit(&answer) => {
                self.terminal.clear();
                if self.ctx.engine_available() {
                    self.terminal.write_line("✅ Engine está funcionando agora!\n");
                    State::MenuDisplay
                } else {
                    print_engine_hints(
                        &mut self.terminal,
                        self.ctx.workspace.config.engine_binary(),
                    );
                    State::RecoveryWait
                }
            }
            _ => {
                let line = format!("\n👋 {} Docker CLI finalizado.", self.ctx.project_name());
                self.terminal.write_line(&line);
                State::Terminated
            }
        }
    }

    fn menu_display(&mut self) -> State {
        let table = MenuTable::build(self.ctx.registry());
        for line in table.render(self.ctx.project_name()) {
            self.terminal.write_line(&line);
        }
        self.table = Some(table);
        State::AwaitChoice
    }

    fn await_choice(&mut self) -> State {
        let Some(answer) = self.terminal.read_line("Digite sua escolha: ") else {
            return self.farewell();
        };

        let entry = self.table.as_ref().and_then(|table| table.lookup(&answer));
        match entry {
            Some(MenuEntry::Exit) => self.farewell(),
            Some(MenuEntry::Command(handle)) => {
                let rule = "=".repeat(60);
                self.terminal.write_line(&format!("\n{rule}"));
                self.terminal.write_line("🚀 Executando comando selecionado...");
                self.terminal.write_line(&format!("{rule}\n"));
                State::Executing(handle)
            }
            None => {
                self.terminal.write_line("\n❌ Opção inválida!");
                self.terminal.pause(INVALID_CHOICE_DELAY);
                self.terminal.clear();
                State::MenuDisplay
            }
        }
    }

    fn executing(&mut self, handle: &CommandHandle) -> State {
        let outcome = match self.ctx.execute(handle) {
            Completion::Immediate(outcome) => outcome,
            Completion::Pending(pending) => settle_pending(&self.ctx, &mut self.terminal, &pending),
        };

        if !outcome.succeeded {
            warn!("⚠️  {} terminou com falha", handle);
        }

        match handle.continuation() {
            Continuation::Prompt => State::AwaitContinue,
            Continuation::Foreground => State::Terminated,
        }
    }

    fn await_continue(&mut self) -> State {
        self.terminal.write_line(&format!("\n{}", "=".repeat(50)));
        let answer = self
            .terminal
            .read_line("\n🔄 Deseja executar outro comando? (s/N): ");

        match answer {
            Some(answer) if is_affirmative(&answer) => {
                self.terminal.clear();
                State::MenuDisplay
            }
            _ => self.farewell(),
        }
    }

    fn farewell(&mut self) -> State {
        let line = format!("\n👋 Obrigado por usar o {} Docker CLI!", self.ctx.project_name());
        self.terminal.write_line(&line);
        State::Terminated
    }
}

/// Remediation hints shown when the engine probe fails
pub fn print_engine_hints(terminal: &mut impl Terminal, engine: &str) {
    let error = Error::EngineUnavailable {
        engine: engine.to_string(),
    };
    terminal.write_line(&format!("\n❌ {error}"));
    terminal.write_line("\n🔧 Opções disponíveis:");
    terminal.write_line("1. Inicie o Docker Desktop");
    terminal.write_line("2. Execute: sudo systemctl start docker (Linux)");
    terminal.write_line("3. Execute: brew services start docker (macOS com Homebrew)");
    terminal.write_line("\n💡 Depois que a engine estiver rodando, execute o comando novamente.\n");
}

/// Asks the pending question and runs the follow-up on an affirmative
/// answer. A closed input stream counts as "no".
pub fn settle_pending(
    ctx: &AppContext,
    terminal: &mut impl Terminal,
    pending: &PendingConfirmation,
) -> ExecutionOutcome {
    let confirmed = terminal
        .read_line(&pending.question)
        .is_some_and(|answer| is_affirmative(&answer));
    ctx.executor.settle(pending, confirmed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::context::Mode;
    use crate::domain::{GlobalCommand, ProjectConfig};
    use crate::infra::ConfigStore;
    use crate::services::Workspace;
    use crate::test_support::{MockRunner, ScriptedTerminal};
    use std::sync::Arc;
    use tempfile::TempDir;

    fn controller(
        temp: &TempDir,
        input: &[&str],
    ) -> (InteractionController<ScriptedTerminal>, Arc<MockRunner>) {
        let mock = Arc::new(MockRunner::with_working_dir(temp.path()));
        let store = ConfigStore::new(temp.path().join("dockctl.config.json"));
        let workspace = Workspace::new(ProjectConfig::default(), temp.path(), store);
        let ctx = AppContext::new(Mode::Interactive, workspace, mock.clone());
        let terminal = ScriptedTerminal::new(input.iter().copied());
        (InteractionController::new(ctx, terminal), mock)
    }

    #[test]
    fn guard_passes_to_menu() {
        let temp = TempDir::new().unwrap();
        let (mut controller, _) = controller(&temp, &[]);

        assert_eq!(controller.step(State::GuardCheck), State::MenuDisplay);
        assert_eq!(controller.step(State::MenuDisplay), State::AwaitChoice);
    }

    #[test]
    fn guard_failure_enters_recovery() {
        let temp = TempDir::new().unwrap();
        let (mut controller, mock) = controller(&temp, &["", "sair"]);
        mock.set_engine_down(true);

        assert_eq!(controller.step(State::GuardCheck), State::RecoveryWait);
        assert_eq!(controller.step(State::RecoveryWait), State::RecoveryWait);
        assert_eq!(controller.step(State::RecoveryWait), State::Terminated);
        assert_eq!(mock.get_commands(), vec!["docker info", "docker info"]);
    }

    #[test]
    fn choice_maps_to_execution() {
        let temp = TempDir::new().unwrap();
        let (mut controller, _) = controller(&temp, &["2"]);

        controller.step(State::MenuDisplay);
        assert_eq!(
            controller.step(State::AwaitChoice),
            State::Executing(CommandHandle::global(GlobalCommand::Down))
        );
    }

    #[test]
    fn invalid_choice_pauses_and_redisplays() {
        let temp = TempDir::new().unwrap();
        let (mut controller, _) = controller(&temp, &["99"]);

        controller.step(State::MenuDisplay);
        assert_eq!(controller.step(State::AwaitChoice), State::MenuDisplay);
        assert_eq!(controller.terminal().pauses(), &[INVALID_CHOICE_DELAY]);
        assert_eq!(controller.terminal().clears(), 1);
    }

    #[test]
    fn foreground_commands_terminate() {
        let temp = TempDir::new().unwrap();
        let (mut controller, mock) = controller(&temp, &[]);

        let next = controller.step(State::Executing(CommandHandle::global(GlobalCommand::Logs)));

        assert_eq!(next, State::Terminated);
        assert_eq!(mock.get_commands(), vec!["docker compose logs -f"]);
    }

    #[test]
    fn wrapped_commands_prompt_even_on_failure() {
        let temp = TempDir::new().unwrap();
        let (mut controller, mock) = controller(&temp, &[]);
        mock.fail_on("compose ps");

        let next = controller.step(State::Executing(CommandHandle::global(GlobalCommand::Ps)));

        assert_eq!(next, State::AwaitContinue);
    }

    #[test]
    fn closed_input_ends_session() {
        let temp = TempDir::new().unwrap();
        let (mut controller, _) = controller(&temp, &[]);

        assert_eq!(controller.run(), 0);
        assert!(
            controller
                .terminal()
                .output_text()
                .contains("Obrigado por usar o Docker Project Docker CLI!")
        );
    }
}
