use crate::domain::{
    CommandHandle, Completion, ExecutionOutcome, GlobalCommand, Invocation, PRIMARY_SERVICE,
    PendingConfirmation, ProcessRunner, ProjectConfig, ServiceAction,
};
use crate::services::backup_service::{BackupService, BackupTarget};
use crate::services::health_service::HealthService;
use crate::services::workspace::Workspace;
use chrono::Utc;
use std::sync::Arc;
use tracing::{error, info, warn};

/// Shells tried, in order, when opening a shell in a container
pub const SHELL_CANDIDATES: [&str; 3] = ["/bin/bash", "/bin/sh", "/bin/ash"];

const STATS_FORMAT: &str =
    "table {{.Container}}\\t{{.CPUPerc}}\\t{{.MemUsage}}\\t{{.NetIO}}\\t{{.PIDs}}";

/// Runs command handles against the engine CLI.
///
/// Every invocation inside a handler runs to completion before the next one
/// starts, and a failed invocation never stops the ones after it.
pub struct CommandExecutor {
    runner: Arc<dyn ProcessRunner>,
    backups: BackupService,
    health: HealthService,
}

impl CommandExecutor {
    pub fn new(runner: Arc<dyn ProcessRunner>) -> Self {
        Self {
            backups: BackupService::new(runner.clone()),
            health: HealthService::new(runner.clone()),
            runner,
        }
    }

    /// Probe invocation used by the availability guard
    pub fn engine_available(&self, config: &ProjectConfig) -> bool {
        self.runner
            .run_captured(&Invocation::new(config.engine_binary(), ["info"]))
            .is_some()
    }

    pub fn execute(&self, workspace: &mut Workspace, handle: &CommandHandle) -> Completion {
        info!("executando {}", handle);

        match handle {
            CommandHandle::Global { command, argument } => {
                self.execute_global(workspace, *command, argument.as_deref())
            }
            CommandHandle::Service { service, action } => {
                self.execute_service(&workspace.config, service, *action).into()
            }
        }
    }

    /// Runs the follow-up of a pending confirmation once the operator answered
    pub fn settle(&self, pending: &PendingConfirmation, confirmed: bool) -> ExecutionOutcome {
        if !confirmed {
            println!("\n{}", pending.cancelled_message);
            return ExecutionOutcome::success();
        }

        let succeeded = self.run_all(&pending.on_confirm);
        println!("\n{}", pending.done_message);
        ExecutionOutcome::streamed(succeeded)
    }

    fn execute_global(
        &self,
        workspace: &mut Workspace,
        command: GlobalCommand,
        argument: Option<&str>,
    ) -> Completion {
        let config = &workspace.config;

        let outcome = match command {
            GlobalCommand::Up => {
                println!("🚢 Iniciando todos os serviços...");
                let ok = self.stream(compose(config, ["up", "-d"]));
                if ok {
                    println!("\n✅ Serviços iniciados com sucesso!");
                }
                print_access_urls(config);
                ExecutionOutcome::streamed(ok)
            }
            GlobalCommand::Down => {
                println!("🛑 Parando todos os serviços...");
                let ok = self.stream(compose(config, ["down"]));
                if ok {
                    println!("\n✅ Todos os serviços foram parados!");
                }
                ExecutionOutcome::streamed(ok)
            }
            GlobalCommand::Restart => {
                println!("🔄 Reiniciando todos os serviços...");
                let ok = self.stream(compose(config, ["restart"]));
                if ok {
                    println!("\n✅ Todos os serviços foram reiniciados!");
                }
                ExecutionOutcome::streamed(ok)
            }
            GlobalCommand::Rebuild => match argument {
                Some(service) => self.rebuild_service(config, service),
                None => {
                    println!("🏗️  Reconstruindo todos os serviços...");
                    let ok = self.run_all(&[
                        compose(config, ["build"]),
                        compose(config, ["up", "-d"]),
                    ]);
                    if ok {
                        println!("\n✅ Todos os serviços foram reconstruídos e iniciados!");
                    }
                    ExecutionOutcome::streamed(ok)
                }
            },
            GlobalCommand::Logs => self.logs(config, argument),
            GlobalCommand::Ps => {
                println!("📊 Status dos contêineres:");
                ExecutionOutcome::streamed(self.stream(compose(config, ["ps"])))
            }
            GlobalCommand::Prune => {
                println!("🧹 Removendo recursos não utilizados...");
                let ok = self.stream(engine(config, ["system", "prune", "-f"]));
                if ok {
                    println!("\n✅ Limpeza concluída!");
                }
                ExecutionOutcome::streamed(ok)
            }
            GlobalCommand::Config => {
                println!("⚙️  Configurações atuais:");
                match serde_json::to_string_pretty(config) {
                    Ok(json) => {
                        println!("{json}");
                        ExecutionOutcome::success()
                    }
                    Err(e) => {
                        error!("❌ Erro ao serializar configuração: {}", e);
                        ExecutionOutcome::failure()
                    }
                }
            }
            GlobalCommand::Scan => {
                println!("🔍 Escaneando projeto em busca de serviços...");
                let report = workspace.scan_and_save();
                if !report.added.is_empty() {
                    println!("➕ Adicionados: {}", report.added.join(", "));
                }
                println!("\n✅ Escaneamento concluído!");
                ExecutionOutcome::success()
            }
            GlobalCommand::Shell => {
                let service = argument.unwrap_or(PRIMARY_SERVICE);
                self.shell(config, service)
            }
            GlobalCommand::Stats => {
                println!("📊 Estatísticas dos contêineres em tempo real:");
                println!("💡 Pressione Ctrl+C para parar\n");
                ExecutionOutcome::streamed(
                    self.stream(engine(config, ["stats", "--format", STATS_FORMAT])),
                )
            }
            GlobalCommand::Health => {
                println!("🏥 Verificando saúde dos serviços...\n");
                for line in self.health.check_all(config) {
                    println!("{line}");
                }
                println!("\n✅ Verificação de saúde concluída!");
                ExecutionOutcome::success()
            }
            GlobalCommand::Volumes => {
                println!("💾 Volumes do projeto {}:", config.project_name);
                let filter = format!("name={}", config.slug());
                ExecutionOutcome::streamed(
                    self.stream(engine(config, ["volume", "ls", "--filter", filter.as_str()])),
                )
            }
            GlobalCommand::Backup => self.backup(config, argument),
            GlobalCommand::Restore => match self.backups.restore(config, argument) {
                Ok(ok) => ExecutionOutcome::streamed(ok),
                Err(e) => {
                    println!("❌ {e}");
                    ExecutionOutcome::failure()
                }
            },
            GlobalCommand::Monitor => {
                println!("📊 Iniciando monitoramento em tempo real...");
                println!("💡 Pressione Ctrl+C para parar o monitoramento\n");
                let script = monitor_script(config);
                let invocation = Invocation::new("sh", ["-c", script.as_str()]);
                ExecutionOutcome::streamed(self.stream(invocation))
            }
            GlobalCommand::Clean => {
                println!("🧹 Limpeza profunda...");
                return Completion::Pending(clean_confirmation(config));
            }
            GlobalCommand::Update => {
                println!("🔄 Atualizando todas as imagens...");
                let ok = self.run_all(&[
                    compose(config, ["pull"]),
                    compose(config, ["build", "--pull"]),
                    compose(config, ["up", "-d"]),
                ]);
                if ok {
                    println!("\n✅ Atualização concluída!");
                }
                ExecutionOutcome::streamed(ok)
            }
        };

        Completion::Immediate(outcome)
    }

    fn execute_service(
        &self,
        config: &ProjectConfig,
        service: &str,
        action: ServiceAction,
    ) -> ExecutionOutcome {
        match action {
            ServiceAction::Up => {
                println!("🚀 Iniciando apenas o {service}...");
                let ok = self.stream(compose(config, ["up", "-d", service]));
                if ok {
                    println!("\n✅ Serviço {service} iniciado com sucesso!");
                }
                ExecutionOutcome::streamed(ok)
            }
            ServiceAction::Restart => {
                println!("🔄 Reiniciando o {service}...");
                let ok = self.stream(compose(config, ["restart", service]));
                if ok {
                    println!("\n✅ Serviço {service} reiniciado com sucesso!");
                }
                ExecutionOutcome::streamed(ok)
            }
            ServiceAction::Rebuild => self.rebuild_service(config, service),
            ServiceAction::Logs => self.logs(config, Some(service)),
            ServiceAction::Shell => self.shell(config, service),
            ServiceAction::Inspect => {
                println!("🔍 Inspecionando o {service}...");
                let env_ok = self.stream(compose(config, ["exec", service, "env"]));
                println!("\n📊 Processos:");
                let ps_ok = self.stream(compose(config, ["exec", service, "ps", "aux"]));
                println!("\n✅ Inspeção do {service} concluída!");
                ExecutionOutcome::streamed(env_ok && ps_ok)
            }
        }
    }

    /// Build then up, the second step runs even if the build failed
    fn rebuild_service(&self, config: &ProjectConfig, service: &str) -> ExecutionOutcome {
        println!("🏗️  Reconstruindo o {service}...");
        let ok = self.run_all(&[
            compose(config, ["build", service]),
            compose(config, ["up", "-d", service]),
        ]);
        if ok {
            println!("\n✅ Serviço {service} reconstruído e iniciado!");
        }
        ExecutionOutcome::streamed(ok)
    }

    fn logs(&self, config: &ProjectConfig, service: Option<&str>) -> ExecutionOutcome {
        match service {
            Some(service) => println!("📜 Mostrando logs do serviço: {service}..."),
            None => println!("📜 Mostrando logs de todos os serviços..."),
        }
        println!("💡 Pressione Ctrl+C para parar de visualizar os logs\n");

        let mut invocation = compose(config, ["logs", "-f"]);
        if let Some(service) = service {
            invocation = invocation.arg(service);
        }
        ExecutionOutcome::streamed(self.stream(invocation))
    }

    /// Tries each candidate shell until one starts and exits cleanly
    fn shell(&self, config: &ProjectConfig, service: &str) -> ExecutionOutcome {
        println!("🐚 Abrindo shell no serviço: {service}...");
        println!("💡 Digite \"exit\" para sair do shell\n");

        for shell in SHELL_CANDIDATES {
            if self.stream(compose(config, ["exec", service, shell])) {
                println!("\n🐚 Shell do {service} fechado.");
                return ExecutionOutcome::streamed(true);
            }
            warn!("⚠️  {} indisponível em {}", shell, service);
        }

        ExecutionOutcome::streamed(false)
    }

    fn backup(&self, config: &ProjectConfig, service: Option<&str>) -> ExecutionOutcome {
        let target = match BackupTarget::parse(service) {
            Ok(target) => target,
            Err(e) => {
                println!("❌ {e}");
                return ExecutionOutcome::failure();
            }
        };

        match self.backups.backup(config, target, Utc::now()) {
            Ok(artifacts) => {
                ExecutionOutcome::streamed(artifacts.iter().all(|artifact| artifact.succeeded))
            }
            Err(e) => {
                error!("❌ {}", e);
                ExecutionOutcome::failure()
            }
        }
    }

    fn stream(&self, invocation: Invocation) -> bool {
        self.runner.run_streamed(&invocation)
    }

    /// Runs every invocation regardless of earlier failures
    fn run_all(&self, invocations: &[Invocation]) -> bool {
        invocations
            .iter()
            .map(|invocation| self.runner.run_streamed(invocation))
            .fold(true, |all, ok| all && ok)
    }
}

fn compose<'a>(config: &ProjectConfig, args: impl IntoIterator<Item = &'a str>) -> Invocation {
    Invocation::from_prefix(&config.engine_compose_invocation, args)
}

fn engine<'a>(config: &ProjectConfig, args: impl IntoIterator<Item = &'a str>) -> Invocation {
    Invocation::new(config.engine_binary(), args)
}

fn print_access_urls(config: &ProjectConfig) {
    for (name, spec) in config.services.iter() {
        if let Some(url) = config.access_url(name) {
            let description = spec
                .description
                .as_deref()
                .map(|d| format!(" - {d}"))
                .unwrap_or_default();
            println!("📋 {name}: {url}{description}");
        }
    }
}

fn clean_confirmation(config: &ProjectConfig) -> PendingConfirmation {
    PendingConfirmation {
        question: "⚠️  Isso removerá imagens, volumes e redes não utilizados. Continuar? (s/N): "
            .to_string(),
        on_confirm: vec![
            compose(config, ["down", "-v"]),
            engine(config, ["system", "prune", "-af", "--volumes"]),
            engine(config, ["network", "prune", "-f"]),
        ],
        done_message: "✅ Limpeza profunda concluída!".to_string(),
        cancelled_message: "❌ Operação cancelada.".to_string(),
    }
}

fn monitor_script(config: &ProjectConfig) -> String {
    let compose = &config.engine_compose_invocation;
    let engine = config.engine_binary();

    format!(
        r#"while true; do
  clear
  echo "🐳 Monitor - $(date)"
  echo "=================================="
  echo ""
  echo "📊 Status dos Serviços:"
  {compose} ps --format "table {{{{.Service}}}}\t{{{{.State}}}}\t{{{{.Ports}}}}"
  echo ""
  echo "💾 Uso de Recursos:"
  {engine} stats --no-stream \
    --format "table {{{{.Container}}}}\t{{{{.CPUPerc}}}}\t{{{{.MemUsage}}}}"
  echo ""
  echo "💽 Volumes:"
  {engine} system df --format "table {{{{.Type}}}}\t{{{{.Total}}}}\t{{{{.Active}}}}\t{{{{.Size}}}}"
  echo ""
  sleep 5
done"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::ConfigStore;
    use crate::test_support::MockRunner;
    use std::fs;
    use tempfile::TempDir;

    fn setup(temp: &TempDir) -> (CommandExecutor, Workspace, Arc<MockRunner>) {
        let mock = Arc::new(MockRunner::with_working_dir(temp.path()));
        let executor = CommandExecutor::new(mock.clone());
        let store = ConfigStore::new(temp.path().join("dockctl.config.json"));
        let workspace = Workspace::new(ProjectConfig::default(), temp.path(), store);
        (executor, workspace, mock)
    }

    fn run(
        executor: &CommandExecutor,
        workspace: &mut Workspace,
        handle: CommandHandle,
    ) -> ExecutionOutcome {
        match executor.execute(workspace, &handle) {
            Completion::Immediate(outcome) => outcome,
            Completion::Pending(_) => panic!("unexpected pending completion for {handle}"),
        }
    }

    #[test]
    fn rebuild_all_runs_up_even_if_build_fails() {
        let temp = TempDir::new().unwrap();
        let (executor, mut workspace, mock) = setup(&temp);
        mock.fail_on("compose build");

        let outcome = run(&executor, &mut workspace, CommandHandle::global(GlobalCommand::Rebuild));

        assert!(!outcome.succeeded);
        assert_eq!(
            mock.get_commands(),
            vec!["docker compose build", "docker compose up -d"]
        );
    }

    #[test]
    fn rebuild_single_service() {
        let temp = TempDir::new().unwrap();
        let (executor, mut workspace, mock) = setup(&temp);

        let outcome = run(
            &executor,
            &mut workspace,
            CommandHandle::global_with(GlobalCommand::Rebuild, "redis"),
        );

        assert!(outcome.succeeded);
        assert_eq!(
            mock.get_commands(),
            vec!["docker compose build redis", "docker compose up -d redis"]
        );
    }

    #[test]
    fn update_runs_all_three_steps() {
        let temp = TempDir::new().unwrap();
        let (executor, mut workspace, mock) = setup(&temp);
        mock.fail_on("compose pull");

        run(&executor, &mut workspace, CommandHandle::global(GlobalCommand::Update));

        assert_eq!(
            mock.get_commands(),
            vec![
                "docker compose pull",
                "docker compose build --pull",
                "docker compose up -d"
            ]
        );
    }

    #[test]
    fn simple_globals_map_to_engine_calls() {
        let temp = TempDir::new().unwrap();
        let (executor, mut workspace, mock) = setup(&temp);

        for command in [
            GlobalCommand::Up,
            GlobalCommand::Down,
            GlobalCommand::Restart,
            GlobalCommand::Ps,
            GlobalCommand::Prune,
            GlobalCommand::Volumes,
        ] {
            run(&executor, &mut workspace, CommandHandle::global(command));
        }

        assert_eq!(
            mock.get_commands(),
            vec![
                "docker compose up -d",
                "docker compose down",
                "docker compose restart",
                "docker compose ps",
                "docker system prune -f",
                "docker volume ls --filter name=dockerproject",
            ]
        );
    }

    #[test]
    fn logs_with_and_without_service() {
        let temp = TempDir::new().unwrap();
        let (executor, mut workspace, mock) = setup(&temp);

        run(&executor, &mut workspace, CommandHandle::global(GlobalCommand::Logs));
        let outcome = run(
            &executor,
            &mut workspace,
            CommandHandle::service("redis", ServiceAction::Logs),
        );

        assert!(outcome.streamed);
        assert_eq!(
            mock.get_commands(),
            vec!["docker compose logs -f", "docker compose logs -f redis"]
        );
    }

    #[test]
    fn shell_defaults_to_primary_and_stops_at_first_success() {
        let temp = TempDir::new().unwrap();
        let (executor, mut workspace, mock) = setup(&temp);
        mock.fail_on("exec backend /bin/bash");

        let outcome = run(&executor, &mut workspace, CommandHandle::global(GlobalCommand::Shell));

        assert!(outcome.succeeded);
        assert_eq!(
            mock.get_commands(),
            vec![
                "docker compose exec backend /bin/bash",
                "docker compose exec backend /bin/sh"
            ]
        );
    }

    #[test]
    fn shell_fails_when_no_candidate_starts() {
        let temp = TempDir::new().unwrap();
        let (executor, mut workspace, mock) = setup(&temp);
        mock.fail_on("exec redis");

        let outcome = run(
            &executor,
            &mut workspace,
            CommandHandle::service("redis", ServiceAction::Shell),
        );

        assert!(!outcome.succeeded);
        assert_eq!(mock.get_commands().len(), SHELL_CANDIDATES.len());
    }

    #[test]
    fn inspect_runs_env_then_ps() {
        let temp = TempDir::new().unwrap();
        let (executor, mut workspace, mock) = setup(&temp);

        run(
            &executor,
            &mut workspace,
            CommandHandle::service("mailhog", ServiceAction::Inspect),
        );

        assert_eq!(
            mock.get_commands(),
            vec![
                "docker compose exec mailhog env",
                "docker compose exec mailhog ps aux"
            ]
        );
    }

    #[test]
    fn stats_uses_table_format() {
        let temp = TempDir::new().unwrap();
        let (executor, mut workspace, mock) = setup(&temp);

        run(&executor, &mut workspace, CommandHandle::global(GlobalCommand::Stats));

        let commands = mock.get_commands();
        assert!(commands[0].starts_with("docker stats --format \"table {{.Container}}"));
    }

    #[test]
    fn monitor_runs_shell_loop() {
        let temp = TempDir::new().unwrap();
        let (executor, mut workspace, mock) = setup(&temp);

        run(&executor, &mut workspace, CommandHandle::global(GlobalCommand::Monitor));

        let commands = mock.get_commands();
        assert_eq!(commands.len(), 1);
        assert!(commands[0].starts_with("sh -c "));
        assert!(commands[0].contains("docker compose ps --format \"table {{.Service}}"));
        assert!(commands[0].contains("sleep 5"));
    }

    #[test]
    fn config_and_scan_do_not_touch_engine() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("docker-compose.yml"), "services:\n  worker:\n").unwrap();
        let (executor, mut workspace, mock) = setup(&temp);

        let config = run(&executor, &mut workspace, CommandHandle::global(GlobalCommand::Config));
        let scan = run(&executor, &mut workspace, CommandHandle::global(GlobalCommand::Scan));

        assert!(config.succeeded);
        assert!(scan.succeeded);

        assert!(mock.get_commands().is_empty());
        assert!(workspace.config.services.contains("worker"));
        let saved = workspace.store().try_load().unwrap().unwrap();
        assert!(saved.services.get("worker").unwrap().is_detected());
    }

    #[test]
    fn clean_is_pending_until_confirmed() {
        let temp = TempDir::new().unwrap();
        let (executor, mut workspace, mock) = setup(&temp);

        let Completion::Pending(pending) =
            executor.execute(&mut workspace, &CommandHandle::global(GlobalCommand::Clean))
        else {
            panic!("clean should wait for confirmation");
        };
        assert!(mock.get_commands().is_empty());

        let cancelled = executor.settle(&pending, false);
        assert!(cancelled.succeeded);
        assert!(mock.get_commands().is_empty());

        let confirmed = executor.settle(&pending, true);
        assert!(confirmed.succeeded);
        assert_eq!(
            mock.get_commands(),
            vec![
                "docker compose down -v",
                "docker system prune -af --volumes",
                "docker network prune -f"
            ]
        );
    }

    #[test]
    fn health_uses_captured_probes_only() {
        let temp = TempDir::new().unwrap();
        let (executor, mut workspace, mock) = setup(&temp);

        let outcome = run(&executor, &mut workspace, CommandHandle::global(GlobalCommand::Health));

        assert!(outcome.succeeded);
        assert!(!outcome.streamed);
        assert_eq!(mock.streamed_count(), 0);
        assert_eq!(mock.get_commands().len(), 3);
    }

    #[test]
    fn backup_unknown_service_is_rejected() {
        let temp = TempDir::new().unwrap();
        let (executor, mut workspace, mock) = setup(&temp);

        let outcome = run(
            &executor,
            &mut workspace,
            CommandHandle::global_with(GlobalCommand::Backup, "mailhog"),
        );

        assert!(!outcome.succeeded);
        assert!(mock.get_commands().is_empty());
        assert!(!temp.path().join("backups").exists());
    }

    #[test]
    fn engine_probe() {
        let temp = TempDir::new().unwrap();
        let (executor, workspace, mock) = setup(&temp);

        assert!(executor.engine_available(&workspace.config));
        mock.set_engine_down(true);
        assert!(!executor.engine_available(&workspace.config));
        assert_eq!(mock.get_commands(), vec!["docker info", "docker info"]);
    }

    #[test]
    fn respects_custom_compose_invocation() {
        let temp = TempDir::new().unwrap();
        let (executor, mut workspace, mock) = setup(&temp);
        workspace.config.engine_compose_invocation = "podman compose".to_string();

        run(&executor, &mut workspace, CommandHandle::global(GlobalCommand::Prune));
        run(&executor, &mut workspace, CommandHandle::service("redis", ServiceAction::Up));

        assert_eq!(
            mock.get_commands(),
            vec!["podman system prune -f", "podman compose up -d redis"]
        );
    }
}
