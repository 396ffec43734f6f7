use crate::domain::{CommandHandle, GlobalCommand, PRIMARY_SERVICE, ServiceAction};
use crate::services::CommandRegistry;
use console::style;

/// First option number of the per-service blocks
pub const MENU_SERVICE_OFFSET: usize = 18;
pub const EXIT_CHOICE: &str = "0";

struct FixedOption {
    command: GlobalCommand,
    label: &'static str,
}

const fn option(command: GlobalCommand, label: &'static str) -> FixedOption {
    FixedOption { command, label }
}

const BASIC: [FixedOption; 6] = [
    option(GlobalCommand::Up, "Iniciar todos os serviços"),
    option(GlobalCommand::Down, "Parar todos os serviços"),
    option(GlobalCommand::Restart, "Reiniciar todos os serviços"),
    option(GlobalCommand::Rebuild, "Reconstruir e iniciar todos os serviços"),
    option(GlobalCommand::Logs, "Ver logs de todos os serviços"),
    option(GlobalCommand::Ps, "Ver status dos contêineres"),
];

const ADVANCED: [FixedOption; 7] = [
    option(GlobalCommand::Shell, "Abrir shell no backend"),
    option(GlobalCommand::Stats, "Estatísticas em tempo real"),
    option(GlobalCommand::Health, "Verificar saúde dos serviços"),
    option(GlobalCommand::Volumes, "Listar volumes"),
    option(GlobalCommand::Backup, "Fazer backup"),
    option(GlobalCommand::Monitor, "Monitor em tempo real"),
    option(GlobalCommand::Update, "Atualizar todas as imagens"),
];

const SETTINGS: [FixedOption; 4] = [
    option(GlobalCommand::Prune, "Limpar recursos não utilizados"),
    option(GlobalCommand::Clean, "Limpeza profunda"),
    option(GlobalCommand::Config, "Mostrar configuração atual"),
    option(GlobalCommand::Scan, "Escanear projeto em busca de serviços"),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuEntry {
    Exit,
    Command(CommandHandle),
}

/// Choice number to command mapping for one rendering of the menu
#[derive(Debug, Clone)]
pub struct MenuTable {
    entries: Vec<(usize, CommandHandle)>,
    services: Vec<String>,
}

impl MenuTable {
    pub fn build(registry: &CommandRegistry) -> Self {
        let mut entries: Vec<(usize, CommandHandle)> = BASIC
            .iter()
            .chain(ADVANCED.iter())
            .chain(SETTINGS.iter())
            .enumerate()
            .map(|(i, opt)| (i + 1, fixed_handle(opt.command)))
            .collect();

        let services: Vec<String> = registry.services().map(str::to_string).collect();
        let mut number = MENU_SERVICE_OFFSET;
        for service in &services {
            for action in ServiceAction::MENU {
                entries.push((number, CommandHandle::service(service, action)));
                number += 1;
            }
        }

        Self { entries, services }
    }

    /// Maps a typed choice to its entry; `None` for anything unrecognized
    pub fn lookup(&self, choice: &str) -> Option<MenuEntry> {
        let choice = choice.trim();
        if choice == EXIT_CHOICE {
            return Some(MenuEntry::Exit);
        }

        let number: usize = choice.parse().ok()?;
        self.entries
            .iter()
            .find(|(n, _)| *n == number)
            .map(|(_, handle)| MenuEntry::Command(handle.clone()))
    }

    /// Menu lines, header first, ready to print
    pub fn render(&self, project_name: &str) -> Vec<String> {
        let mut lines = vec![
            String::new(),
            style(format!("🐳 {project_name} Docker CLI 🐳")).bold().to_string(),
            String::new(),
        ];

        let mut number = 1;
        for (heading, options) in [
            ("🚀 Comandos Básicos:", &BASIC[..]),
            ("🛠️  Comandos Avançados:", &ADVANCED[..]),
            ("⚙️  Configurações:", &SETTINGS[..]),
        ] {
            if number > 1 {
                lines.push(String::new());
            }
            lines.push(style(heading).cyan().to_string());
            for opt in options {
                lines.push(format!("{number}. {}", opt.label));
                number += 1;
            }
        }

        let mut number = MENU_SERVICE_OFFSET;
        for service in &self.services {
            lines.push(String::new());
            lines.push(style(format!("{}:", capitalize(service))).cyan().to_string());
            for action in ServiceAction::MENU {
                lines.push(format!("{number}. {}", service_label(action, service)));
                number += 1;
            }
        }

        lines.push(String::new());
        lines.push(format!("{EXIT_CHOICE}. Sair"));
        lines.push(String::new());
        lines
    }
}

fn fixed_handle(command: GlobalCommand) -> CommandHandle {
    match command {
        GlobalCommand::Shell => CommandHandle::global_with(command, PRIMARY_SERVICE),
        _ => CommandHandle::global(command),
    }
}

fn service_label(action: ServiceAction, service: &str) -> String {
    match action {
        ServiceAction::Up => format!("Iniciar apenas o {service}"),
        ServiceAction::Restart => format!("Reiniciar o {service}"),
        ServiceAction::Rebuild => format!("Reconstruir e iniciar o {service}"),
        ServiceAction::Logs => format!("Ver logs do {service}"),
        ServiceAction::Shell => format!("Abrir shell no {service}"),
        ServiceAction::Inspect => format!("Inspecionar o {service}"),
    }
}

fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
