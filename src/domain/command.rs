use std::fmt;

/// Commands available regardless of the configured services
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GlobalCommand {
    Up,
    Down,
    Restart,
    Rebuild,
    Logs,
    Ps,
    Prune,
    Config,
    Scan,
    Shell,
    Stats,
    Health,
    Volumes,
    Backup,
    Restore,
    Monitor,
    Clean,
    Update,
}

impl GlobalCommand {
    pub const ALL: [GlobalCommand; 18] = [
        Self::Up,
        Self::Down,
        Self::Restart,
        Self::Rebuild,
        Self::Logs,
        Self::Ps,
        Self::Prune,
        Self::Config,
        Self::Scan,
        Self::Shell,
        Self::Stats,
        Self::Health,
        Self::Volumes,
        Self::Backup,
        Self::Restore,
        Self::Monitor,
        Self::Clean,
        Self::Update,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Up => "up",
            Self::Down => "down",
            Self::Restart => "restart",
            Self::Rebuild => "rebuild",
            Self::Logs => "logs",
            Self::Ps => "ps",
            Self::Prune => "prune",
            Self::Config => "config",
            Self::Scan => "scan",
            Self::Shell => "shell",
            Self::Stats => "stats",
            Self::Health => "health",
            Self::Volumes => "volumes",
            Self::Backup => "backup",
            Self::Restore => "restore",
            Self::Monitor => "monitor",
            Self::Clean => "clean",
            Self::Update => "update",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|cmd| cmd.name() == name)
    }

    /// `config` and `scan` never touch the engine
    pub fn requires_engine(self) -> bool {
        !matches!(self, Self::Config | Self::Scan)
    }

    pub fn continuation(self) -> Continuation {
        match self {
            Self::Logs | Self::Monitor | Self::Stats | Self::Shell => Continuation::Foreground,
            _ => Continuation::Prompt,
        }
    }
}

/// Commands bound to exactly one configured service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ServiceAction {
    Up,
    Restart,
    Rebuild,
    Logs,
    Shell,
    Inspect,
}

impl ServiceAction {
    pub const ALL: [ServiceAction; 6] = [
        Self::Up,
        Self::Restart,
        Self::Rebuild,
        Self::Logs,
        Self::Shell,
        Self::Inspect,
    ];

    /// Actions offered per service in the interactive menu, in display order
    pub const MENU: [ServiceAction; 4] = [Self::Up, Self::Restart, Self::Rebuild, Self::Logs];

    pub fn name(self) -> &'static str {
        match self {
            Self::Up => "up",
            Self::Restart => "restart",
            Self::Rebuild => "rebuild",
            Self::Logs => "logs",
            Self::Shell => "shell",
            Self::Inspect => "inspect",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|action| action.name() == name)
    }

    pub fn continuation(self) -> Continuation {
        match self {
            Self::Logs | Self::Shell => Continuation::Foreground,
            _ => Continuation::Prompt,
        }
    }
}

/// What the interactive controller does once a command has settled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Continuation {
    /// Ask whether to run another command
    Prompt,
    /// Long-running command streamed to the terminal; the session ends with it
    Foreground,
}

/// A resolved, invocable command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandHandle {
    Global {
        command: GlobalCommand,
        argument: Option<String>,
    },
    Service {
        service: String,
        action: ServiceAction,
    },
}

impl CommandHandle {
    pub fn global(command: GlobalCommand) -> Self {
        Self::Global {
            command,
            argument: None,
        }
    }

    pub fn global_with(command: GlobalCommand, argument: impl Into<String>) -> Self {
        Self::Global {
            command,
            argument: Some(argument.into()),
        }
    }

    pub fn service(service: impl Into<String>, action: ServiceAction) -> Self {
        Self::Service {
            service: service.into(),
            action,
        }
    }

    pub fn continuation(&self) -> Continuation {
        match self {
            Self::Global { command, .. } => command.continuation(),
            Self::Service { action, .. } => action.continuation(),
        }
    }
}

impl fmt::Display for CommandHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Global {
                command,
                argument: Some(arg),
            } => write!(f, "{} {arg}", command.name()),
            Self::Global { command, .. } => write!(f, "{}", command.name()),
            Self::Service { service, action } => write!(f, "{service} {}", action.name()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn global_names_round_trip() {
        for cmd in GlobalCommand::ALL {
            assert_eq!(GlobalCommand::from_name(cmd.name()), Some(cmd));
        }
        assert_eq!(GlobalCommand::from_name("inspect"), None);
    }

    #[test]
    fn foreground_commands_skip_continuation() {
        let foreground: Vec<_> = GlobalCommand::ALL
            .into_iter()
            .filter(|cmd| cmd.continuation() == Continuation::Foreground)
            .collect();

        assert_eq!(
            foreground,
            vec![
                GlobalCommand::Logs,
                GlobalCommand::Shell,
                GlobalCommand::Stats,
                GlobalCommand::Monitor
            ]
        );
        assert_eq!(GlobalCommand::Clean.continuation(), Continuation::Prompt);
    }

    #[test]
    fn service_continuation_table() {
        assert_eq!(ServiceAction::Up.continuation(), Continuation::Prompt);
        assert_eq!(ServiceAction::Restart.continuation(), Continuation::Prompt);
        assert_eq!(ServiceAction::Rebuild.continuation(), Continuation::Prompt);
        assert_eq!(ServiceAction::Inspect.continuation(), Continuation::Prompt);
        assert_eq!(ServiceAction::Logs.continuation(), Continuation::Foreground);
        assert_eq!(ServiceAction::Shell.continuation(), Continuation::Foreground);
    }

    #[test]
    fn only_config_and_scan_skip_engine() {
        let offline: Vec<_> = GlobalCommand::ALL
            .into_iter()
            .filter(|cmd| !cmd.requires_engine())
            .collect();

        assert_eq!(offline, vec![GlobalCommand::Config, GlobalCommand::Scan]);
    }

    #[test]
    fn display() {
        assert_eq!(CommandHandle::global(GlobalCommand::Ps).to_string(), "ps");
        assert_eq!(
            CommandHandle::global_with(GlobalCommand::Backup, "redis").to_string(),
            "backup redis"
        );
        assert_eq!(
            CommandHandle::service("web", ServiceAction::Inspect).to_string(),
            "web inspect"
        );
    }
}
