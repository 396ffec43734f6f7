use crate::domain::error::{Error, Result};
use crate::domain::{CommandHandle, GlobalCommand, ProjectConfig, ServiceAction};

/// Dispatch table derived from a config: the fixed global commands plus
/// every service-scoped action for each configured service.
///
/// Building is pure; rebuild after the service map changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandRegistry {
    services: Vec<String>,
}

impl CommandRegistry {
    pub fn build(config: &ProjectConfig) -> Self {
        Self {
            services: config.services.names().map(str::to_string).collect(),
        }
    }

    pub fn services(&self) -> impl Iterator<Item = &str> {
        self.services.iter().map(String::as_str)
    }

    pub fn is_service(&self, name: &str) -> bool {
        self.services.iter().any(|service| service == name)
    }

    /// The six service-scoped handles for `service`, or `None` if unknown
    pub fn service_commands(&self, service: &str) -> Option<Vec<CommandHandle>> {
        if !self.is_service(service) {
            return None;
        }

        Some(
            ServiceAction::ALL
                .into_iter()
                .map(|action| CommandHandle::service(service, action))
                .collect(),
        )
    }

    /// Resolves `command [subcommand]` as typed on the command line.
    /// Service names shadow global commands of the same name.
    pub fn resolve(&self, command: &str, subcommand: Option<&str>) -> Result<CommandHandle> {
        if self.is_service(command) {
            return subcommand
                .and_then(ServiceAction::from_name)
                .map(|action| CommandHandle::service(command, action))
                .ok_or_else(|| {
                    Error::InvalidArgument(format!(
                        "Comando inválido para {command}. Use: {}",
                        service_action_list()
                    ))
                });
        }

        let global = GlobalCommand::from_name(command)
            .ok_or_else(|| Error::InvalidArgument(format!("Comando não reconhecido: {command}")))?;

        Ok(match (global, subcommand) {
            (
                GlobalCommand::Rebuild
                | GlobalCommand::Logs
                | GlobalCommand::Shell
                | GlobalCommand::Backup
                | GlobalCommand::Restore,
                Some(arg),
            ) => CommandHandle::global_with(global, arg),
            _ => CommandHandle::global(global),
        })
    }
}

pub fn service_action_list() -> String {
    ServiceAction::ALL
        .iter()
        .map(|action| action.name())
        .collect::<Vec<_>>()
        .join(", ")
}
