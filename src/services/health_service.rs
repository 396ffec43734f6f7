use crate::domain::{Invocation, ProcessRunner, ProjectConfig};
use serde::Deserialize;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Coarse container state reported by `compose ps`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceState {
    Running,
    Exited,
    Unknown,
}

impl ServiceState {
    fn classify(state: &str) -> Self {
        match state {
            "running" => Self::Running,
            "exited" => Self::Exited,
            _ => Self::Unknown,
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            Self::Running => "✅",
            Self::Exited => "❌",
            Self::Unknown => "⚠️",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeResult {
    Reported {
        state: ServiceState,
        raw_state: String,
        health: String,
    },
    /// The probe ran but listed no container
    NotFound,
    /// The probe could not run or its output was unreadable
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceHealth {
    pub service: String,
    pub result: ProbeResult,
}

impl fmt::Display for ServiceHealth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.result {
            ProbeResult::Reported {
                state,
                raw_state,
                health,
            } => write!(
                f,
                "{} {}: {} (Health: {})",
                state.icon(),
                self.service,
                raw_state,
                health
            ),
            ProbeResult::NotFound => write!(f, "❌ {}: não encontrado", self.service),
            ProbeResult::Failed => write!(f, "⚠️ {}: erro ao verificar status", self.service),
        }
    }
}

#[derive(Debug, Deserialize)]
struct PsEntry {
    #[serde(rename = "State", default)]
    state: Option<String>,
    #[serde(rename = "Health", default)]
    health: Option<String>,
}

/// Probes each configured service with `compose ps --format json`
pub struct HealthService {
    runner: Arc<dyn ProcessRunner>,
}

impl HealthService {
    pub fn new(runner: Arc<dyn ProcessRunner>) -> Self {
        Self { runner }
    }

    /// One entry per configured service, in config order. A failing probe
    /// only affects its own entry.
    pub fn check_all(&self, config: &ProjectConfig) -> Vec<ServiceHealth> {
        config
            .services
            .names()
            .map(|service| ServiceHealth {
                service: service.to_string(),
                result: self.probe(config, service),
            })
            .collect()
    }

    pub fn probe(&self, config: &ProjectConfig, service: &str) -> ProbeResult {
        let invocation = Invocation::from_prefix(
            &config.engine_compose_invocation,
            ["ps", "--format", "json", service],
        );

        match self.runner.run_captured(&invocation) {
            Some(output) => parse_ps_output(&output),
            None => ProbeResult::Failed,
        }
    }
}

/// Accepts both a JSON array (older compose) and one object per line
pub fn parse_ps_output(output: &str) -> ProbeResult {
    let trimmed = output.trim();
    if trimmed.is_empty() {
        return ProbeResult::NotFound;
    }

    let entry = if trimmed.starts_with('[') {
        match serde_json::from_str::<Vec<PsEntry>>(trimmed) {
            Ok(entries) => match entries.into_iter().next() {
                Some(entry) => entry,
                None => return ProbeResult::NotFound,
            },
            Err(e) => {
                debug!("saída de ps ilegível: {}", e);
                return ProbeResult::Failed;
            }
        }
    } else {
        let first = trimmed.lines().next().unwrap_or_default();
        match serde_json::from_str::<PsEntry>(first) {
            Ok(entry) => entry,
            Err(e) => {
                debug!("saída de ps ilegível: {}", e);
                return ProbeResult::Failed;
            }
        }
    };

    let raw_state = entry
        .state
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "unknown".to_string());
    let health = entry
        .health
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "N/A".to_string());

    ProbeResult::Reported {
        state: ServiceState::classify(&raw_state),
        raw_state,
        health,
    }
}
