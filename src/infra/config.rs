use crate::domain::ProjectConfig;
use crate::domain::error::{Error, Result};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

pub const DEFAULT_CONFIG_FILE_NAME: &str = "dockctl.config.json";

pub fn default_config_path(project_dir: &Path) -> PathBuf {
    project_dir.join(DEFAULT_CONFIG_FILE_NAME)
}

/// Loads and persists [`ProjectConfig`] as JSON. Both directions are
/// best-effort: failures are logged and never abort the process.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the settings file over the built-in defaults.
    ///
    /// A missing file is created from the defaults. An unreadable or
    /// malformed file is reported and the defaults are used in memory.
    pub fn load(&self) -> ProjectConfig {
        match self.try_load() {
            Ok(Some(config)) => {
                info!("📄 Configuração carregada: {:?}", self.path);
                config
            }
            Ok(None) => {
                warn!("⚠️  Arquivo de configuração não encontrado. Usando configurações padrão.");
                let config = ProjectConfig::default();
                self.save(&config);
                config
            }
            Err(e) => {
                error!("❌ Erro ao carregar configuração: {}", e);
                ProjectConfig::default()
            }
        }
    }

    /// `Ok(None)` when the file does not exist
    pub fn try_load(&self) -> Result<Option<ProjectConfig>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&self.path).map_err(|source| Error::ConfigIo {
            path: self.path.clone(),
            source,
        })?;

        let overrides: Value = serde_json::from_str(&content).map_err(|source| {
            Error::ConfigFormat {
                path: self.path.clone(),
                source,
            }
        })?;

        merge_over_defaults(overrides)
            .map(Some)
            .map_err(|source| Error::ConfigFormat {
                path: self.path.clone(),
                source,
            })
    }

    pub fn save(&self, config: &ProjectConfig) {
        match self.try_save(config) {
            Ok(()) => info!("✅ Configuração salva em: {:?}", self.path),
            Err(e) => error!("❌ Erro ao salvar configuração: {}", e),
        }
    }

    pub fn try_save(&self, config: &ProjectConfig) -> Result<()> {
        let body = serde_json::to_string_pretty(config).map_err(|source| Error::ConfigFormat {
            path: self.path.clone(),
            source,
        })?;

        fs::write(&self.path, body).map_err(|source| Error::ConfigIo {
            path: self.path.clone(),
            source,
        })
    }
}

/// Shallow merge: every top-level key in `overrides` replaces the default
/// value outright, so a `services` object replaces the whole default map.
/// Key order survives the round trip through `Value` (`preserve_order`).
fn merge_over_defaults(overrides: Value) -> serde_json::Result<ProjectConfig> {
    let mut merged = serde_json::to_value(ProjectConfig::default())?;

    if let (Value::Object(base), Value::Object(top)) = (&mut merged, overrides) {
        for (key, value) in top {
            base.insert(key, value);
        }
    }

    serde_json::from_value(merged)
}
