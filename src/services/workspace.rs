use crate::domain::ProjectConfig;
use crate::infra::ConfigStore;
use crate::infra::compose_scanner::{self, ScanReport};
use std::path::{Path, PathBuf};

/// Loaded project state shared by the registry, the handlers and the
/// controller. Only `scan` mutates the config after startup.
#[derive(Debug, Clone)]
pub struct Workspace {
    pub config: ProjectConfig,
    project_dir: PathBuf,
    store: ConfigStore,
}

impl Workspace {
    pub fn new(config: ProjectConfig, project_dir: impl Into<PathBuf>, store: ConfigStore) -> Self {
        Self {
            config,
            project_dir: project_dir.into(),
            store,
        }
    }

    /// Loads the settings file through `store`
    pub fn load(project_dir: impl Into<PathBuf>, store: ConfigStore) -> Self {
        let config = store.load();
        Self::new(config, project_dir, store)
    }

    pub fn project_dir(&self) -> &Path {
        &self.project_dir
    }

    pub fn store(&self) -> &ConfigStore {
        &self.store
    }

    /// Merges compose services into memory without persisting them
    pub fn detect_services(&mut self) -> ScanReport {
        compose_scanner::scan_into(&mut self.config, &self.project_dir)
    }

    /// Merges compose services and persists the result
    pub fn scan_and_save(&mut self) -> ScanReport {
        let report = self.detect_services();
        self.store.save(&self.config);
        report
    }
}
