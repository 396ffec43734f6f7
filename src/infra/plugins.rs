use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Plugin entry after path expansion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluginStatus {
    pub path: PathBuf,
    pub found: bool,
}

/// Resolves each configured plugin path (`~` and `$VAR` expanded, relative
/// paths against `project_dir`) and reports whether it exists. Plugins are
/// never loaded or executed.
pub fn check_plugins(plugins: &[PathBuf], project_dir: &Path) -> Vec<PluginStatus> {
    if plugins.is_empty() {
        return Vec::new();
    }

    info!("🔌 Verificando plugins...");

    plugins
        .iter()
        .map(|plugin| {
            let path = resolve(plugin, project_dir);
            let found = path.exists();
            if found {
                info!("✅ Plugin encontrado: {:?}", plugin);
            } else {
                warn!("⚠️  Plugin não encontrado: {:?}", plugin);
            }
            PluginStatus { path, found }
        })
        .collect()
}

fn resolve(plugin: &Path, project_dir: &Path) -> PathBuf {
    let raw = plugin.to_string_lossy();
    let expanded = match shellexpand::full(&raw) {
        Ok(expanded) => PathBuf::from(expanded.as_ref()),
        Err(e) => {
            warn!("⚠️  Não foi possível expandir {:?}: {}", plugin, e);
            plugin.to_path_buf()
        }
    };

    if expanded.is_absolute() {
        expanded
    } else {
        project_dir.join(expanded)
    }
}
