use crate::domain::error::{Error, Result};
use crate::domain::{CACHE_SERVICE, Invocation, PRIMARY_SERVICE, ProcessRunner, ProjectConfig};
use chrono::{DateTime, SecondsFormat, Utc};
use std::fs;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;
use tracing::warn;

pub const BACKUP_DIR_NAME: &str = "backups";
const APP_DATA_DIRS: [&str; 2] = ["data", "logs"];
const HELPER_IMAGE: &str = "alpine";

/// What `backup [service]` archives
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackupTarget {
    /// The cache service's named volume
    Cache,
    /// The primary service's local `data/` and `logs/` directories
    AppData,
    All,
}

impl BackupTarget {
    pub fn parse(service: Option<&str>) -> Result<Self> {
        match service {
            None | Some("all") => Ok(Self::All),
            Some(CACHE_SERVICE) => Ok(Self::Cache),
            Some(PRIMARY_SERVICE) => Ok(Self::AppData),
            Some(other) => Err(Error::InvalidArgument(format!(
                "Sem estratégia de backup para '{other}'. \
                 Use: {CACHE_SERVICE}, {PRIMARY_SERVICE} ou all"
            ))),
        }
    }

    fn includes_cache(self) -> bool {
        matches!(self, Self::Cache | Self::All)
    }

    fn includes_app_data(self) -> bool {
        matches!(self, Self::AppData | Self::All)
    }
}

/// One archive a backup run attempted to write
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackupArtifact {
    pub path: PathBuf,
    pub succeeded: bool,
}

/// ISO-8601 UTC time with `:` and `.` replaced so it is safe in file names,
/// e.g. `2026-10-18T12-34-56-789Z`.
pub fn backup_timestamp(now: DateTime<Utc>) -> String {
    now.to_rfc3339_opts(SecondsFormat::Millis, true)
        .replace([':', '.'], "-")
}

pub fn artifact_name(kind: &str, timestamp: &str) -> String {
    format!("{kind}-backup-{timestamp}.tar.gz")
}

pub struct BackupService {
    runner: Arc<dyn ProcessRunner>,
}

impl BackupService {
    pub fn new(runner: Arc<dyn ProcessRunner>) -> Self {
        Self { runner }
    }

    pub fn backup_dir(&self) -> PathBuf {
        self.runner.working_dir().join(BACKUP_DIR_NAME)
    }

    /// Creates the backup directory if needed and archives `target`
    pub fn backup(
        &self,
        config: &ProjectConfig,
        target: BackupTarget,
        now: DateTime<Utc>,
    ) -> Result<Vec<BackupArtifact>> {
        let dir = self.backup_dir();
        fs::create_dir_all(&dir)
            .map_err(|e| Error::CommandExecution(format!("criando {}: {e}", dir.display())))?;

        let timestamp = backup_timestamp(now);
        let mut artifacts = Vec::new();

        if target.includes_cache() {
            println!("💾 Fazendo backup do {CACHE_SERVICE}...");
            let name = artifact_name(CACHE_SERVICE, &timestamp);
            let target = format!("/backup/{name}");
            let succeeded = self.runner.run_streamed(&self.volume_helper(
                config,
                &dir,
                ["tar", "czf", target.as_str(), "-C", "/data", "."],
            ));
            if succeeded {
                println!("✅ Backup do {CACHE_SERVICE} salvo em: {BACKUP_DIR_NAME}/{name}");
            }
            artifacts.push(BackupArtifact {
                path: dir.join(&name),
                succeeded,
            });
        }

        if target.includes_app_data() {
            println!("💾 Fazendo backup dos dados da aplicação...");
            let existing: Vec<&str> = APP_DATA_DIRS
                .into_iter()
                .filter(|d| self.runner.working_dir().join(d).is_dir())
                .collect();

            if existing.is_empty() {
                warn!(
                    "⚠️  Nenhum dos diretórios {:?} existe; backup dos dados ignorado",
                    APP_DATA_DIRS
                );
            } else {
                let name = artifact_name("app-data", &timestamp);
                let path = dir.join(&name);
                let invocation = Invocation::new(
                    "tar",
                    ["czf".to_string(), path.to_string_lossy().into_owned()],
                )
                .with_args(existing.iter().map(|d| format!("./{d}")));
                let succeeded = self.runner.run_streamed(&invocation);
                if succeeded {
                    println!("✅ Backup dos dados salvo em: {BACKUP_DIR_NAME}/{name}");
                }
                artifacts.push(BackupArtifact { path, succeeded });
            }
        }

        Ok(artifacts)
    }

    /// Restores `file` from the backup directory. Archives with the cache
    /// service in their name go back into its volume; anything else is
    /// extracted into the project directory.
    pub fn restore(&self, config: &ProjectConfig, file: Option<&str>) -> Result<bool> {
        let file = file.ok_or_else(|| {
            Error::InvalidArgument(
                "Especifique o arquivo de backup: dockctl restore <arquivo>".to_string(),
            )
        })?;

        // Only bare file names inside the backup directory
        let mut components = Path::new(file).components();
        if !matches!(
            (components.next(), components.next()),
            (Some(Component::Normal(_)), None)
        ) {
            return Err(Error::InvalidArgument(format!(
                "Nome de arquivo de backup inválido: {file}"
            )));
        }

        let dir = self.backup_dir();
        let path = dir.join(file);
        if !path.is_file() {
            return Err(Error::InvalidArgument(format!(
                "Arquivo de backup não encontrado: {}",
                path.display()
            )));
        }

        println!("🔄 Restaurando backup: {file}...");

        if file.contains(CACHE_SERVICE) {
            let source = format!("/backup/{file}");
            let ok = self.runner.run_streamed(&self.volume_helper(
                config,
                &dir,
                ["tar", "xzf", source.as_str(), "-C", "/data"],
            ));
            if ok {
                println!(
                    "✅ Backup do {CACHE_SERVICE} restaurado! \
                     Reinicie o serviço {CACHE_SERVICE}."
                );
            }
            Ok(ok)
        } else {
            let ok = self.runner.run_streamed(&Invocation::new(
                "tar",
                [
                    "xzf".to_string(),
                    path.to_string_lossy().into_owned(),
                    "-C".to_string(),
                    ".".to_string(),
                ],
            ));
            if ok {
                println!("✅ Backup dos dados restaurado!");
            }
            Ok(ok)
        }
    }

    /// `<engine> run --rm` in a helper container with the cache volume on
    /// `/data` and the backup directory on `/backup`
    fn volume_helper<'a>(
        &self,
        config: &ProjectConfig,
        backup_dir: &Path,
        command: impl IntoIterator<Item = &'a str>,
    ) -> Invocation {
        let host_dir = fs::canonicalize(backup_dir).unwrap_or_else(|_| backup_dir.to_path_buf());

        Invocation::new(
            config.engine_binary(),
            [
                "run".to_string(),
                "--rm".to_string(),
                "-v".to_string(),
                format!("{}:/data", config.cache_volume()),
                "-v".to_string(),
                format!("{}:/backup", host_dir.display()),
                HELPER_IMAGE.to_string(),
            ],
        )
        .with_args(command)
    }
}
