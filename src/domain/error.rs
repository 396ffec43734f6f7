use std::path::PathBuf;
use thiserror::Error;

/// Failure kinds surfaced at component boundaries. None of them is fatal on
/// its own; callers decide whether to fall back, retry or exit.
#[derive(Debug, Error)]
pub enum Error {
    #[error("falha de E/S na configuração {path:?}: {source}")]
    ConfigIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("configuração inválida em {path:?}: {source}")]
    ConfigFormat {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("não foi possível ler {path:?}: {source}")]
    ScanParse {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("engine de containers indisponível ({engine} info falhou)")]
    EngineUnavailable { engine: String },

    #[error("comando falhou: {0}")]
    CommandExecution(String),

    #[error("{0}")]
    InvalidArgument(String),
}

pub type Result<T> = std::result::Result<T, Error>;
