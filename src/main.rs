use anyhow::{Context, Result};
use clap::Parser;
use dockctl::cli::{self, LaunchOptions};
use dockctl::infra::config::default_config_path;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "dockctl",
    version,
    about = "Menu interativo e atalhos para projetos docker compose"
)]
struct Cli {
    /// Diretório do projeto (default: diretório atual)
    #[arg(long, env = "DOCKCTL_PROJECT_DIR")]
    project_dir: Option<PathBuf>,

    /// Arquivo de configuração (default: <project-dir>/dockctl.config.json)
    #[arg(long, env = "DOCKCTL_CONFIG")]
    config: Option<PathBuf>,

    /// Comando global ou nome de serviço; sem comando abre o menu
    command: Option<String>,

    /// Subcomando do serviço, ou argumento do comando (serviço, arquivo)
    subcommand: Option<String>,

    parameter: Option<String>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .without_time()
        .with_target(false)
        .init();

    let project_dir = match cli.project_dir {
        Some(dir) => dir,
        None => std::env::current_dir().context("lendo o diretório atual")?,
    };
    let config_path = cli
        .config
        .unwrap_or_else(|| default_config_path(&project_dir));

    let code = cli::run(LaunchOptions {
        command: cli.command,
        subcommand: cli.subcommand,
        parameter: cli.parameter,
        project_dir,
        config_path,
    });

    std::process::exit(code);
}
