use crate::domain::{Invocation, ProcessRunner};
use anyhow::{Context, Result, bail};
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};
use tracing::{debug, error};

/// Runs invocations with `std::process::Command` inside the project directory
#[derive(Debug, Clone)]
pub struct SystemRunner {
    working_dir: PathBuf,
}

impl SystemRunner {
    pub fn new(working_dir: impl Into<PathBuf>) -> Self {
        Self {
            working_dir: working_dir.into(),
        }
    }

    fn command(&self, invocation: &Invocation) -> Command {
        let mut cmd = Command::new(&invocation.program);
        cmd.args(&invocation.args).current_dir(&self.working_dir);
        cmd
    }

    fn streamed_status(&self, invocation: &Invocation) -> Result<ExitStatus> {
        self.command(invocation)
            .status()
            .with_context(|| format!("executando {invocation}"))
    }

    fn captured_output(&self, invocation: &Invocation) -> Result<String> {
        let output = self
            .command(invocation)
            .stdin(Stdio::null())
            .stderr(Stdio::null())
            .output()
            .with_context(|| format!("executando {invocation}"))?;

        ensure_success(output.status, invocation)?;
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl ProcessRunner for SystemRunner {
    fn run_streamed(&self, invocation: &Invocation) -> bool {
        println!("\n🚀 Executando: {invocation}\n");

        match self
            .streamed_status(invocation)
            .and_then(|status| ensure_success(status, invocation))
        {
            Ok(()) => true,
            Err(e) => {
                error!("❌ Erro ao executar comando: {:#}", e);
                false
            }
        }
    }

    fn run_captured(&self, invocation: &Invocation) -> Option<String> {
        match self.captured_output(invocation) {
            Ok(stdout) => Some(stdout),
            Err(e) => {
                debug!("sonda falhou: {:#}", e);
                None
            }
        }
    }

    fn working_dir(&self) -> &Path {
        &self.working_dir
    }
}

fn ensure_success(status: ExitStatus, invocation: &Invocation) -> Result<()> {
    if status.success() {
        return Ok(());
    }

    bail!("{} retornou status {:?}", invocation.program, status.code())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn captured_returns_stdout() {
        let temp = TempDir::new().unwrap();
        let runner = SystemRunner::new(temp.path());

        let out = runner.run_captured(&Invocation::new("sh", ["-c", "echo hello"]));

        assert_eq!(out.as_deref().map(str::trim), Some("hello"));
    }

    #[test]
    fn captured_failure_is_none() {
        let temp = TempDir::new().unwrap();
        let runner = SystemRunner::new(temp.path());

        let missing = Invocation::new("definitely-not-a-binary-xyz", Vec::<String>::new());

        assert_eq!(runner.run_captured(&Invocation::new("sh", ["-c", "exit 3"])), None);
        assert_eq!(runner.run_captured(&missing), None);
    }

    #[test]
    fn streamed_reports_exit_status() {
        let temp = TempDir::new().unwrap();
        let runner = SystemRunner::new(temp.path());
        let missing = Invocation::new("definitely-not-a-binary-xyz", Vec::<String>::new());

        assert!(runner.run_streamed(&Invocation::new("sh", ["-c", "true"])));
        assert!(!runner.run_streamed(&Invocation::new("sh", ["-c", "false"])));
        assert!(!runner.run_streamed(&missing));
    }

    #[test]
    fn runs_in_working_dir() {
        let temp = TempDir::new().unwrap();
        let runner = SystemRunner::new(temp.path());

        assert!(runner.run_streamed(&Invocation::new("sh", ["-c", "touch marker"])));
        assert!(temp.path().join("marker").exists());
    }
}
