//! Line-oriented discovery of services in a compose file.
//!
//! This is deliberately not a YAML parser: it only understands the layout
//! compose files conventionally use (a column-zero `services:` key and
//! two-space indented service headers).

use crate::domain::error::{Error, Result};
use crate::domain::{ProjectConfig, ServiceSpec};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

pub const COMPOSE_FILE_NAME: &str = "docker-compose.yml";

/// Outcome of merging detected services into a config
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanReport {
    /// Every service found in the compose file, in file order
    pub detected: Vec<String>,
    /// The subset that was not configured yet and got added
    pub added: Vec<String>,
}

/// Service names declared under the top-level `services:` key, in order
pub fn detect(text: &str) -> Vec<String> {
    let mut services = Vec::new();
    let mut in_services = false;

    for line in text.lines() {
        if line.trim() == "services:" {
            in_services = true;
            continue;
        }

        if !in_services {
            continue;
        }

        if let Some(name) = service_header(line) {
            services.push(name.to_string());
        }

        if line.starts_with(|c: char| c.is_ascii_alphabetic()) {
            break;
        }
    }

    services
}

/// First published port in `service`'s section, host side preferred
pub fn extract_port(text: &str, service: &str) -> Option<u16> {
    let header = format!("  {service}:");
    let mut lines = text.lines().skip_while(|line| *line != header);

    // Skip the header itself.
    lines.next()?;

    for line in lines {
        let next_section = line.starts_with(|c: char| c.is_ascii_alphabetic())
            || line
                .strip_prefix("  ")
                .is_some_and(|rest| rest.starts_with(|c: char| c.is_ascii_alphabetic()));
        if next_section {
            break;
        }

        if let Some(port) = port_mapping(line) {
            return Some(port);
        }
    }

    None
}

/// Reads `<project_dir>/docker-compose.yml`. A missing file is not an error.
pub fn read_compose_file(project_dir: &Path) -> Result<Option<String>> {
    let path = compose_path(project_dir);
    if !path.exists() {
        return Ok(None);
    }

    fs::read_to_string(&path)
        .map(Some)
        .map_err(|source| Error::ScanParse { path, source })
}

pub fn compose_path(project_dir: &Path) -> PathBuf {
    project_dir.join(COMPOSE_FILE_NAME)
}

/// Adds compose services missing from `config`, marked as detected.
/// Failures are logged and yield an empty report.
pub fn scan_into(config: &mut ProjectConfig, project_dir: &Path) -> ScanReport {
    let text = match read_compose_file(project_dir) {
        Ok(Some(text)) => text,
        Ok(None) => {
            warn!("⚠️  {} não encontrado.", COMPOSE_FILE_NAME);
            return ScanReport::default();
        }
        Err(e) => {
            warn!("⚠️  Detecção automática falhou: {}", e);
            return ScanReport::default();
        }
    };

    info!("🔍 Detectando serviços...");
    merge_detected(config, &text)
}

/// Merge step of [`scan_into`], split out so it can run on in-memory text
pub fn merge_detected(config: &mut ProjectConfig, text: &str) -> ScanReport {
    let detected = detect(text);

    if detected.is_empty() {
        warn!("⚠️  Nenhum serviço detectado no {}", COMPOSE_FILE_NAME);
        return ScanReport::default();
    }

    info!("🔍 Serviços detectados: {}", detected.join(", "));

    let mut added = Vec::new();
    for name in &detected {
        if config.services.contains(name) {
            continue;
        }
        let port = extract_port(text, name);
        config
            .services
            .insert(name.clone(), ServiceSpec::detected(name, port));
        added.push(name.clone());
    }

    if added.is_empty() {
        info!("✅ Todos os serviços já estão configurados.");
    } else {
        info!("✅ {} novo(s) serviço(s) adicionado(s) à configuração.", added.len());
    }

    ScanReport { detected, added }
}

/// `  name:` with exactly two spaces of indentation and nothing after the colon
fn service_header(line: &str) -> Option<&str> {
    let rest = line.strip_prefix("  ")?;
    let name = rest.strip_suffix(':')?;

    let mut chars = name.chars();
    let first = chars.next()?;
    if !first.is_ascii_alphabetic() {
        return None;
    }
    if !chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-') {
        return None;
    }

    Some(name)
}

/// Port from a list item such as `- "8080:80"`, `- 127.0.0.1:8080:80/tcp`
/// or the single-value shorthand `- "8080"`.
fn port_mapping(line: &str) -> Option<u16> {
    let item = line.trim_start().strip_prefix('-')?.trim();
    let item = item.trim_matches(|c| c == '"' || c == '\'');

    if !item.contains(':') {
        return item.parse().ok();
    }

    let parts: Vec<&str> = item.split(':').collect();
    let host = parts[parts.len() - 2];
    if let Ok(port) = host.parse() {
        return Some(port);
    }

    leading_number(parts[parts.len() - 1])
}

fn leading_number(s: &str) -> Option<u16> {
    let end = s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len());
    s[..end].parse().ok()
}
