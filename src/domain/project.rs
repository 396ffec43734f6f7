use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::path::PathBuf;

/// Service that `shell` targets when no service is given, and whose local
/// `data/` and `logs/` directories are archived by `backup`.
pub const PRIMARY_SERVICE: &str = "backend";

/// Stateful cache service whose named volume is archived by `backup`.
pub const CACHE_SERVICE: &str = "redis";

/// Project settings persisted in `dockctl.config.json`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ProjectConfig {
    pub project_name: String,
    /// Compose invocation, e.g. `docker compose` or `podman-compose`
    #[serde(rename = "dockerCompose")]
    pub engine_compose_invocation: String,
    #[serde(default)]
    pub services: ServiceMap,
    #[serde(default)]
    pub plugins: Vec<PathBuf>,
}

/// Per-service settings. `detected` marks entries added by a compose scan.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ServiceSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detected: Option<bool>,
}

impl ServiceSpec {
    pub fn detected(name: &str, port: Option<u16>) -> Self {
        Self {
            port,
            path: None,
            description: Some(format!("Auto-detected {name} service")),
            detected: Some(true),
        }
    }

    pub fn is_detected(&self) -> bool {
        self.detected.unwrap_or(false)
    }
}

/// Service map keyed by name, iterated in insertion order.
///
/// Serialized as a plain JSON object; key order from the file is preserved
/// because it drives menu numbering.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServiceMap {
    entries: Vec<(String, ServiceSpec)>,
}

impl ServiceMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&ServiceSpec> {
        self.entries
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, spec)| spec)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Inserts or replaces `name`. A replaced entry keeps its position.
    pub fn insert(&mut self, name: impl Into<String>, spec: ServiceSpec) {
        let name = name.into();
        match self.entries.iter_mut().find(|(key, _)| *key == name) {
            Some((_, existing)) => *existing = spec,
            None => self.entries.push((name, spec)),
        }
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ServiceSpec)> {
        self.entries.iter().map(|(name, spec)| (name.as_str(), spec))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, ServiceSpec)> for ServiceMap {
    fn from_iter<I: IntoIterator<Item = (K, ServiceSpec)>>(iter: I) -> Self {
        let mut map = ServiceMap::new();
        for (name, spec) in iter {
            map.insert(name, spec);
        }
        map
    }
}

impl Serialize for ServiceMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, spec) in &self.entries {
            map.serialize_entry(name, spec)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for ServiceMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct ServiceMapVisitor;

        impl<'de> Visitor<'de> for ServiceMapVisitor {
            type Value = ServiceMap;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("an object of service name to service settings")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<ServiceMap, A::Error> {
                let mut map = ServiceMap::new();
                while let Some((name, spec)) = access.next_entry::<String, ServiceSpec>()? {
                    map.insert(name, spec);
                }
                Ok(map)
            }
        }

        deserializer.deserialize_map(ServiceMapVisitor)
    }
}

impl Default for ProjectConfig {
    fn default() -> Self {
        let services = [
            (
                PRIMARY_SERVICE,
                ServiceSpec {
                    port: Some(8000),
                    path: Some("./".to_string()),
                    description: Some("Django application server".to_string()),
                    detected: None,
                },
            ),
            (
                CACHE_SERVICE,
                ServiceSpec {
                    port: Some(6379),
                    path: None,
                    description: Some("Redis cache server".to_string()),
                    detected: None,
                },
            ),
            (
                "mailhog",
                ServiceSpec {
                    port: Some(8025),
                    path: None,
                    description: Some("Email testing server".to_string()),
                    detected: None,
                },
            ),
        ]
        .into_iter()
        .collect();

        Self {
            project_name: "Docker Project".to_string(),
            engine_compose_invocation: "docker compose".to_string(),
            services,
            plugins: Vec::new(),
        }
    }
}

impl ProjectConfig {
    /// The engine binary, i.e. the first word of the compose invocation
    pub fn engine_binary(&self) -> &str {
        self.engine_compose_invocation
            .split_whitespace()
            .next()
            .unwrap_or("docker")
    }

    /// Project name lowercased with whitespace and dashes removed, the way
    /// compose prefixes volume names.
    pub fn slug(&self) -> String {
        self.project_name
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '-')
            .flat_map(char::to_lowercase)
            .collect()
    }

    /// Named volume holding the cache service's data
    pub fn cache_volume(&self) -> String {
        format!("{}_{CACHE_SERVICE}_data", self.slug())
    }

    /// Access URL shown after `up` for services that publish a port
    pub fn access_url(&self, service: &str) -> Option<String> {
        let port = self.services.get(service)?.port?;
        Some(if service == CACHE_SERVICE {
            format!("redis://localhost:{port}")
        } else {
            format!("http://localhost:{port}")
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn service_map_keeps_file_order() {
        let json = r#"{"zeta": {"port": 1}, "alpha": {}, "mid": {"detected": true}}"#;
        let map: ServiceMap = serde_json::from_str(json).unwrap();

        assert_eq!(map.names().collect::<Vec<_>>(), vec!["zeta", "alpha", "mid"]);
        assert_eq!(map.get("zeta").unwrap().port, Some(1));
        assert!(map.get("mid").unwrap().is_detected());
    }

    #[test]
    fn service_map_serializes_in_order() {
        let map: ServiceMap = [("web", ServiceSpec::default()), ("db", ServiceSpec::default())]
            .into_iter()
            .collect();

        assert_eq!(serde_json::to_string(&map).unwrap(), r#"{"web":{},"db":{}}"#);
    }

    #[test]
    fn insert_replaces_in_place() {
        let mut map: ServiceMap = [("a", ServiceSpec::default()), ("b", ServiceSpec::default())]
            .into_iter()
            .collect();
        map.insert(
            "a",
            ServiceSpec {
                port: Some(9),
                ..Default::default()
            },
        );

        assert_eq!(map.names().collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(map.get("a").unwrap().port, Some(9));
    }

    #[test]
    fn config_uses_camel_case_keys() {
        let config = ProjectConfig::default();
        let value = serde_json::to_value(&config).unwrap();

        assert_eq!(value["projectName"], "Docker Project");
        assert_eq!(value["dockerCompose"], "docker compose");
        assert_eq!(value["services"]["redis"]["port"], 6379);
        assert!(value["plugins"].as_array().unwrap().is_empty());
    }

    #[test]
    fn slug_and_volume_names() {
        let config = ProjectConfig {
            project_name: "My Cool-App".to_string(),
            ..Default::default()
        };

        assert_eq!(config.slug(), "mycoolapp");
        assert_eq!(config.cache_volume(), "mycoolapp_redis_data");
    }

    #[test]
    fn engine_binary_is_first_word() {
        let mut config = ProjectConfig::default();
        assert_eq!(config.engine_binary(), "docker");

        config.engine_compose_invocation = "podman compose".to_string();
        assert_eq!(config.engine_binary(), "podman");
    }

    #[test]
    fn access_urls() {
        let config = ProjectConfig::default();

        assert_eq!(
            config.access_url("redis").as_deref(),
            Some("redis://localhost:6379")
        );
        assert_eq!(
            config.access_url("backend").as_deref(),
            Some("http://localhost:8000")
        );
        assert_eq!(config.access_url("unknown"), None);
    }
}
