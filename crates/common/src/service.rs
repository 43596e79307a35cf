//! Service definition loading
//!
//! Reads the serverless-style service file that declares functions and
//! their events. Only the parts relevant to HTTP events are modelled; every
//! other event kind is kept opaque.

use crate::Result;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;
use std::path::Path;

/// Root of a service definition file
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ServiceDefinition {
    /// Service name
    #[serde(default)]
    pub service: String,

    #[serde(default)]
    pub provider: ProviderConfig,

    /// Functions in declaration order
    #[serde(default)]
    pub functions: IndexMap<String, FunctionDefinition>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ProviderConfig {
    #[serde(default = "default_provider_name")]
    pub name: String,

    #[serde(default = "default_region")]
    pub region: String,

    #[serde(default = "default_stage")]
    pub stage: String,
}

fn default_provider_name() -> String {
    "aws".to_string()
}

fn default_region() -> String {
    "us-east-1".to_string()
}

fn default_stage() -> String {
    "dev".to_string()
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            name: default_provider_name(),
            region: default_region(),
            stage: default_stage(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct FunctionDefinition {
    #[serde(default)]
    pub handler: Option<String>,

    #[serde(default)]
    pub events: Vec<FunctionEvent>,
}

/// One entry of a function's `events` list
///
/// The `http` payload is kept raw; shorthand strings and objects are told
/// apart by the resolution rules.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct FunctionEvent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub http: Option<Value>,

    #[serde(flatten)]
    pub other: IndexMap<String, Value>,
}

impl FunctionEvent {
    pub fn http(value: Value) -> Self {
        Self {
            http: Some(value),
            other: IndexMap::new(),
        }
    }
}

/// Service file format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceFormat {
    Yaml,
    Json,
}

impl ServiceFormat {
    /// Detect from the file extension, defaulting to YAML
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .as_deref()
        {
            Some("json") => ServiceFormat::Json,
            _ => ServiceFormat::Yaml,
        }
    }
}

impl ServiceDefinition {
    /// Load a service definition, detecting the format when not given
    pub fn load(path: &Path, format: Option<ServiceFormat>) -> Result<Self> {
        let content = fs::read_to_string(path)?;

        match format.unwrap_or_else(|| ServiceFormat::from_path(path)) {
            ServiceFormat::Yaml => Self::from_yaml_str(&content),
            ServiceFormat::Json => Self::from_json_str(&content),
        }
    }

    pub fn from_yaml_str(content: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(content)?)
    }

    pub fn from_json_str(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Number of `http` events across all functions
    pub fn http_event_count(&self) -> usize {
        self.functions
            .values()
            .flat_map(|f| f.events.iter())
            .filter(|e| e.http.is_some())
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use std::io::Write;

    const SERVICE_YAML: &str = r#"
service: users
provider:
  name: aws
  region: eu-west-1
functions:
  zeta:
    handler: zeta.handler
    events:
      - http: GET zeta
  alpha:
    handler: alpha.handler
    events:
      - sqs: arn:aws:sqs:eu-west-1:123456789012:queue
      - http:
          path: alpha/{id}
          method: post
          cors: true
"#;

    #[test]
    fn test_functions_keep_declaration_order() {
        let service = ServiceDefinition::from_yaml_str(SERVICE_YAML).unwrap();

        let names: Vec<_> = service.functions.keys().collect();
        assert_eq!(names, vec!["zeta", "alpha"]);
        assert_eq!(service.provider.region, "eu-west-1");
        assert_eq!(service.provider.stage, "dev");
        assert_eq!(service.http_event_count(), 2);
    }

    #[test]
    fn test_non_http_events_are_opaque() {
        let service = ServiceDefinition::from_yaml_str(SERVICE_YAML).unwrap();
        let alpha = &service.functions["alpha"];

        assert!(alpha.events[0].http.is_none());
        assert!(alpha.events[0].other.contains_key("sqs"));
        assert!(alpha.events[1].http.is_some());
    }

    #[test]
    fn test_load_detects_json() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(
            file,
            r#"{{"service": "svc", "functions": {{"hello": {{"events": [{{"http": "GET hello"}}]}}}}}}"#
        )
        .unwrap();

        let service = ServiceDefinition::load(file.path(), None).unwrap();
        assert_eq!(service.service, "svc");
        assert_eq!(service.provider.region, "us-east-1");
        assert_eq!(service.http_event_count(), 1);
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let result = ServiceDefinition::load(&dir.path().join("serverless.yml"), None);

        assert!(matches!(result, Err(Error::Io(_))));
    }

    #[test]
    fn test_format_from_path() {
        assert_eq!(
            ServiceFormat::from_path(Path::new("serverless.yml")),
            ServiceFormat::Yaml
        );
        assert_eq!(
            ServiceFormat::from_path(Path::new("serverless.JSON")),
            ServiceFormat::Json
        );
    }
}
