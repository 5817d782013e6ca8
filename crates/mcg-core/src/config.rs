use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Top-level project configuration loaded from `.mcg.yaml`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct McgConfig {
    /// Entry document: an HTTP(S) URL or a local path.
    pub swagger_url: Option<String>,
    pub dest: String,
    pub generator: GeneratorKind,
    /// Directory whose templates override the renderer's built-in ones.
    pub templates: Option<PathBuf>,
    /// Accept invalid TLS certificates when fetching.
    pub insecure: bool,
    pub timeout_secs: u64,
    pub html: HtmlConfig,
    pub java: JavaConfig,
}

impl Default for McgConfig {
    fn default() -> Self {
        Self {
            swagger_url: None,
            dest: "generated".to_string(),
            generator: GeneratorKind::Html,
            templates: None,
            insecure: false,
            timeout_secs: 30,
            html: HtmlConfig::default(),
            java: JavaConfig::default(),
        }
    }
}

/// Which renderer to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GeneratorKind {
    Html,
    Jaxrs,
}

/// HTML documentation options.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HtmlConfig {
    pub name: String,
    pub version: String,
}

impl Default for HtmlConfig {
    fn default() -> Self {
        Self {
            name: "Test API".to_string(),
            version: "V1".to_string(),
        }
    }
}

/// Java client options.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct JavaConfig {
    pub package: String,
    pub group_id: String,
    pub artifact_id: String,
    pub name: String,
    pub version: String,
    /// Class that hands out the resource clients.
    pub home_class: String,
}

impl Default for JavaConfig {
    fn default() -> Self {
        Self {
            package: "com.monarchapis.api".to_string(),
            group_id: "com.monarchapis".to_string(),
            artifact_id: "test-client".to_string(),
            name: "Test Client".to_string(),
            version: "1.0".to_string(),
            home_class: "API".to_string(),
        }
    }
}

/// Default config file name.
pub const CONFIG_FILE_NAME: &str = ".mcg.yaml";

/// Load config from a YAML file. Returns `None` if the file doesn't exist.
pub fn load_config(path: &Path) -> Result<Option<McgConfig>, String> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)
        .map_err(|e| format!("failed to read config {}: {}", path.display(), e))?;
    let config: McgConfig = serde_yaml_ng::from_str(&content)
        .map_err(|e| format!("failed to parse config {}: {}", path.display(), e))?;
    Ok(Some(config))
}

/// Generate the default config file content.
pub fn default_config_content() -> &'static str {
    r#"# monarch-codegen configuration
swagger_url: https://api.example.com/api-docs
dest: generated
generator: html       # html | jaxrs
# templates: ./templates   # overrides for the built-in templates
insecure: false       # accept invalid TLS certificates
timeout_secs: 30

html:
  name: Test API
  version: V1

java:
  package: com.monarchapis.api
  group_id: com.monarchapis
  artifact_id: test-client
  name: Test Client
  version: "1.0"
  home_class: API
"#
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = McgConfig::default();
        assert!(config.swagger_url.is_none());
        assert_eq!(config.dest, "generated");
        assert_eq!(config.generator, GeneratorKind::Html);
        assert!(!config.insecure);
        assert_eq!(config.timeout_secs, 30);
        assert_eq!(config.java.package, "com.monarchapis.api");
        assert_eq!(config.java.home_class, "API");
        assert_eq!(config.html.version, "V1");
    }

    #[test]
    fn test_parse_config_yaml() {
        let yaml = r#"
swagger_url: http://localhost:8080/api-docs
dest: out
generator: jaxrs
templates: ./my-templates
insecure: true
timeout_secs: 5
java:
  package: org.example.petstore
  home_class: PetStore
"#;
        let config: McgConfig = serde_yaml_ng::from_str(yaml).unwrap();
        assert_eq!(
            config.swagger_url.as_deref(),
            Some("http://localhost:8080/api-docs")
        );
        assert_eq!(config.dest, "out");
        assert_eq!(config.generator, GeneratorKind::Jaxrs);
        assert_eq!(config.templates, Some(PathBuf::from("./my-templates")));
        assert!(config.insecure);
        assert_eq!(config.timeout_secs, 5);
        assert_eq!(config.java.package, "org.example.petstore");
        assert_eq!(config.java.home_class, "PetStore");
        // Unset nested fields keep their defaults
        assert_eq!(config.java.group_id, "com.monarchapis");
    }

    #[test]
    fn test_default_content_parses() {
        let config: McgConfig = serde_yaml_ng::from_str(default_config_content()).unwrap();
        assert_eq!(config.generator, GeneratorKind::Html);
        assert_eq!(config.java.version, "1.0");
    }

    #[test]
    fn test_missing_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = load_config(&dir.path().join(CONFIG_FILE_NAME)).unwrap();
        assert!(loaded.is_none());
    }
}
