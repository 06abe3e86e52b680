use std::path::Path;
use crate::errors::ReachError;
use super::defaults::CONFIG_FILE_MAX_BYTES;
use super::types::FileConfig;
use super::schema::CONFIG_SCHEMA;
use tracing::warn;

pub async fn parse_config(path: &Path) -> Result<FileConfig, ReachError> {
    if !path.exists() {
        return Err(ReachError::Config(format!("Config file not found: {}", path.display())));
    }
    if !is_yaml_file(path) {
        return Err(ReachError::Config(format!(
            "Config file is not a YAML file: {}",
            path.display()
        )));
    }

    let metadata = tokio::fs::metadata(path).await?;
    if metadata.len() > CONFIG_FILE_MAX_BYTES {
        return Err(ReachError::Config("Config file exceeds 1MB limit".into()));
    }

    let content = tokio::fs::read_to_string(path).await?;
    parse_config_str(&content)
}

pub fn parse_config_str(content: &str) -> Result<FileConfig, ReachError> {
    let yaml: serde_yaml::Value = serde_yaml::from_str(content)?;

    // JSON Schema validation
    validate_schema(&yaml)?;

    let config: FileConfig = serde_yaml::from_value(yaml)
        .map_err(|e| ReachError::Config(format!("Invalid configuration structure: {}", e)))?;

    validate_projects(&config)?;

    Ok(config)
}

pub fn is_yaml_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("yaml") || e.eq_ignore_ascii_case("yml"))
        .unwrap_or(false)
}

/// Validate config against the JSON schema for structural correctness.
fn validate_schema(yaml: &serde_yaml::Value) -> Result<(), ReachError> {
    // Convert YAML value to JSON for schema validation
    let json_value = serde_json::to_value(yaml)
        .map_err(|e| ReachError::Config(format!("Config conversion error: {}", e)))?;

    let compiled = jsonschema::JSONSchema::compile(&CONFIG_SCHEMA)
        .map_err(|e| ReachError::Config(format!("Schema compilation error: {}", e)))?;

    let result = compiled.validate(&json_value);
    if let Err(errors) = result {
        // Advisory: per-project validation rejects bad values later
        for e in errors {
            warn!(validation_error = %format!("{} at {}", e, e.instance_path), "Config schema warning");
        }
    }

    Ok(())
}

fn validate_projects(config: &FileConfig) -> Result<(), ReachError> {
    if config.projects.is_empty() {
        return Err(ReachError::Config("Config file lists no projects".into()));
    }

    let mut seen = std::collections::HashSet::new();
    for entry in &config.projects {
        if let Some(path) = &entry.path {
            if !seen.insert(path.as_str()) {
                warn!(project = %path, "Project listed more than once; it will be analyzed again");
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal_config() {
        let config = parse_config_str("projects:\n  - path: /tmp/app\n    vulnerabilities: vulns.csv\n").unwrap();
        assert_eq!(config.projects.len(), 1);
        assert_eq!(config.projects[0].vulnerabilities.as_deref(), Some("vulns.csv"));
        assert!(config.output.is_none());
    }

    #[test]
    fn test_parse_rejects_empty_project_list() {
        let err = parse_config_str("projects: []\n").unwrap_err();
        assert!(matches!(err, ReachError::Config(_)));
    }

    #[test]
    fn test_parse_rejects_wrong_types() {
        let err = parse_config_str("projects:\n  - path: /tmp/app\n    search_budget: soon\n").unwrap_err();
        assert!(matches!(err, ReachError::Config(_)));
    }

    #[test]
    fn test_parse_output_and_engine_blocks() {
        let yaml = "projects:\n  - path: /a\noutput:\n  results_dir: /r\nengine:\n  command: java\n  args: [\"-jar\", \"e.jar\"]\n";
        let config = parse_config_str(yaml).unwrap();
        assert_eq!(config.output.unwrap().results_dir.as_deref(), Some("/r"));
        assert_eq!(config.engine.unwrap().args.unwrap(), vec!["-jar", "e.jar"]);
    }

    #[test]
    fn test_is_yaml_file() {
        assert!(is_yaml_file(Path::new("config.yaml")));
        assert!(is_yaml_file(Path::new("config.YML")));
        assert!(!is_yaml_file(Path::new("config.json")));
        assert!(!is_yaml_file(Path::new("config")));
    }

    #[tokio::test]
    async fn test_parse_config_missing_file() {
        let err = parse_config(Path::new("/nonexistent/config.yaml")).await.unwrap_err();
        assert!(matches!(err, ReachError::Config(_)));
    }
}
