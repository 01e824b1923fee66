//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::{HealthNetConfig, PostgreSQLConfig};
use crate::config::secret_string;
use crate::domain::errors::HealthNetError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::Path;
use std::sync::OnceLock;

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (${VAR} syntax)
/// 3. Parses the TOML into HealthNetConfig
/// 4. Applies environment variable overrides (HEALTHNET_* prefix)
/// 5. Validates the configuration
///
/// # Errors
///
/// Returns an error if:
/// - File cannot be read
/// - TOML parsing fails
/// - A referenced environment variable is not set
/// - Configuration validation fails
///
/// # Examples
///
/// ```no_run
/// use healthnet::config::loader::load_config;
///
/// let config = load_config("healthnet.toml").expect("Failed to load config");
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<HealthNetConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(HealthNetError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        HealthNetError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    load_config_from_str(&contents)
}

/// Loads configuration from TOML text
///
/// Same pipeline as [`load_config`] without the file read.
pub fn load_config_from_str(contents: &str) -> Result<HealthNetConfig> {
    let contents = substitute_env_vars(contents)?;

    let mut config: HealthNetConfig = toml::from_str(&contents)
        .map_err(|e| HealthNetError::Configuration(format!("Failed to parse TOML: {}", e)))?;

    apply_env_overrides(&mut config)?;

    config.validate().map_err(|e| {
        HealthNetError::Configuration(format!("Configuration validation failed: {}", e))
    })?;

    Ok(config)
}

fn env_var_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}").expect("valid pattern"))
}

/// Substitutes environment variables in the format ${VAR_NAME}
///
/// Comment lines are copied through untouched.
///
/// # Errors
///
/// Returns an error naming every referenced variable that is not set
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = env_var_pattern();
    let mut result = String::new();
    let mut missing_vars: Vec<String> = Vec::new();

    for line in input.lines() {
        if line.trim_start().starts_with('#') {
            result.push_str(line);
            result.push('\n');
            continue;
        }

        let mut processed_line = line.to_string();
        for cap in re.captures_iter(line) {
            let var_name = &cap[1];
            match std::env::var(var_name) {
                Ok(value) => {
                    let placeholder = format!("${{{}}}", var_name);
                    processed_line = processed_line.replace(&placeholder, &value);
                }
                Err(_) => {
                    if !missing_vars.iter().any(|v| v == var_name) {
                        missing_vars.push(var_name.to_string());
                    }
                }
            }
        }
        result.push_str(&processed_line);
        result.push('\n');
    }

    if !missing_vars.is_empty() {
        return Err(HealthNetError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(result)
}

/// Applies environment variable overrides using the HEALTHNET_* prefix
///
/// Environment variables follow the pattern: HEALTHNET_<SECTION>_<KEY>
/// For example: HEALTHNET_STORAGE_BACKEND, HEALTHNET_POSTGRESQL_MAX_CONNECTIONS
fn apply_env_overrides(config: &mut HealthNetConfig) -> Result<()> {
    // Application overrides
    if let Ok(val) = std::env::var("HEALTHNET_APPLICATION_LOG_LEVEL") {
        config.application.log_level = val;
    }

    // Storage overrides
    if let Ok(val) = std::env::var("HEALTHNET_STORAGE_BACKEND") {
        config.storage.backend = val.parse().map_err(HealthNetError::Configuration)?;
    }
    if let Ok(val) = std::env::var("HEALTHNET_STORAGE_PATH") {
        config.storage.path = val;
    }

    // PostgreSQL overrides; a connection string alone is enough to create the section
    if let Ok(val) = std::env::var("HEALTHNET_POSTGRESQL_CONNECTION_STRING") {
        match config.postgresql.as_mut() {
            Some(pg) => pg.connection_string = secret_string(val),
            None => config.postgresql = Some(PostgreSQLConfig::new(secret_string(val))),
        }
    }
    if let Some(ref mut pg) = config.postgresql {
        if let Ok(val) = std::env::var("HEALTHNET_POSTGRESQL_MAX_CONNECTIONS") {
            if let Ok(max) = val.parse() {
                pg.max_connections = max;
            }
        }
        if let Ok(val) = std::env::var("HEALTHNET_POSTGRESQL_CONNECTION_TIMEOUT_SECONDS") {
            if let Ok(timeout) = val.parse() {
                pg.connection_timeout_seconds = timeout;
            }
        }
        if let Ok(val) = std::env::var("HEALTHNET_POSTGRESQL_STATEMENT_TIMEOUT_SECONDS") {
            if let Ok(timeout) = val.parse() {
                pg.statement_timeout_seconds = timeout;
            }
        }
    }

    // Porter overrides
    if let Ok(val) = std::env::var("HEALTHNET_PORTER_PRETTY") {
        config.porter.pretty = val.parse().unwrap_or(false);
    }

    // Logging overrides
    if let Ok(val) = std::env::var("HEALTHNET_LOGGING_LOCAL_ENABLED") {
        config.logging.local_enabled = val.parse().unwrap_or(false);
    }
    if let Ok(val) = std::env::var("HEALTHNET_LOGGING_LOCAL_PATH") {
        config.logging.local_path = val;
    }
    if let Ok(val) = std::env::var("HEALTHNET_LOGGING_LOCAL_ROTATION") {
        config.logging.local_rotation = val;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_substitute_env_vars() {
        std::env::set_var("HN_LOADER_TEST_VAR", "test_value");
        let input = "password = \"${HN_LOADER_TEST_VAR}\"";
        let result = substitute_env_vars(input).unwrap();
        assert_eq!(result, "password = \"test_value\"\n");
        std::env::remove_var("HN_LOADER_TEST_VAR");
    }

    #[test]
    fn test_substitute_env_vars_missing() {
        std::env::remove_var("HN_LOADER_MISSING_VAR");
        let input = "password = \"${HN_LOADER_MISSING_VAR}\"";
        let err = substitute_env_vars(input).unwrap_err();
        assert!(err.to_string().contains("HN_LOADER_MISSING_VAR"));
    }

    #[test]
    fn test_substitute_env_vars_skips_comments() {
        std::env::remove_var("HN_LOADER_COMMENTED_VAR");
        let input = "# password = \"${HN_LOADER_COMMENTED_VAR}\"";
        assert!(substitute_env_vars(input).is_ok());
    }

    #[test]
    fn test_load_config_missing_file() {
        let result = load_config("nonexistent.toml");
        assert!(matches!(result, Err(HealthNetError::Configuration(_))));
    }

    #[test]
    fn test_load_config_valid() {
        let toml_content = r#"
[application]
log_level = "debug"

[storage]
backend = "memory"
path = "data/healthnet.json"

[porter]
pretty = true
"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(toml_content.as_bytes()).unwrap();
        temp_file.flush().unwrap();

        let config = load_config(temp_file.path()).unwrap();
        assert_eq!(config.application.log_level, "debug");
        assert_eq!(config.storage.path, "data/healthnet.json");
        assert!(config.porter.pretty);
    }

    #[test]
    fn test_load_config_invalid_value() {
        let result = load_config_from_str("[application]\nlog_level = \"loud\"\n");
        let err = result.unwrap_err();
        assert!(err.to_string().contains("Configuration validation failed"));
    }
}
