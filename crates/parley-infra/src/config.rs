//! Configuration loader for Parley.
//!
//! Resolution order: [`AppConfig::default()`], then the TOML file (an explicit
//! `--config` path, or `parley.toml` in the working directory when present),
//! then environment variables. The OpenAI API key must be set by the end.

use std::path::{Path, PathBuf};

use parley_types::config::AppConfig;

/// Config file picked up from the working directory when no path is given.
pub const DEFAULT_CONFIG_FILE: &str = "parley.toml";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid value for {name}: '{value}'")]
    InvalidEnv { name: &'static str, value: String },

    #[error("OpenAI API key is required (set OPENAI_API_KEY or [openai].api_key)")]
    MissingOpenAiKey,
}

/// Load configuration from file and process environment.
pub async fn load_config(path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    let mut config = match path {
        Some(path) => read_file(path).await?,
        None => {
            let default_path = Path::new(DEFAULT_CONFIG_FILE);
            if tokio::fs::try_exists(default_path).await.unwrap_or(false) {
                read_file(default_path).await?
            } else {
                tracing::debug!("No {DEFAULT_CONFIG_FILE} found, using defaults");
                AppConfig::default()
            }
        }
    };

    apply_env_overrides(&mut config, |name| std::env::var(name).ok())?;
    validate(&config)?;
    Ok(config)
}

async fn read_file(path: &Path) -> Result<AppConfig, ConfigError> {
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

    let config = toml::from_str::<AppConfig>(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    tracing::debug!("Loaded config from {}", path.display());
    Ok(config)
}

/// Apply environment overrides using `lookup` to read variables.
///
/// Where two names are listed, the first one set wins.
pub fn apply_env_overrides<F>(config: &mut AppConfig, lookup: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let first = |names: &[&'static str]| first_set(&lookup, names);

    if let Some((_, host)) = first(&["PARLEY_HOST"]) {
        config.server.host = host;
    }
    if let Some((name, port)) = first(&["PARLEY_PORT", "PORT"]) {
        config.server.port = port
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidEnv { name, value: port })?;
    }
    if let Some((_, path)) = first(&["PARLEY_DB_PATH", "DB_PATH"]) {
        config.database.path = path;
    }
    if let Some((_, key)) = first(&["OPENAI_API_KEY"]) {
        config.openai.api_key = Some(key);
    }
    if let Some((_, key)) = first(&["ELEVENLABS_API_KEY", "ELEVENLAB_API_KEY"]) {
        config.elevenlabs.api_key = Some(key);
    }
    if let Some((_, origins)) = first(&["CORS_ALLOWED_ORIGINS"]) {
        config.cors.allowed_origins = split_list(&origins);
    }
    if let Some((_, methods)) = first(&["CORS_ALLOWED_METHODS"]) {
        config.cors.allowed_methods = split_list(&methods);
    }
    if let Some((_, headers)) = first(&["CORS_ALLOWED_HEADERS"]) {
        config.cors.allowed_headers = split_list(&headers);
    }

    Ok(())
}

fn first_set<F>(lookup: &F, names: &[&'static str]) -> Option<(&'static str, String)>
where
    F: Fn(&str) -> Option<String>,
{
    names.iter().find_map(|name| {
        lookup(name)
            .filter(|v| !v.trim().is_empty())
            .map(|v| (*name, v))
    })
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

pub fn validate(config: &AppConfig) -> Result<(), ConfigError> {
    match config.openai.api_key.as_deref().map(str::trim) {
        Some(key) if !key.is_empty() => Ok(()),
        _ => Err(ConfigError::MissingOpenAiKey),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[tokio::test]
    async fn test_explicit_file_is_parsed() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("parley.toml");
        tokio::fs::write(
            &path,
            r#"
[server]
port = 9090

[openai]
api_key = "sk-file"
speech_languages = ["en", "id"]

[orchestrator]
reject_after_end = false
"#,
        )
        .await
        .unwrap();

        let config = read_file(&path).await.unwrap();
        assert_eq!(config.server.port, 9090);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.openai.api_key.as_deref(), Some("sk-file"));
        assert_eq!(config.openai.speech_languages.len(), 2);
        assert!(!config.orchestrator.reject_after_end);
        validate(&config).unwrap();
    }

    #[tokio::test]
    async fn test_missing_explicit_file_is_error() {
        let tmp = TempDir::new().unwrap();
        let result = load_config(Some(&tmp.path().join("absent.toml"))).await;
        assert!(matches!(result, Err(ConfigError::Read { .. })));
    }

    #[tokio::test]
    async fn test_malformed_explicit_file_is_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("bad.toml");
        tokio::fs::write(&path, "this is not { valid toml !!!")
            .await
            .unwrap();

        let result = load_config(Some(&path)).await;
        assert!(matches!(result, Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn test_env_overrides() {
        let mut config = AppConfig::default();
        apply_env_overrides(
            &mut config,
            env(&[
                ("PORT", "3000"),
                ("DB_PATH", "/tmp/parley.db"),
                ("OPENAI_API_KEY", "sk-env"),
                ("ELEVENLAB_API_KEY", "xi-legacy"),
                ("CORS_ALLOWED_ORIGINS", "https://a.example, https://b.example"),
                ("CORS_ALLOWED_METHODS", "GET,POST,OPTIONS"),
            ]),
        )
        .unwrap();

        assert_eq!(config.server.port, 3000);
        assert_eq!(config.database.path, "/tmp/parley.db");
        assert_eq!(config.openai.api_key.as_deref(), Some("sk-env"));
        assert_eq!(config.elevenlabs.api_key.as_deref(), Some("xi-legacy"));
        assert_eq!(
            config.cors.allowed_origins,
            vec!["https://a.example", "https://b.example"]
        );
        assert_eq!(config.cors.allowed_methods, vec!["GET", "POST", "OPTIONS"]);
        assert_eq!(config.cors.allowed_headers.len(), 3);
    }

    #[test]
    fn test_prefixed_env_wins() {
        let mut config = AppConfig::default();
        apply_env_overrides(
            &mut config,
            env(&[
                ("PORT", "3000"),
                ("PARLEY_PORT", "4000"),
                ("ELEVENLABS_API_KEY", "xi-new"),
                ("ELEVENLAB_API_KEY", "xi-legacy"),
            ]),
        )
        .unwrap();
        assert_eq!(config.server.port, 4000);
        assert_eq!(config.elevenlabs.api_key.as_deref(), Some("xi-new"));
    }

    #[test]
    fn test_invalid_port_is_error() {
        let mut config = AppConfig::default();
        let result = apply_env_overrides(&mut config, env(&[("PORT", "eighty")]));
        assert!(matches!(
            result,
            Err(ConfigError::InvalidEnv { name: "PORT", .. })
        ));
    }

    #[test]
    fn test_blank_env_is_ignored() {
        let mut config = AppConfig::default();
        apply_env_overrides(&mut config, env(&[("OPENAI_API_KEY", "  ")])).unwrap();
        assert!(config.openai.api_key.is_none());
    }

    #[test]
    fn test_validate_requires_openai_key() {
        let mut config = AppConfig::default();
        assert!(matches!(validate(&config), Err(ConfigError::MissingOpenAiKey)));

        config.openai.api_key = Some("sk-test".to_string());
        validate(&config).unwrap();
    }
}
