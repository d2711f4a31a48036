use crate::utils::error::{PlanError, Result};
use serde::Deserialize;
use std::fmt;
use std::path::Path;

pub const API_KEY_ENV: &str = "DIAPLATE_API_KEY";
pub const DEFAULT_SECRETS_PATH: &str = ".secrets/secrets.toml";

/// A string whose `Debug`/`Display` never print the value.
#[derive(Clone, PartialEq, Eq)]
pub struct SecretString(String);

impl SecretString {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SecretString(***)")
    }
}

impl fmt::Display for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("***")
    }
}

#[derive(Debug, Default, Deserialize)]
struct SecretsFile {
    claude_ai: Option<ClaudeSecrets>,
}

#[derive(Debug, Default, Deserialize)]
struct ClaudeSecrets {
    api_key: Option<String>,
}

/// Secrets loaded once at process start.
///
/// The store is a TOML file shaped like
///
/// ```toml
/// [claude_ai]
/// api_key = "sk-ant-..."
/// ```
///
/// `DIAPLATE_API_KEY` overrides the file when set.
#[derive(Debug, Clone, Default)]
pub struct SecretStore {
    api_key: Option<SecretString>,
}

impl SecretStore {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut store = Self::from_file(path)?;
        if let Some(key) = env_api_key() {
            tracing::debug!("Using API key from {}", API_KEY_ENV);
            store.api_key = Some(key);
        }
        Ok(store)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::debug!("Secret store {} not found", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let parsed: SecretsFile =
            toml::from_str(content).map_err(|e| PlanError::ConfigValidationError {
                field: "secrets".to_string(),
                message: format!("TOML parsing error: {}", e),
            })?;

        let api_key = parsed
            .claude_ai
            .and_then(|c| c.api_key)
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
            .map(SecretString::new);

        Ok(Self { api_key })
    }

    pub fn with_api_key(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Some(SecretString::new(api_key)),
        }
    }

    pub fn api_key(&self) -> Option<&SecretString> {
        self.api_key.as_ref()
    }
}

fn env_api_key() -> Option<SecretString> {
    std::env::var(API_KEY_ENV)
        .ok()
        .map(|k| k.trim().to_string())
        .filter(|k| !k.is_empty())
        .map(SecretString::new)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_reads_claude_api_key() {
        let store = SecretStore::from_toml_str("[claude_ai]\napi_key = \"sk-test\"\n").unwrap();
        assert_eq!(store.api_key().unwrap().expose(), "sk-test");
    }

    #[test]
    fn test_blank_or_missing_key_means_none() {
        assert!(SecretStore::from_toml_str("").unwrap().api_key().is_none());
        assert!(SecretStore::from_toml_str("[claude_ai]\napi_key = \"  \"\n")
            .unwrap()
            .api_key()
            .is_none());
    }

    #[test]
    fn test_missing_file_is_empty_store() {
        let store = SecretStore::from_file("/no/such/secrets.toml").unwrap();
        assert!(store.api_key().is_none());
    }

    #[test]
    fn test_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[claude_ai]\napi_key = \"sk-file\"\n")
            .unwrap();
        let store = SecretStore::from_file(temp_file.path()).unwrap();
        assert_eq!(store.api_key().unwrap().expose(), "sk-file");
    }

    #[test]
    fn test_debug_redacts_key() {
        let store = SecretStore::with_api_key("sk-very-secret");
        let printed = format!("{:?}", store);
        assert!(!printed.contains("sk-very-secret"));
        assert!(printed.contains("***"));
    }
}
