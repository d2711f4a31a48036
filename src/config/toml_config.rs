use crate::core::pdf::FontLocator;
use crate::domain::model::OutputFormat;
use crate::utils::error::{PlanError, Result};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_BIND: &str = "127.0.0.1:8501";
pub const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";
pub const DEFAULT_MODEL: &str = "claude-3-5-sonnet-20240620";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub llm: LlmConfig,
    pub document: DocumentConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: DEFAULT_BIND.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    pub base_url: String,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub timeout_seconds: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            temperature: 0.7,
            max_tokens: 1000,
            timeout_seconds: 60,
        }
    }
}

impl LlmConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentConfig {
    pub title_suffix: String,
    pub default_format: String,
    pub font_dir: Option<String>,
}

impl Default for DocumentConfig {
    fn default() -> Self {
        Self {
            title_suffix: "DiaPlate Meal Plan".to_string(),
            default_format: "pdf".to_string(),
            font_dir: None,
        }
    }
}

impl DocumentConfig {
    pub fn default_format(&self) -> OutputFormat {
        self.default_format.parse().unwrap_or_default()
    }

    pub fn font_locator(&self) -> FontLocator {
        match &self.font_dir {
            Some(dir) => FontLocator::default().with_preferred_dir(dir),
            None => FontLocator::default(),
        }
    }
}

impl AppConfig {
    /// 從 TOML 檔案載入配置，檔案不存在時使用預設值
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::info!(
                "⚙️ Config file {} not found, using defaults",
                path.display()
            );
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(PlanError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| PlanError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    pub fn bind_addr(&self) -> Result<SocketAddr> {
        validation::validate_socket_addr("server.bind", &self.server.bind)
    }
}

/// 替換環境變數 (例如 ${DIAPLATE_MODEL})，未定義的變數保持原樣
pub fn substitute_env_vars(content: &str) -> Result<String> {
    use regex::Regex;
    let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| PlanError::ConfigValidationError {
        field: "env_substitution".to_string(),
        message: e.to_string(),
    })?;

    let result = re.replace_all(content, |caps: &regex::Captures| {
        let var_name = &caps[1];
        std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
    });

    Ok(result.to_string())
}

impl Validate for AppConfig {
    fn validate(&self) -> Result<()> {
        self.bind_addr()?;

        validation::validate_url("llm.base_url", &self.llm.base_url)?;
        validation::validate_non_empty_string("llm.model", &self.llm.model)?;
        validation::validate_range("llm.temperature", self.llm.temperature, 0.0, 1.0)?;
        validation::validate_range("llm.max_tokens", self.llm.max_tokens, 1, 8192)?;
        validation::validate_positive_number("llm.timeout_seconds", self.llm.timeout_seconds, 1)?;

        validation::validate_non_empty_string("document.title_suffix", &self.document.title_suffix)?;
        validation::validate_one_of(
            "document.default_format",
            &self.document.default_format,
            &["pdf", "txt"],
        )?;
        if let Some(font_dir) = &self.document.font_dir {
            validation::validate_non_empty_string("document.font_dir", font_dir)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_empty_toml_uses_defaults() {
        let config = AppConfig::from_toml_str("").unwrap();
        assert_eq!(config.server.bind, DEFAULT_BIND);
        assert_eq!(config.llm.model, DEFAULT_MODEL);
        assert_eq!(config.llm.max_tokens, 1000);
        assert_eq!(config.document.default_format(), OutputFormat::Pdf);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_partial_toml_config() {
        let toml_content = r#"
[server]
bind = "0.0.0.0:9000"

[llm]
model = "claude-3-haiku-20240307"
temperature = 0.2
"#;

        let config = AppConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.bind_addr().unwrap().port(), 9000);
        assert_eq!(config.llm.model, "claude-3-haiku-20240307");
        assert_eq!(config.llm.temperature, 0.2);
        assert_eq!(config.llm.timeout_seconds, 60);
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("DIAPLATE_TEST_MODEL", "claude-test-model");

        let toml_content = r#"
[llm]
model = "${DIAPLATE_TEST_MODEL}"
base_url = "${DIAPLATE_TEST_UNSET_URL}"
"#;

        let config = AppConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.llm.model, "claude-test-model");
        assert_eq!(config.llm.base_url, "${DIAPLATE_TEST_UNSET_URL}");
        assert!(config.validate().is_err());

        std::env::remove_var("DIAPLATE_TEST_MODEL");
    }

    #[test]
    fn test_config_validation() {
        let config = AppConfig::from_toml_str("[llm]\ntemperature = 1.5\n").unwrap();
        assert!(config.validate().is_err());

        let config = AppConfig::from_toml_str("[document]\ndefault_format = \"docx\"\n").unwrap();
        assert!(config.validate().is_err());

        let config = AppConfig::from_toml_str("[server]\nbind = \"nowhere\"\n").unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_font_dir_is_searched_first() {
        let config = AppConfig::from_toml_str("[document]\nfont_dir = \"/opt/fonts\"\n").unwrap();
        assert!(config.validate().is_ok());
        let locator = config.document.font_locator();
        assert_eq!(locator.dirs()[0], Path::new("/opt/fonts"));
        assert!(locator.dirs().len() > 1);

        let blank = AppConfig::from_toml_str("[document]\nfont_dir = \" \"\n").unwrap();
        assert!(blank.validate().is_err());
        assert_eq!(AppConfig::default().document.font_locator(), FontLocator::default());
    }

    #[test]
    fn test_invalid_toml_is_reported() {
        let err = AppConfig::from_toml_str("[llm\nmodel = 1").unwrap_err();
        assert!(matches!(err, PlanError::ConfigValidationError { .. }));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[document]\ndefault_format = \"txt\"\n")
            .unwrap();

        let config = AppConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.document.default_format(), OutputFormat::Txt);

        let missing = AppConfig::from_file("/definitely/not/here/diaplate.toml").unwrap();
        assert_eq!(missing.server.bind, DEFAULT_BIND);
    }
}
