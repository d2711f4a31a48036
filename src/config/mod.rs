pub mod cli;
pub mod secrets;
pub mod toml_config;

#[cfg(feature = "cli")]
use clap::Parser;
#[cfg(feature = "cli")]
use serde::{Deserialize, Serialize};

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "diaplate")]
#[command(about = "DiaPlate meal plan web form")]
pub struct CliConfig {
    /// Path to the TOML configuration file
    #[arg(short, long, default_value = "diaplate.toml")]
    pub config: String,

    /// Path to the secret store holding the API key
    #[arg(long, default_value = secrets::DEFAULT_SECRETS_PATH)]
    pub secrets: String,

    /// Override [server].bind from the config file
    #[arg(long)]
    pub bind: Option<String>,

    #[arg(long, help = "Emit JSON formatted logs")]
    pub json_logs: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,
}

#[cfg(feature = "cli")]
impl CliConfig {
    /// 載入 TOML 配置並套用命令列覆蓋設定
    pub fn load_app_config(&self) -> crate::utils::error::Result<toml_config::AppConfig> {
        let mut config = toml_config::AppConfig::from_file(&self.config)?;
        if let Some(bind) = &self.bind {
            tracing::info!("🔧 Bind address overridden to: {}", bind);
            config.server.bind = bind.clone();
        }
        Ok(config)
    }
}
