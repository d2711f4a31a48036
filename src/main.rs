use clap::Parser;
use diaplate::app::server::{self, AppState};
use diaplate::core::document::DocumentRenderer;
use diaplate::core::pdf::PdfLayout;
use diaplate::utils::{logger, validation::Validate};
use diaplate::{planner_from_config, CliConfig, PlanEngine, PlanError, SecretStore};

async fn run(cli: &CliConfig) -> Result<(), PlanError> {
    let config = cli.load_app_config()?;
    config.validate()?;
    tracing::info!("✅ Configuration loaded and validated successfully");

    // 啟動時從 secret store 讀取 API key，沒有 key 時使用 mock planner
    let secrets = SecretStore::load(&cli.secrets)?;
    let planner = planner_from_config(&config.llm, secrets.api_key().cloned())?;

    let fonts = config.document.font_locator();
    if fonts.locate().is_none() {
        tracing::warn!(
            "⚠️ No TrueType font family found in {:?}; PDF downloads will fail",
            fonts.dirs()
        );
    }
    let engine = PlanEngine::new(planner)
        .with_renderer(DocumentRenderer::new(PdfLayout::default(), fonts))
        .with_title_suffix(config.document.title_suffix.clone());
    let state = AppState::new(engine, config.document.default_format())?;

    server::serve(config.bind_addr()?, state).await
}

#[tokio::main]
async fn main() {
    let cli = CliConfig::parse();

    // 初始化日誌
    logger::init_server_logger(cli.verbose, cli.json_logs);

    tracing::info!("Starting DiaPlate");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    if let Err(e) = run(&cli).await {
        tracing::error!(
            "❌ DiaPlate failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(e.exit_code());
    }
}
