use anyhow::Context;
use clap::Parser;
use diaplate::core::document::DocumentRenderer;
use diaplate::core::pdf::PdfLayout;
use diaplate::domain::ports::Storage;
use diaplate::utils::{logger, validation::Validate};
use diaplate::{
    planner_from_config, AppConfig, LocalStorage, OutputFormat, PlanEngine, PlanError, PlanForm,
    SecretStore,
};

#[derive(Parser, Debug)]
#[command(name = "diaplate_render")]
#[command(about = "Generate a DiaPlate meal plan document without the web form")]
struct Args {
    #[arg(long)]
    name: String,

    /// Maintain Weight, Lose Weight or Gain Weight
    #[arg(long, default_value = "Maintain Weight")]
    goal: String,

    #[arg(long, default_value = "0")]
    fasting: String,

    #[arg(long, default_value = "0")]
    pre_meal: String,

    #[arg(long, default_value = "0")]
    post_meal: String,

    /// Comma separated, e.g. "vegetarian, low-carb"
    #[arg(long, default_value = "")]
    preferences: String,

    #[arg(long, default_value = "")]
    exclusions: String,

    /// pdf or txt; defaults to [document].default_format
    #[arg(long)]
    format: Option<String>,

    #[arg(short, long, default_value = "./output")]
    output_dir: String,

    /// Path to TOML configuration file
    #[arg(short, long, default_value = "diaplate.toml")]
    config: String,

    /// Path to the secret store holding the API key
    #[arg(long, default_value = diaplate::config::secrets::DEFAULT_SECRETS_PATH)]
    secrets: String,

    /// Ignore any configured API key and use the mock planner
    #[arg(long)]
    mock: bool,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    fn form(&self) -> PlanForm {
        PlanForm {
            name: self.name.clone(),
            goal: self.goal.clone(),
            fasting_sugar: self.fasting.clone(),
            pre_meal_sugar: self.pre_meal.clone(),
            post_meal_sugar: self.post_meal.clone(),
            dietary_preferences: self.preferences.clone(),
            exclusions: self.exclusions.clone(),
        }
    }
}

async fn run(args: &Args) -> anyhow::Result<String> {
    let config = AppConfig::from_file(&args.config)
        .with_context(|| format!("loading config from {}", args.config))?;
    config.validate().context("validating config")?;

    let format = match &args.format {
        Some(format) => format.parse::<OutputFormat>()?,
        None => config.document.default_format(),
    };

    let api_key = if args.mock {
        None
    } else {
        SecretStore::load(&args.secrets)
            .with_context(|| format!("reading secrets from {}", args.secrets))?
            .api_key()
            .cloned()
    };
    let planner = planner_from_config(&config.llm, api_key)?;
    let renderer = DocumentRenderer::new(PdfLayout::default(), config.document.font_locator());
    let engine = PlanEngine::new(planner)
        .with_renderer(renderer)
        .with_title_suffix(config.document.title_suffix.clone());

    let outcome = engine.run(&args.form()).await?;
    let rendered = engine
        .render(&outcome.document, format)
        .with_context(|| format!("rendering {}", format.extension()))?;

    let storage = LocalStorage::new(&args.output_dir);
    let output_path = storage
        .write_file(&rendered.file_name, &rendered.bytes)
        .await
        .with_context(|| format!("writing to {}", args.output_dir))?;
    Ok(output_path)
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    // 初始化日誌
    logger::init_cli_logger(args.verbose);
    tracing::info!("🚀 Rendering meal plan for {}", args.name);

    match run(&args).await {
        Ok(output_path) => {
            tracing::info!("✅ Meal plan rendered successfully!");
            println!("✅ Meal plan rendered successfully!");
            println!("📁 Output saved to: {}", output_path);
        }
        Err(e) => {
            tracing::error!("❌ Rendering failed: {:#}", e);

            // 從錯誤鏈取回 PlanError 決定訊息與退出碼
            match e.downcast_ref::<PlanError>() {
                Some(plan_error) => {
                    eprintln!("❌ {}", plan_error.user_friendly_message());
                    eprintln!("💡 Suggestion: {}", plan_error.recovery_suggestion());
                    std::process::exit(plan_error.exit_code());
                }
                None => {
                    eprintln!("❌ {:#}", e);
                    std::process::exit(1);
                }
            }
        }
    }
}
