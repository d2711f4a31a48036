pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use app::server::{build_router, AppState};
pub use config::cli::LocalStorage;
pub use config::secrets::{SecretStore, SecretString};
pub use config::toml_config::AppConfig;
pub use core::{engine::PlanEngine, requester::planner_from_config};
pub use domain::model::{Goal, OutputFormat, PlanDocument, PlanForm, PlanRequest};
pub use utils::error::{PlanError, Result};
