pub mod app_config;
pub mod config;
pub mod product;

use thiserror::Error;

pub use app_config::{AppConfig, RunMode};
pub use config::{load_app_config, load_app_config_from_env};
pub use product::{CampaignKind, ProductDetails, ProductId, PromotionLinks, NOT_AVAILABLE};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
