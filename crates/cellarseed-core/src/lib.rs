mod app_config;
mod config;

pub mod catalog;
pub mod plan;
pub mod sampler;

pub use app_config::AppConfig;
pub use catalog::{
    classify_style, extract_tags, truncate_display_name, OfferRow, Style, WineRow, MERCHANT,
    SOURCE,
};
pub use config::{load_app_config, load_app_config_from_env, ConfigError};
pub use sampler::stratified_sample;
