use std::path::PathBuf;

use axum::Router;
use server::{app, config::Config, state::AppState};
use url::Url;

pub fn test_config(api_target: &str, is_production: bool, static_dir: PathBuf) -> Config {
    Config {
        port: 0,
        api_target: Url::parse(api_target).expect("test target url"),
        is_production,
        static_dir,
    }
}

pub fn test_app(config: Config) -> Router {
    app(AppState::new(config))
}
