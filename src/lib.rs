//! # athscan lib

use std::{env, path::PathBuf, sync::LazyLock};

use directories::ProjectDirs;
use tokio::sync::RwLock;

use crate::config::Config;

pub mod api;
pub mod chart;
pub mod config;
pub mod data;
pub mod ds;
pub mod error;
pub mod gui;
pub mod loader;
pub mod scanner;
pub mod ticker;
pub mod utils;

pub static CHANNEL_BUFFER_DEFAULT: usize = 64;

pub static VERSION: &str = env!("CARGO_PKG_VERSION");

/// Column of the uploaded file that holds the ticker symbols
pub static TICKER_COLUMN: &str = "stock";

pub fn init() {
    env_logger::Builder::new()
        .parse_filters(env::var("LOG").as_deref().unwrap_or("off"))
        .init();
}

static CONFIG: LazyLock<RwLock<Config>> =
    LazyLock::new(|| RwLock::new(Config::load(&CONFIG_PATH).unwrap_or_default()));

static CONFIG_PATH: LazyLock<PathBuf> = LazyLock::new(|| {
    match ProjectDirs::from("", "", env!("CARGO_PKG_NAME")) {
        Some(proj_dirs) => proj_dirs.config_dir().to_path_buf(),
        None => env::current_dir().expect("Unable to get current directory!"),
    }
    .join("config.toml")
});
