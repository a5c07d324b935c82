use std::{path::Path, sync::Arc};

use crate::{
    CONFIG, CONFIG_PATH,
    chart::{self, ChartSpec},
    config::Config,
    ds::{MarketDataProvider, yahoo::YahooProvider},
    error::AthResult,
    loader,
    scanner::{self, ScanStream},
    ticker::Ticker,
};

pub use crate::scanner::{ScanEvent, ScanResult};

pub async fn default_provider() -> Arc<dyn MarketDataProvider> {
    Arc::new(YahooProvider::from_config().await)
}

pub fn load_tickers(path: &Path, delimiter: u8) -> AthResult<Vec<Ticker>> {
    loader::load_tickers_from_file(path, delimiter)
}

pub async fn scan_stream(tickers: Vec<Ticker>) -> ScanStream {
    scanner::scan_stream(default_provider().await, tickers)
}

pub async fn monthly_chart(ticker: &Ticker) -> AthResult<ChartSpec> {
    let provider = default_provider().await;
    chart::monthly_chart(provider.as_ref(), ticker).await
}

pub async fn get_config() -> AthResult<Config> {
    Ok(CONFIG.read().await.clone())
}

pub fn config_path() -> &'static Path {
    &CONFIG_PATH
}

/// Saves one setting and returns the value as stored
pub async fn set_config(key: &str, value: &str) -> AthResult<String> {
    let mut config = CONFIG.write().await;
    config.set(key, value)?;
    config.store(&CONFIG_PATH)?;

    Ok(config.get(key).unwrap_or_default())
}
