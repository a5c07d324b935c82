use async_trait::async_trait;

use crate::{data::series::PriceSeries, error::AthResult, ticker::Ticker};

pub mod yahoo;

#[derive(Clone, Copy, Debug, PartialEq, strum::Display, strum::EnumString)]
pub enum ChartRange {
    #[strum(serialize = "max")]
    Max,
    #[strum(serialize = "1y")]
    OneYear,
}

#[derive(Clone, Copy, Debug, PartialEq, strum::Display, strum::EnumString)]
pub enum ChartInterval {
    #[strum(serialize = "1d")]
    OneDay,
    #[strum(serialize = "1mo")]
    OneMonth,
}

/// The two query shapes the scanner and the chart consume
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Daily bars over the whole available history
    async fn fetch_daily_history(&self, ticker: &Ticker) -> AthResult<PriceSeries>;

    /// Monthly bars over the last year
    async fn fetch_monthly_bars(&self, ticker: &Ticker) -> AthResult<PriceSeries>;
}
