use chrono::NaiveDate;
use log::debug;
use serde::Serialize;

use crate::{
    data::series::PriceSeries, ds::MarketDataProvider, error::AthResult, ticker::Ticker,
};

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Candle {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ChartSpec {
    pub ticker: String,
    pub title: String,
    pub x_axis_title: String,
    pub y_axis_title: String,
    pub range_slider_visible: bool,
    pub candles: Vec<Candle>,
}

impl Candle {
    pub fn is_rising(&self) -> bool {
        self.close >= self.open
    }
}

impl ChartSpec {
    pub fn monthly(series: &PriceSeries) -> Self {
        let candles = series
            .bars()
            .iter()
            .map(|bar| Candle {
                date: bar.date,
                open: bar.open,
                high: bar.high,
                low: bar.low,
                close: bar.close,
            })
            .collect();

        Self {
            ticker: series.ticker.to_string(),
            title: format!("Monthly Candlestick Chart for {}", series.ticker),
            x_axis_title: "Date".to_string(),
            y_axis_title: "Price".to_string(),
            range_slider_visible: false,
            candles,
        }
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.candles.first().map(|c| c.date)
    }
}

/// One year of monthly bars as a candlestick chart; fetch errors are returned
/// to the caller as is.
pub async fn monthly_chart(
    provider: &dyn MarketDataProvider,
    ticker: &Ticker,
) -> AthResult<ChartSpec> {
    let series = provider.fetch_monthly_bars(ticker).await?;
    debug!("[{ticker}] {} monthly bars", series.len());

    Ok(ChartSpec::monthly(&series))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanner::tests::{StubHistory, StubProvider};

    #[tokio::test]
    async fn test_monthly_chart() {
        let provider =
            StubProvider::default().with("AAA", StubHistory::Closes(vec![10.0, 9.0, 11.0]));

        let chart = monthly_chart(&provider, &Ticker::new("AAA")).await.unwrap();

        assert_eq!(chart.title, "Monthly Candlestick Chart for AAA");
        assert_eq!(chart.x_axis_title, "Date");
        assert_eq!(chart.y_axis_title, "Price");
        assert!(!chart.range_slider_visible);
        assert_eq!(chart.candles.len(), 3);
        assert_eq!(chart.candles[2].close, 11.0);
        assert_eq!(chart.first_date(), NaiveDate::from_ymd_opt(2024, 1, 1));
    }

    #[tokio::test]
    async fn test_chart_json() {
        let provider = StubProvider::default().with("AAA", StubHistory::Closes(vec![10.0]));

        let chart = monthly_chart(&provider, &Ticker::new("AAA")).await.unwrap();
        let json = serde_json::to_value(&chart).unwrap();

        assert_eq!(json["title"], "Monthly Candlestick Chart for AAA");
        assert_eq!(json["range_slider_visible"], false);
        assert_eq!(json["candles"][0]["date"], "2024-01-01");
        assert_eq!(json["candles"][0]["close"], 10.0);
    }

    #[tokio::test]
    async fn test_monthly_chart_error_propagates() {
        let provider = StubProvider::default()
            .with("AAA", StubHistory::Failure("503 Service Unavailable".to_string()));

        assert!(monthly_chart(&provider, &Ticker::new("AAA")).await.is_err());
    }

    #[test]
    fn test_candle_direction() {
        let candle = Candle {
            date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            open: 10.0,
            high: 12.0,
            low: 8.0,
            close: 9.0,
        };

        assert!(!candle.is_rising());
    }
}
