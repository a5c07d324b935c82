use std::collections::HashMap;

use async_trait::async_trait;
use fake_user_agent::get_rua;
use log::{debug, warn};
use serde::Deserialize;

use crate::{
    CONFIG,
    config::Config,
    data::series::{PriceBar, PriceSeries},
    ds::{ChartInterval, ChartRange, MarketDataProvider},
    error::{AthError, AthResult},
    ticker::Ticker,
    utils::{datetime::date_from_timestamp, net::http_get},
};

#[derive(Clone, Debug)]
pub struct YahooProvider {
    api_url: String,
    timeout_secs: u64,
    max_retries: u32,
    adjust_prices: bool,
}

impl YahooProvider {
    pub fn new(config: &Config) -> Self {
        Self {
            api_url: config.yahoo_api.to_string(),
            timeout_secs: config.timeout_secs,
            max_retries: config.max_retries,
            adjust_prices: config.adjust_prices,
        }
    }

    pub async fn from_config() -> Self {
        let config = CONFIG.read().await;
        Self::new(&config)
    }

    async fn fetch_chart(
        &self,
        ticker: &Ticker,
        range: ChartRange,
        interval: ChartInterval,
    ) -> AthResult<PriceSeries> {
        debug!("[Yahoo] {ticker} range={range} interval={interval}");

        let mut query: HashMap<String, String> = HashMap::new();
        query.insert("range".to_string(), range.to_string());
        query.insert("interval".to_string(), interval.to_string());
        query.insert("includeAdjustedClose".to_string(), "true".to_string());
        query.insert("events".to_string(), "div,splits".to_string());

        let mut headers: HashMap<String, String> = HashMap::new();
        headers.insert(
            reqwest::header::USER_AGENT.to_string(),
            get_rua().to_string(),
        );

        let path = format!("/v8/finance/chart/{}", ticker.symbol);
        let bytes = http_get(
            &self.api_url,
            Some(&path),
            &query,
            &headers,
            self.timeout_secs,
            self.max_retries,
        )
        .await?;

        parse_chart(&bytes, ticker, self.adjust_prices)
    }
}

#[async_trait]
impl MarketDataProvider for YahooProvider {
    async fn fetch_daily_history(&self, ticker: &Ticker) -> AthResult<PriceSeries> {
        self.fetch_chart(ticker, ChartRange::Max, ChartInterval::OneDay)
            .await
    }

    async fn fetch_monthly_bars(&self, ticker: &Ticker) -> AthResult<PriceSeries> {
        self.fetch_chart(ticker, ChartRange::OneYear, ChartInterval::OneMonth)
            .await
    }
}

/// Converts a `v8/finance/chart` payload into a series.
///
/// Bars missing any of open/high/low/close are dropped. With `adjust` the bar
/// is rescaled by `adjclose / close` so splits and dividends do not show up as
/// price moves.
pub fn parse_chart(bytes: &[u8], ticker: &Ticker, adjust: bool) -> AthResult<PriceSeries> {
    let response: YahooChartResponse = serde_json::from_slice(bytes)?;

    if let Some(error) = response.chart.error {
        return Err(AthError::Invalid {
            code: "YAHOO_CHART_ERROR",
            message: format!("{}: {}", error.code, error.description),
        });
    }

    let Some(result) = response.chart.result.and_then(|r| r.into_iter().next()) else {
        return Ok(PriceSeries::new(ticker, vec![]));
    };

    let gmt_offset = result.meta.and_then(|m| m.gmtoffset).unwrap_or(0);
    let timestamps = result.timestamp.unwrap_or_default();
    let Some(quote) = result.indicators.quote.into_iter().next() else {
        return Ok(PriceSeries::new(ticker, vec![]));
    };
    let adj_closes: Vec<Option<f64>> = if adjust {
        result
            .indicators
            .adjclose
            .and_then(|a| a.into_iter().next())
            .map(|a| a.adjclose)
            .unwrap_or_default()
    } else {
        vec![]
    };

    let mut bars: Vec<PriceBar> = Vec::with_capacity(timestamps.len());
    let mut dropped = 0;
    for (i, &ts) in timestamps.iter().enumerate() {
        let Some(date) = date_from_timestamp(ts, gmt_offset) else {
            dropped += 1;
            continue;
        };

        if let (Some(Some(open)), Some(Some(high)), Some(Some(low)), Some(Some(close))) = (
            quote.open.get(i),
            quote.high.get(i),
            quote.low.get(i),
            quote.close.get(i),
        ) {
            let ratio = match adj_closes.get(i) {
                Some(Some(adj_close)) if *close != 0.0 => adj_close / close,
                _ => 1.0,
            };

            bars.push(PriceBar {
                date,
                open: open * ratio,
                high: high * ratio,
                low: low * ratio,
                close: close * ratio,
                volume: quote.volume.get(i).copied().flatten(),
            });
        } else {
            dropped += 1;
        }
    }

    if dropped > 0 {
        warn!("[Yahoo] {ticker}: dropped {dropped} incomplete bars");
    }

    Ok(PriceSeries::new(ticker, bars))
}

#[derive(Debug, Deserialize)]
struct YahooChartResponse {
    chart: YahooChartData,
}

#[derive(Debug, Deserialize)]
struct YahooChartData {
    result: Option<Vec<YahooChartResult>>,
    #[serde(default)]
    error: Option<YahooChartError>,
}

#[derive(Debug, Deserialize)]
struct YahooChartError {
    code: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct YahooChartResult {
    meta: Option<YahooChartMeta>,
    timestamp: Option<Vec<i64>>,
    indicators: YahooChartIndicators,
}

#[derive(Debug, Deserialize)]
struct YahooChartMeta {
    gmtoffset: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct YahooChartIndicators {
    quote: Vec<YahooChartQuote>,
    adjclose: Option<Vec<YahooChartAdjClose>>,
}

#[derive(Debug, Deserialize)]
struct YahooChartQuote {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<u64>>,
}

#[derive(Debug, Deserialize)]
struct YahooChartAdjClose {
    adjclose: Vec<Option<f64>>,
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    const CHART_JSON: &str = r#"{
      "chart": {
        "result": [{
          "meta": { "symbol": "AAA", "gmtoffset": -14400 },
          "timestamp": [1704205800, 1704292200, 1704378600],
          "indicators": {
            "quote": [{
              "open":   [10.0, 11.0, null],
              "high":   [12.0, 13.0, 14.0],
              "low":    [9.0, 10.0, 11.0],
              "close":  [11.0, 12.0, 13.0],
              "volume": [1000, 2000, null]
            }],
            "adjclose": [{ "adjclose": [5.5, 12.0, 13.0] }]
          }
        }],
        "error": null
      }
    }"#;

    #[test]
    fn test_parse_chart() {
        let ticker = Ticker::new("AAA");
        let series = parse_chart(CHART_JSON.as_bytes(), &ticker, false).unwrap();

        assert_eq!(series.len(), 2);
        assert_eq!(series.closes(), [11.0, 12.0]);
        assert_eq!(series.first_date(), NaiveDate::from_ymd_opt(2024, 1, 2));
        assert_eq!(series.bars()[1].volume, Some(2000));
    }

    #[test]
    fn test_parse_chart_adjusted() {
        let ticker = Ticker::new("AAA");
        let series = parse_chart(CHART_JSON.as_bytes(), &ticker, true).unwrap();

        let first = &series.bars()[0];
        assert_eq!(first.close, 5.5);
        assert_eq!(first.open, 5.0);
        assert_eq!(first.high, 6.0);
        assert_eq!(first.low, 4.5);
        assert_eq!(series.bars()[1].close, 12.0);
    }

    #[test]
    fn test_parse_chart_without_data() {
        let json = r#"{"chart":{"result":[{"meta":{},"indicators":{"quote":[{}]}}],"error":null}"#;
        let series = parse_chart(json.as_bytes(), &Ticker::new("AAA"), true).unwrap();

        assert!(series.is_empty());
    }

    #[test]
    fn test_parse_chart_error() {
        let json = r#"{"chart":{"result":null,"error":{"code":"Not Found","description":"No data found, symbol may be delisted"}}}"#;
        let err = parse_chart(json.as_bytes(), &Ticker::new("ZZZZ"), true).unwrap_err();

        assert!(matches!(
            err,
            AthError::Invalid {
                code: "YAHOO_CHART_ERROR",
                ..
            }
        ));
        assert!(err.to_string().contains("symbol may be delisted"));
    }

    #[test]
    fn test_parse_chart_malformed() {
        let err = parse_chart(b"<html>", &Ticker::new("AAA"), true).unwrap_err();

        assert!(matches!(err, AthError::SerdeJsonError(_)));
    }
}
