use std::{fmt::Display, path::Path, sync::Arc};

use async_trait::async_trait;
use log::{debug, info};
use tokio::{
    sync::{
        mpsc,
        mpsc::{Receiver, Sender},
    },
    task::JoinHandle,
};

use crate::{
    CHANNEL_BUFFER_DEFAULT,
    data::series::PriceSeries,
    ds::MarketDataProvider,
    error::{AthError, AthResult},
    loader::load_tickers_from_file,
    ticker::Ticker,
    utils::quiet::QuietGuard,
};

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ScanResult {
    pub all_time_high: Option<f64>,
    pub latest_close: Option<f64>,
    pub is_breaking_high: bool,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ScanReport {
    /// Tickers at or above their all-time closing high, in input order
    pub breaking: Vec<Ticker>,
    /// Every scanned ticker with its result, in input order
    pub results: Vec<(Ticker, ScanResult)>,
}

#[derive(Debug)]
pub enum ScanEvent {
    Started(usize),
    Processing(Ticker),
    NoData(Ticker),
    Error(Ticker, String),
    Evaluated(Ticker, ScanResult),
    Finished(ScanReport),
}

pub struct ScanStream {
    receiver: Receiver<ScanEvent>,
    task: Option<JoinHandle<()>>,
}

/// Receives progress and per-ticker failures while a scan runs
#[async_trait]
pub trait NotificationSink: Send + Sync {
    async fn notify(&self, event: ScanEvent);

    /// A closed sink has nobody listening, the scan stops at the next ticker
    fn is_closed(&self) -> bool {
        false
    }
}

#[async_trait]
impl NotificationSink for Sender<ScanEvent> {
    async fn notify(&self, event: ScanEvent) {
        let _ = self.send(event).await;
    }

    fn is_closed(&self) -> bool {
        Sender::is_closed(self)
    }
}

impl ScanResult {
    pub fn absent() -> Self {
        Self::default()
    }

    pub fn is_absent(&self) -> bool {
        self.all_time_high.is_none() && self.latest_close.is_none()
    }
}

impl ScanReport {
    pub fn is_empty(&self) -> bool {
        self.breaking.is_empty()
    }
}

impl Display for ScanEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScanEvent::Started(_) => write!(f, "Scanning stocks, please wait..."),
            ScanEvent::Processing(ticker) => write!(f, "Processing {ticker}..."),
            ScanEvent::NoData(ticker) => write!(f, "No data for {ticker}"),
            ScanEvent::Error(ticker, detail) => write!(f, "Error with {ticker}: {detail}"),
            ScanEvent::Evaluated(ticker, result) => match (result.all_time_high, result.latest_close)
            {
                (Some(high), Some(close)) => {
                    write!(f, "{ticker}: latest close {close:.2}, all-time high {high:.2}")
                }
                _ => write!(f, "{ticker}: no result"),
            },
            ScanEvent::Finished(report) => {
                if report.is_empty() {
                    write!(f, "No stocks are breaking their all-time high at the moment.")
                } else {
                    write!(f, "Stocks currently breaking their all-time high:")
                }
            }
        }
    }
}

impl ScanStream {
    pub fn new(receiver: Receiver<ScanEvent>) -> Self {
        Self {
            receiver,
            task: None,
        }
    }

    /// Stops listening and cancels the scan task behind the stream
    pub fn close(&mut self) {
        self.receiver.close();
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }

    pub async fn next(&mut self) -> Option<ScanEvent> {
        self.receiver.recv().await
    }

    /// Non-blocking poll, for render loops
    pub fn try_next(&mut self) -> Option<ScanEvent> {
        self.receiver.try_recv().ok()
    }
}

/// Classifies a fetched series; `None` when it holds no usable close.
///
/// A latest close equal to the all-time high counts as breaking.
pub fn evaluate(series: &PriceSeries) -> Option<ScanResult> {
    let all_time_high = series.max_close()?;
    let latest_close = series.latest()?.close;

    Some(ScanResult {
        all_time_high: Some(all_time_high),
        latest_close: Some(latest_close),
        is_breaking_high: latest_close >= all_time_high,
    })
}

/// Fetches and classifies one ticker. Failures are reported to the sink and
/// yield an absent result, they never escape.
pub async fn scan_ticker(
    provider: &dyn MarketDataProvider,
    ticker: &Ticker,
    sink: &dyn NotificationSink,
) -> ScanResult {
    let fetched = {
        let _quiet = QuietGuard::new();
        provider.fetch_daily_history(ticker).await
    };

    let outcome = fetched.and_then(|series| {
        evaluate(&series).ok_or_else(|| AthError::NoData {
            code: "EMPTY_HISTORY",
            message: format!("No data for {ticker}"),
        })
    });

    match outcome {
        Ok(result) => {
            debug!("[{ticker}] {result:?}");
            sink.notify(ScanEvent::Evaluated(ticker.clone(), result.clone()))
                .await;

            result
        }
        Err(AthError::NoData { .. }) => {
            sink.notify(ScanEvent::NoData(ticker.clone())).await;

            ScanResult::absent()
        }
        Err(err) => {
            sink.notify(ScanEvent::Error(ticker.clone(), err.to_string()))
                .await;

            ScanResult::absent()
        }
    }
}

/// Scans tickers one after another, keeping input order in the report
pub async fn scan(
    provider: &dyn MarketDataProvider,
    tickers: &[Ticker],
    sink: &dyn NotificationSink,
) -> ScanReport {
    let mut report = ScanReport::default();

    for ticker in tickers {
        if sink.is_closed() {
            debug!("Scan cancelled before {ticker}");
            break;
        }

        sink.notify(ScanEvent::Processing(ticker.clone())).await;

        let result = scan_ticker(provider, ticker, sink).await;
        if result.is_breaking_high {
            report.breaking.push(ticker.clone());
        }
        report.results.push((ticker.clone(), result));
    }

    info!(
        "Scanned {} tickers, {} breaking all-time high",
        tickers.len(),
        report.breaking.len()
    );

    report
}

/// Loads the ticker file and scans it. Only loading errors abort, and they
/// abort before anything is fetched.
pub async fn scan_file(
    provider: &dyn MarketDataProvider,
    path: &Path,
    delimiter: u8,
    sink: &dyn NotificationSink,
) -> AthResult<ScanReport> {
    let tickers = load_tickers_from_file(path, delimiter)?;
    sink.notify(ScanEvent::Started(tickers.len())).await;

    Ok(scan(provider, &tickers, sink).await)
}

/// Runs `scan` on a spawned task; the last event is `Finished`
pub fn scan_stream(provider: Arc<dyn MarketDataProvider>, tickers: Vec<Ticker>) -> ScanStream {
    let (sender, receiver) = mpsc::channel(CHANNEL_BUFFER_DEFAULT);

    let task = tokio::spawn(async move {
        sender.notify(ScanEvent::Started(tickers.len())).await;
        let report = scan(provider.as_ref(), &tickers, &sender).await;
        let _ = sender.send(ScanEvent::Finished(report)).await;
    });

    ScanStream {
        receiver,
        task: Some(task),
    }
}
