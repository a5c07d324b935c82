use chrono::NaiveDate;

use crate::ticker::Ticker;

#[derive(Clone, Debug, PartialEq)]
pub struct PriceBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: Option<u64>,
}

/// Bars of one ticker, ordered by date ascending
#[derive(Clone, Debug, Default)]
pub struct PriceSeries {
    pub ticker: Ticker,
    bars: Vec<PriceBar>,
}

impl PriceSeries {
    pub fn new(ticker: &Ticker, mut bars: Vec<PriceBar>) -> Self {
        bars.sort_by_key(|bar| bar.date);

        Self {
            ticker: ticker.clone(),
            bars,
        }
    }

    pub fn bars(&self) -> &[PriceBar] {
        &self.bars
    }

    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|bar| bar.close).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.bars.first().map(|bar| bar.date)
    }

    pub fn latest(&self) -> Option<&PriceBar> {
        self.bars.last()
    }

    pub fn max_close(&self) -> Option<f64> {
        self.bars
            .iter()
            .map(|bar| bar.close)
            .filter(|close| !close.is_nan())
            .reduce(f64::max)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use chrono::Days;

    use super::*;

    pub(crate) fn series_from_closes(symbol: &str, closes: &[f64]) -> PriceSeries {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let bars = closes
            .iter()
            .enumerate()
            .map(|(i, close)| PriceBar {
                date: start + Days::new(i as u64),
                open: *close,
                high: *close,
                low: *close,
                close: *close,
                volume: None,
            })
            .collect();

        PriceSeries::new(&Ticker::new(symbol), bars)
    }

    #[test]
    fn test_max_and_latest_close() {
        let series = series_from_closes("AAA", &[10.0, 12.0, 15.0, 13.0]);

        assert_eq!(series.max_close(), Some(15.0));
        assert_eq!(series.latest().map(|bar| bar.close), Some(13.0));
        assert_eq!(series.len(), 4);
    }

    #[test]
    fn test_bars_sorted_by_date() {
        let ticker = Ticker::new("AAA");
        let day = |d| NaiveDate::from_ymd_opt(2024, 3, d).unwrap();
        let bar = |d, close| PriceBar {
            date: day(d),
            open: close,
            high: close,
            low: close,
            close,
            volume: Some(100),
        };

        let series = PriceSeries::new(&ticker, vec![bar(3, 3.0), bar(1, 1.0), bar(2, 2.0)]);

        assert_eq!(series.closes(), [1.0, 2.0, 3.0]);
        assert_eq!(series.first_date(), Some(day(1)));
    }

    #[test]
    fn test_empty_series() {
        let series = PriceSeries::new(&Ticker::new("AAA"), vec![]);

        assert!(series.is_empty());
        assert_eq!(series.max_close(), None);
        assert!(series.latest().is_none());
    }
}
