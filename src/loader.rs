use std::{fs::File, io::Read, path::Path};

use log::debug;

use crate::{
    TICKER_COLUMN,
    error::{AthError, AthResult},
    ticker::Ticker,
};

/// Reads the `stock` column of a delimited file with a header row.
///
/// Values are returned in file order without trimming or deduplication. A row
/// too short to reach the column contributes an empty symbol.
pub fn load_tickers<R: Read>(reader: R, delimiter: u8) -> AthResult<Vec<Ticker>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::None)
        .from_reader(reader);

    let column_index = csv_reader
        .headers()?
        .iter()
        .position(|header| header == TICKER_COLUMN)
        .ok_or_else(|| AthError::missing_column(TICKER_COLUMN))?;

    let mut tickers: Vec<Ticker> = vec![];
    for record in csv_reader.records() {
        let record = record?;
        let symbol = record.get(column_index).unwrap_or_default();
        tickers.push(Ticker::new(symbol));
    }

    debug!("Loaded {} tickers", tickers.len());

    Ok(tickers)
}

pub fn load_tickers_from_file(path: &Path, delimiter: u8) -> AthResult<Vec<Ticker>> {
    let file = File::open(path)?;
    load_tickers(file, delimiter)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn symbols(tickers: &[Ticker]) -> Vec<&str> {
        tickers.iter().map(|t| t.as_str()).collect()
    }

    #[test]
    fn test_load_tickers() {
        let csv = "name,stock\nApple,AAPL\nMicrosoft,MSFT\nApple again,AAPL\n";
        let tickers = load_tickers(csv.as_bytes(), b',').unwrap();

        assert_eq!(symbols(&tickers), ["AAPL", "MSFT", "AAPL"]);
    }

    #[test]
    fn test_load_tickers_keeps_raw_values() {
        let csv = "stock,sector\n aapl ,tech\nBRK.B,finance\nshort\n";
        let tickers = load_tickers(csv.as_bytes(), b',').unwrap();

        assert_eq!(symbols(&tickers), [" aapl ", "BRK.B", "short"]);
    }

    #[test]
    fn test_load_tickers_short_row() {
        let csv = "name,stock\nApple,AAPL\nNothing\n";
        let tickers = load_tickers(csv.as_bytes(), b',').unwrap();

        assert_eq!(symbols(&tickers), ["AAPL", ""]);
    }

    #[test]
    fn test_load_tickers_missing_column() {
        let csv = "ticker\nAAPL\n";
        let err = load_tickers(csv.as_bytes(), b',').unwrap_err();

        assert!(matches!(err, AthError::Schema { .. }));
        assert_eq!(err.to_string(), "Column 'stock' not found in the CSV file.");
    }

    #[test]
    fn test_load_tickers_column_name_is_exact() {
        let csv = "Stock,stocks\nAAPL,MSFT\n";

        assert!(load_tickers(csv.as_bytes(), b',').is_err());
    }

    #[test]
    fn test_load_tickers_delimiter() {
        let csv = "name;stock\nApple;AAPL\n";
        let tickers = load_tickers(csv.as_bytes(), b';').unwrap();

        assert_eq!(symbols(&tickers), ["AAPL"]);
    }

    #[test]
    fn test_load_tickers_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "stock\nAAA\nBBB\n").unwrap();

        let tickers = load_tickers_from_file(file.path(), b',').unwrap();

        assert_eq!(symbols(&tickers), ["AAA", "BBB"]);
    }

    #[test]
    fn test_load_tickers_from_missing_file() {
        let err = load_tickers_from_file(Path::new("/nonexistent/tickers.csv"), b',').unwrap_err();

        assert!(matches!(err, AthError::IoError(_)));
    }
}
