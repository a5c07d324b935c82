use std::path::PathBuf;

use athscan::{
    api,
    api::{ScanEvent, ScanResult},
    scanner::ScanReport,
};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use tabled::{
    Table,
    settings::{
        Alignment, Color,
        object::{Columns, Object, Rows},
    },
};
use tokio::time::Duration;

use crate::cli::{gui::open_scanner_window, parse_delimiter};

#[derive(clap::Args)]
pub struct ScanCommand {
    #[arg(help = "CSV file with a 'stock' column, e.g. tickers.csv")]
    file: PathBuf,

    #[arg(
        short = 'd',
        long = "delimiter",
        default_value = ",",
        value_parser = parse_delimiter,
        help = "Field delimiter of the CSV file"
    )]
    delimiter: u8,

    #[arg(
        short = 'g',
        help = "Open GUI window afterwards to browse the monthly charts"
    )]
    gui: bool,
}

impl ScanCommand {
    pub async fn exec(&self) {
        let tickers = match api::load_tickers(&self.file, self.delimiter) {
            Ok(tickers) => tickers,
            Err(err) => {
                println!("[!] {}", err.to_string().red());
                return;
            }
        };

        let spinner = ProgressBar::new_spinner();
        spinner
            .set_style(ProgressStyle::with_template("[{elapsed}] {msg} {spinner:.cyan}").unwrap());
        spinner.enable_steady_tick(Duration::from_millis(100));

        let mut stream = api::scan_stream(tickers).await;
        while let Some(event) = stream.next().await {
            match event {
                ScanEvent::Started(_) | ScanEvent::Processing(_) => {
                    spinner.set_message(event.to_string());
                }
                ScanEvent::NoData(_) => {
                    spinner.println(format!("[i] {}", event.to_string().bright_black()));
                }
                ScanEvent::Error(_, _) => {
                    spinner.println(format!("[!] {}", event.to_string().red()));
                }
                ScanEvent::Evaluated(_, _) => {}
                ScanEvent::Finished(ref report) => {
                    spinner.finish_and_clear();

                    println!("\n{}", report_to_table(report));
                    println!("{event}");
                    for ticker in &report.breaking {
                        println!("  {}", ticker.to_string().green());
                    }
                }
            }
        }

        if self.gui {
            open_scanner_window(Some(&self.file), self.delimiter).await;
        }
    }
}

fn report_to_table(report: &ScanReport) -> Table {
    let mut table_data: Vec<Vec<String>> = vec![vec![
        "".to_string(),
        "Latest Close".to_string(),
        "All-Time High".to_string(),
        "From High".to_string(),
        "Breaking".to_string(),
    ]];

    let mut breaking_rows: Vec<usize> = vec![];
    for (i, (ticker, result)) in report.results.iter().enumerate() {
        let ScanResult {
            all_time_high,
            latest_close,
            is_breaking_high,
        } = result;

        table_data.push(vec![
            ticker.to_string(),
            latest_close
                .map(|v| format!("{v:.2}"))
                .unwrap_or("-".to_string()),
            all_time_high
                .map(|v| format!("{v:.2}"))
                .unwrap_or("-".to_string()),
            match (latest_close, all_time_high) {
                (Some(close), Some(high)) if *high != 0.0 => {
                    format!("{:.2}%", (close / high - 1.0) * 100.0)
                }
                _ => "-".to_string(),
            },
            if *is_breaking_high {
                breaking_rows.push(i + 1);
                "✔".to_string()
            } else {
                "".to_string()
            },
        ]);
    }

    let mut table = tabled::builder::Builder::from_iter(&table_data).build();
    table.modify(Rows::first(), Color::FG_BRIGHT_BLACK);
    table.modify(Columns::first().not(Rows::first()), Color::FG_CYAN);
    for i in breaking_rows {
        table.modify(Rows::new(i..i + 1).not(Columns::first()), Color::FG_GREEN);
    }
    table.modify(Columns::new(1..), Alignment::right());

    table
}

#[cfg(test)]
mod tests {
    use athscan::ticker::Ticker;

    use super::*;

    #[test]
    fn test_report_to_table() {
        let report = ScanReport {
            breaking: vec![Ticker::new("AAA")],
            results: vec![
                (
                    Ticker::new("AAA"),
                    ScanResult {
                        all_time_high: Some(15.0),
                        latest_close: Some(15.0),
                        is_breaking_high: true,
                    },
                ),
                (Ticker::new("BBB"), ScanResult::absent()),
            ],
        };

        let text = report_to_table(&report).to_string();

        assert!(text.contains("AAA"));
        assert!(text.contains("15.00"));
        assert!(text.contains("0.00%"));
        assert!(text.contains("BBB"));
    }
}
