use clap::Subcommand;

mod chart;
mod config;
mod gui;
mod scan;

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Show the monthly candlestick bars of a ticker")]
    Chart(Box<chart::ChartCommand>),

    #[command(subcommand, about = "Show or change configurations")]
    Config(Box<config::ConfigCommand>),

    #[command(about = "Open the scanner window")]
    Gui(Box<gui::GuiCommand>),

    #[command(about = "Scan the tickers of a CSV file for all-time highs")]
    #[clap(visible_aliases = &["ath"])]
    Scan(Box<scan::ScanCommand>),
}

pub fn parse_delimiter(s: &str) -> Result<u8, String> {
    let s = if s == "\\t" { "\t" } else { s };

    match s.as_bytes() {
        [b] if b.is_ascii() => Ok(*b),
        _ => Err(format!("Delimiter must be a single ASCII character, got '{s}'")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_delimiter() {
        assert_eq!(parse_delimiter(","), Ok(b','));
        assert_eq!(parse_delimiter("\\t"), Ok(b'\t'));
        assert!(parse_delimiter(";;").is_err());
        assert!(parse_delimiter("é").is_err());
    }
}
