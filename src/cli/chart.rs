use athscan::{api, ticker::Ticker, utils::datetime::date_to_str};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use tabled::settings::{
    Alignment, Color,
    object::{Columns, Object, Rows},
};
use tokio::time::Duration;

#[derive(clap::Args)]
pub struct ChartCommand {
    #[arg(help = "Ticker symbol, e.g. AAPL")]
    ticker: String,

    #[arg(long, help = "Print the chart as JSON instead of a table")]
    json: bool,
}

impl ChartCommand {
    pub async fn exec(&self) {
        let spinner = ProgressBar::new_spinner();
        spinner
            .set_style(ProgressStyle::with_template("{msg}[{elapsed}] {spinner:.cyan}").unwrap());
        spinner.enable_steady_tick(Duration::from_millis(100));

        match api::monthly_chart(&Ticker::new(&self.ticker)).await {
            Ok(chart) => {
                spinner.finish_and_clear();

                if self.json {
                    match serde_json::to_string_pretty(&chart) {
                        Ok(json) => println!("{json}"),
                        Err(err) => eprintln!("{}", err.to_string().red()),
                    }
                    return;
                }

                let mut table_data: Vec<Vec<String>> = vec![vec![
                    chart.x_axis_title.to_string(),
                    "Open".to_string(),
                    "High".to_string(),
                    "Low".to_string(),
                    "Close".to_string(),
                ]];
                for candle in &chart.candles {
                    table_data.push(vec![
                        date_to_str(&candle.date),
                        format!("{:.2}", candle.open),
                        format!("{:.2}", candle.high),
                        format!("{:.2}", candle.low),
                        format!("{:.2}", candle.close),
                    ]);
                }

                let mut table = tabled::builder::Builder::from_iter(&table_data).build();
                table.modify(Rows::first(), Color::FG_BRIGHT_BLACK);
                table.modify(Columns::first().not(Rows::first()), Color::FG_CYAN);
                table.modify(Columns::new(1..), Alignment::right());

                println!("\n{}", chart.title);
                println!("{table}");
            }
            Err(err) => {
                spinner.finish_with_message(format!("{} ", err.to_string().red()));
            }
        }
    }
}
