use athscan::api;
use colored::Colorize;

#[derive(clap::Args)]
pub struct ConfigSetCommand {
    #[arg(help = "yahoo_api, timeout_secs, max_retries or adjust_prices")]
    key: String,
    value: String,
}

impl ConfigSetCommand {
    pub async fn exec(&self) {
        match api::set_config(&self.key, &self.value).await {
            Ok(stored) => {
                println!(
                    "[✔] {} = {}",
                    self.key.to_lowercase().cyan(),
                    stored.bold()
                );
                println!(
                    "{}",
                    format!("Saved to {}", api::config_path().display()).bright_black()
                );
            }
            Err(err) => {
                println!("[!] {}", err.to_string().red());
            }
        }
    }
}
