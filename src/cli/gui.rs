use std::path::{Path, PathBuf};

use athscan::{VERSION, api, gui::scanner_app::ScannerApp};
use colored::Colorize;
use eframe::egui;

use crate::cli::parse_delimiter;

#[derive(clap::Args)]
pub struct GuiCommand {
    #[arg(help = "CSV file with a 'stock' column, scanned on start")]
    file: Option<PathBuf>,

    #[arg(
        short = 'd',
        long = "delimiter",
        default_value = ",",
        value_parser = parse_delimiter,
        help = "Field delimiter of the CSV file"
    )]
    delimiter: u8,
}

impl GuiCommand {
    pub async fn exec(&self) {
        open_scanner_window(self.file.as_deref(), self.delimiter).await;
    }
}

pub async fn open_scanner_window(file: Option<&Path>, delimiter: u8) {
    let provider = api::default_provider().await;
    let file = file.map(Path::to_path_buf);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 800.0])
            .with_drag_and_drop(true),
        ..Default::default()
    };

    if let Err(err) = eframe::run_native(
        &format!("Stocks breaking All Time High {VERSION}"),
        options,
        Box::new(move |cc| Ok(Box::new(ScannerApp::new(cc, provider, delimiter, file)))),
    ) {
        println!("[!] {}", err.to_string().red());
    }
}
