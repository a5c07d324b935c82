use std::{path::PathBuf, sync::Arc, time::Duration};

use eframe::egui;
use egui_plot::{BoxElem, BoxPlot, BoxSpread, Plot};
use log::warn;
use tokio::sync::mpsc;

use crate::{
    CHANNEL_BUFFER_DEFAULT,
    chart::{self, ChartSpec},
    ds::MarketDataProvider,
    error::AthError,
    loader,
    scanner::{self, ScanEvent, ScanReport, ScanStream},
    ticker::Ticker,
    utils::datetime::{date_from_days, date_to_str, days_from},
};

pub struct ScannerApp {
    provider: Arc<dyn MarketDataProvider>,
    delimiter: u8,

    file_path: String,
    state: ScanState,
    scan_stream: Option<ScanStream>,
    notices: Vec<String>,

    chart_event_sender: mpsc::Sender<ChartEvent>,
    chart_event_receiver: mpsc::Receiver<ChartEvent>,
    chart: Option<ChartSpec>,
    chart_loading: Option<Ticker>,

    warning_message: Option<String>,
}

pub enum ScanState {
    NoFile,
    Scanning(PathBuf),
    Done(PathBuf, ScanReport),
}

enum ChartEvent {
    Loaded(ChartSpec),
    Error(Ticker, AthError),
}

static RISING_COLOR: egui::Color32 = egui::Color32::from_rgb(38, 166, 154);
static FALLING_COLOR: egui::Color32 = egui::Color32::from_rgb(239, 83, 80);

impl ScannerApp {
    pub fn new(
        cc: &eframe::CreationContext,
        provider: Arc<dyn MarketDataProvider>,
        delimiter: u8,
        file: Option<PathBuf>,
    ) -> Self {
        cc.egui_ctx.set_visuals(egui::Visuals::dark());

        let (chart_event_sender, chart_event_receiver) =
            mpsc::channel::<ChartEvent>(CHANNEL_BUFFER_DEFAULT);

        let mut app = Self {
            provider,
            delimiter,

            file_path: String::new(),
            state: ScanState::NoFile,
            scan_stream: None,
            notices: vec![],

            chart_event_sender,
            chart_event_receiver,
            chart: None,
            chart_loading: None,

            warning_message: None,
        };

        if let Some(file) = file {
            app.file_path = file.to_string_lossy().to_string();
            app.start_scan(file);
        }

        app
    }

    /// Every load starts from scratch, earlier results are dropped
    fn start_scan(&mut self, path: PathBuf) {
        if let Some(mut stream) = self.scan_stream.take() {
            stream.close();
        }
        self.notices.clear();
        self.chart = None;
        self.chart_loading = None;
        self.warning_message = None;

        match loader::load_tickers_from_file(&path, self.delimiter) {
            Ok(tickers) => {
                self.scan_stream = Some(scanner::scan_stream(self.provider.clone(), tickers));
                self.state = ScanState::Scanning(path);
            }
            Err(err) => {
                self.warning_message = Some(err.to_string());
                self.state = ScanState::NoFile;
            }
        }
    }

    fn load_chart(&mut self, ticker: &Ticker) {
        self.chart_loading = Some(ticker.clone());
        self.warning_message = None;

        let provider = self.provider.clone();
        let ticker = ticker.clone();
        let chart_event_sender = self.chart_event_sender.clone();

        tokio::spawn(async move {
            match chart::monthly_chart(provider.as_ref(), &ticker).await {
                Ok(chart) => {
                    let _ = chart_event_sender.send(ChartEvent::Loaded(chart)).await;
                }
                Err(err) => {
                    let _ = chart_event_sender
                        .send(ChartEvent::Error(ticker, err))
                        .await;
                }
            }
        });
    }

    fn on_scan_event(&mut self, event: ScanEvent) {
        let notice = event.to_string();

        match event {
            ScanEvent::Evaluated(..) => {}
            ScanEvent::Finished(report) => {
                if let ScanState::Scanning(path) = &self.state {
                    self.state = ScanState::Done(path.clone(), report);
                }
                self.scan_stream = None;
                self.notices.push(notice);
            }
            _ => self.notices.push(notice),
        }
    }

    fn on_chart_event(&mut self, event: ChartEvent) {
        match event {
            ChartEvent::Loaded(chart) => {
                if self.chart_loading.as_ref().map(|t| t.as_str()) == Some(chart.ticker.as_str()) {
                    self.chart_loading = None;
                }
                self.chart = Some(chart);
            }
            ChartEvent::Error(ticker, err) => {
                warn!("[{ticker}] {err}");

                self.chart_loading = None;
                self.warning_message = Some(format!("{ticker}: {err}"));
            }
        }
    }

    fn poll_events(&mut self) {
        while let Some(event) = self.scan_stream.as_mut().and_then(|s| s.try_next()) {
            self.on_scan_event(event);
        }

        while let Ok(event) = self.chart_event_receiver.try_recv() {
            self.on_chart_event(event);
        }
    }

    fn show_tools(&mut self, ui: &mut egui::Ui) {
        ui.horizontal_centered(|ui| {
            ui.label("🗀");
            ui.add(
                egui::TextEdit::singleline(&mut self.file_path)
                    .hint_text("Choose a CSV file with stock tickers, or drop it here")
                    .desired_width(480.0),
            );

            let scanning = matches!(self.state, ScanState::Scanning(_));
            if ui
                .add_enabled(!scanning && !self.file_path.trim().is_empty(), egui::Button::new("▶ Scan"))
                .clicked()
            {
                self.start_scan(PathBuf::from(self.file_path.trim()));
            }

            if scanning {
                ui.add(egui::Spinner::new());
            }
        });
    }

    fn show_results(&mut self, ui: &mut egui::Ui) {
        let mut selected: Option<Ticker> = None;

        match &self.state {
            ScanState::NoFile => {
                ui.label("Please upload a CSV file to proceed.");
            }
            ScanState::Scanning(_) => {
                ui.label("Scanning stocks, please wait...");
            }
            ScanState::Done(_, report) => {
                if report.is_empty() {
                    ui.label("No stocks are breaking their all-time high at the moment.");
                } else {
                    ui.label("Stocks currently breaking their all-time high:");

                    let current = self.chart.as_ref().map(|c| c.ticker.as_str());
                    for ticker in &report.breaking {
                        if ui
                            .selectable_label(current == Some(ticker.as_str()), ticker.as_str())
                            .clicked()
                        {
                            selected = Some(ticker.clone());
                        }
                    }
                }
            }
        }

        ui.separator();

        egui::ScrollArea::vertical()
            .stick_to_bottom(true)
            .show(ui, |ui| {
                for notice in &self.notices {
                    ui.label(
                        egui::RichText::new(notice)
                            .color(egui::Color32::GRAY)
                            .size(12.0),
                    );
                }
            });

        if let Some(ticker) = selected {
            self.load_chart(&ticker);
        }
    }

    fn show_chart(&self, ui: &mut egui::Ui) {
        if let Some(ticker) = &self.chart_loading {
            ui.horizontal(|ui| {
                ui.add(egui::Spinner::new());
                ui.label(format!("Loading chart for {ticker}..."));
            });
        }

        let Some(chart) = &self.chart else {
            return;
        };
        let Some(origin) = chart.first_date() else {
            ui.label(format!("No data for {}", chart.ticker));
            return;
        };

        ui.heading(&chart.title);

        let boxes: Vec<BoxElem> = chart
            .candles
            .iter()
            .map(|candle| {
                let color = if candle.is_rising() {
                    RISING_COLOR
                } else {
                    FALLING_COLOR
                };
                let body_low = candle.open.min(candle.close);
                let body_high = candle.open.max(candle.close);

                BoxElem::new(
                    days_from(&origin, &candle.date),
                    BoxSpread::new(
                        candle.low,
                        body_low,
                        (body_low + body_high) / 2.0,
                        body_high,
                        candle.high,
                    ),
                )
                .name(date_to_str(&candle.date))
                .box_width(20.0)
                .whisker_width(0.0)
                .fill(color)
                .stroke(egui::Stroke::new(1.0, color))
            })
            .collect();

        // Without a range slider the x range is fixed to the fetched year
        Plot::new("monthly_chart")
            .x_axis_label(chart.x_axis_title.as_str())
            .y_axis_label(chart.y_axis_title.as_str())
            .x_axis_formatter(move |mark, _| {
                date_from_days(&origin, mark.value)
                    .map(|date| date.format("%Y-%m").to_string())
                    .unwrap_or_default()
            })
            .allow_drag(chart.range_slider_visible)
            .allow_zoom(chart.range_slider_visible)
            .show(ui, |plot_ui| {
                plot_ui.box_plot(BoxPlot::new(chart.ticker.as_str(), boxes));
            });
    }
}

impl eframe::App for ScannerApp {
    fn update(&mut self, ctx: &egui::Context, _: &mut eframe::Frame) {
        let dropped_files = ctx.input(|i| i.raw.dropped_files.clone());
        let scanning = matches!(self.state, ScanState::Scanning(_));
        if let Some(path) = dropped_files
            .into_iter()
            .find_map(|file| file.path)
            .filter(|_| !scanning)
        {
            self.file_path = path.to_string_lossy().to_string();
            self.start_scan(path);
        }

        self.poll_events();

        if self.scan_stream.is_some() || self.chart_loading.is_some() {
            ctx.request_repaint_after(Duration::from_millis(100));
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::TopBottomPanel::top("tools_panel")
                .show_separator_line(false)
                .show_inside(ui, |ui| {
                    self.show_tools(ui);
                });

            egui::TopBottomPanel::bottom("status_panel")
                .show_separator_line(false)
                .show_inside(ui, |ui| {
                    ui.horizontal_centered(|ui| {
                        let location = match &self.state {
                            ScanState::NoFile => String::new(),
                            ScanState::Scanning(path) | ScanState::Done(path, _) => {
                                format!("🗀 {}", path.to_string_lossy())
                            }
                        };
                        ui.label(
                            egui::RichText::new(location)
                                .color(egui::Color32::DARK_GRAY)
                                .size(12.0),
                        );

                        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                            ui.label(
                                egui::RichText::new(
                                    self.warning_message
                                        .as_ref()
                                        .map(|t| format!("⚠ {t}"))
                                        .unwrap_or_default(),
                                )
                                .color(egui::Color32::DARK_GRAY)
                                .size(12.0),
                            );
                        });
                    });
                });

            egui::SidePanel::left("results_panel")
                .resizable(true)
                .default_width(260.0)
                .show_inside(ui, |ui| {
                    self.show_results(ui);
                });

            egui::CentralPanel::default().show_inside(ui, |ui| {
                self.show_chart(ui);
            });
        });
    }
}
