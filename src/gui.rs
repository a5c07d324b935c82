pub mod scanner_app;
