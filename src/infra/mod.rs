pub mod compose_scanner;
pub mod config;
pub mod plugins;
pub mod process_runner;

pub use compose_scanner::ScanReport;
pub use config::ConfigStore;
pub use process_runner::SystemRunner;
