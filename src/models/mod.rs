pub mod config;
pub mod report;

pub use config::{load_params_file, parse_params, AppConfig, Preset};
pub use report::StatsReport;
