pub mod combine;
pub mod config;
pub mod cost;
pub mod document;
pub mod fields;
pub mod loader;
pub mod version;

pub use combine::{combine, CombinedReport, ReportInput};
pub use config::Config;
pub use cost::Cost;
pub use document::Document;
