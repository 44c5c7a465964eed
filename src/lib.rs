pub mod cli;
pub mod core;
pub mod report;

pub use crate::core::combine::{combine, CombinedReport, ReportGroup, ReportInput};
pub use crate::core::document::Document;
pub use crate::core::fields::{project_fields, Field, FieldSelection, Warning};
pub use crate::core::version::{check_output_version, MAX_OUTPUT_VERSION, MIN_OUTPUT_VERSION};
pub use crate::report::{DiffBaseline, OutputFormat, RenderOptions};

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CostfoldError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Error parsing JSON file {path}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("Invalid cost estimate file version '{version}'. Supported versions are {min} ≤ x ≤ {max}")]
    UnsupportedVersion {
        version: String,
        min: &'static str,
        max: &'static str,
    },

    #[error("{0}")]
    NoInputs(String),

    #[error("Error rendering {format} output: {message}")]
    Render {
        format: &'static str,
        message: String,
    },

    #[error("Invalid configuration: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, CostfoldError>;
