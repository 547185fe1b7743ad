//! Source loaders for lake analytics
//!
//! Reads satellite surface-area exports and the laboratory water-quality
//! CSV from disk and hands them to the core as typed records. Lake names
//! and ids are resolved through an immutable [`LakeCatalog`].

pub mod bhuvan;
pub mod catalog;
pub mod water_quality;

pub use bhuvan::*;
pub use catalog::*;
pub use water_quality::*;

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid JSON in {}: {source}", .path.display())]
    InvalidJson {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Missing column: {0}")]
    MissingColumn(String),
}

pub type IngestResult<T> = Result<T, IngestError>;
