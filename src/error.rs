//! Error type for the fallible edges of the crate.
//!
//! Layout itself never fails; only decoding input, loading a theme and
//! exporting can.

use std::io;

use thiserror::Error;

use crate::export::ExportError;

#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Invalid concept JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Theme error: {0}")]
    Theme(String),

    #[error("Export error: {0}")]
    Export(#[from] ExportError),

    #[error("{0}")]
    Usage(String),
}
