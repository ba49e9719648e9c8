//! Export of call trees and statistics reports.
//!
//! This module handles:
//! - Converting trees into nested documents
//! - The document and report schema
//! - Writing reports to disk as JSON

pub mod document;
pub mod json;
pub mod schema;

// Re-export main types and functions
pub use document::ToDocument;
pub use json::{read_report, write_report};
pub use schema::{
    AggregatedActionDocument, AggregatedTreeDocument, CallTreeDocument, OrderedActionDocument,
    OrderedTreeDocument, StatsReport,
};

use crate::utils::error::OutputError;
use std::path::Path;

/// Common path validation for output files
pub fn validate_path(path: &Path) -> Result<(), OutputError> {
    if path.as_os_str().is_empty() {
        return Err(OutputError::InvalidPath("Path is empty".to_string()));
    }

    if path.exists() && path.is_dir() {
        return Err(OutputError::InvalidPath(format!(
            "Path is a directory: {}",
            path.display()
        )));
    }

    Ok(())
}
