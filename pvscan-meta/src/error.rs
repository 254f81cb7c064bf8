//! Error types for pvscan-meta
//!
//! Every failure is fatal for the acquisition being read. Nothing here is
//! retried and no partial record is ever produced.

use std::path::PathBuf;
use thiserror::Error;

use crate::xml::TreeError;

/// Result type for metadata extraction
pub type MetadataResult<T> = Result<T, MetadataError>;

/// Metadata extraction errors
#[derive(Debug, Error)]
pub enum MetadataError {
    /// No XML in the directory contains a Sequence element
    #[error("No PrairieView metadata XML file found in {}", .directory.display())]
    NotFound { directory: PathBuf },

    /// An expected node or attribute is absent
    #[error("Required field missing in XML: {field}")]
    MissingNode { field: String },

    /// A lookup that must match exactly one node matched several
    #[error("Required field ambiguous in XML: {field} matched {count} nodes")]
    AmbiguousNode { field: String, count: usize },

    /// Attribute present but not convertible to the expected type
    #[error("Invalid value for {field}: {value:?}")]
    InvalidValue { field: String, value: String },

    /// Not exactly one Z controller changes across the depth frames
    #[error("Depth controller disambiguation failed: {varying} controllers vary across depths (expected exactly 1)")]
    ControllerDisambiguation { varying: usize },

    /// Resolved Z positions do not line up with the depth count
    #[error("Depth count mismatch: expected {expected} z positions, found {actual}")]
    DepthCountMismatch { expected: usize, actual: usize },

    /// Candidate XML could not be parsed
    #[error("Malformed XML in {}: {source}", .path.display())]
    Xml {
        path: PathBuf,
        #[source]
        source: TreeError,
    },

    /// I/O error (file read)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// pvscan-common error (timestamps, config)
    #[error("Common error: {0}")]
    Common(#[from] pvscan_common::Error),
}

impl MetadataError {
    pub(crate) fn missing(field: impl Into<String>) -> Self {
        Self::MissingNode {
            field: field.into(),
        }
    }

    pub(crate) fn invalid(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.into(),
            value: value.into(),
        }
    }
}
