//! pvscan-meta: PrairieView acquisition metadata
//!
//! Reads the XML sidecar PrairieView writes next to its per-frame image
//! files and turns it into one flat [`AcquisitionMetadata`] record for the
//! imaging pipeline.
//!
//! Ordering is part of the contract:
//! - the metadata XML is the first qualifying file in file-name order
//! - "last frame" and "frame order" mean XML document order

pub mod document;
pub mod error;
pub mod models;
pub mod services;
pub mod xml;

pub use crate::document::PvDocument;
pub use crate::error::{MetadataError, MetadataResult};
pub use crate::models::AcquisitionMetadata;
pub use crate::services::MetadataReader;

use std::path::Path;

/// Extract metadata for the acquisition that `image_path` belongs to,
/// using default reader settings
pub fn extract_metadata(image_path: &Path) -> MetadataResult<AcquisitionMetadata> {
    MetadataReader::new().extract(image_path)
}
