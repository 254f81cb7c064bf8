//! Output data models

pub mod acquisition_metadata;

pub use acquisition_metadata::AcquisitionMetadata;
