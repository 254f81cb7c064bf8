//! Pipeline stages
//!
//! Locator → (parsed document) → scalar extractor + depth resolver → assembler.

pub mod depth_resolver;
pub mod metadata_locator;
pub mod metadata_reader;
pub mod record_assembler;
pub mod scalar_extractor;

pub use depth_resolver::{resolve_depths, DepthLayout, DepthResolution};
pub use metadata_locator::{acquisition_directory, locate_metadata};
pub use metadata_reader::MetadataReader;
pub use record_assembler::assemble;
pub use scalar_extractor::{extract_scalars, ScalarMetadata};
