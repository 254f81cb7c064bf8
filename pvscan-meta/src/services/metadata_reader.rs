//! PrairieView metadata reader
//!
//! Runs the full pipeline for one acquisition:
//! locate XML → extract scalars + resolve depths → assemble record.
//!
//! Holds only configuration, so one reader can serve any number of
//! acquisitions, including from several threads at once.

use pvscan_common::config::{ConfigResolver, ReaderConfig, TomlConfig};
use pvscan_common::logging::init_logging;
use std::path::Path;
use tracing::info;

use crate::document::PvDocument;
use crate::error::MetadataResult;
use crate::models::AcquisitionMetadata;
use crate::services::depth_resolver::resolve_depths;
use crate::services::metadata_locator::locate_metadata;
use crate::services::record_assembler::assemble;
use crate::services::scalar_extractor::extract_scalars;

/// Metadata reader service
#[derive(Debug, Clone, Default)]
pub struct MetadataReader {
    config: ReaderConfig,
}

impl MetadataReader {
    /// Create reader with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Create reader with explicit settings
    pub fn with_config(config: ReaderConfig) -> Self {
        Self { config }
    }

    /// Create reader from the `[reader]` section of a loaded config
    pub fn from_config(config: &TomlConfig) -> Self {
        Self::with_config(config.reader.clone())
    }

    /// Resolve the config file and create a reader from it
    pub fn from_resolver(resolver: &ConfigResolver) -> MetadataResult<Self> {
        let config = resolver.resolve()?;
        Ok(Self::from_config(&config))
    }

    /// Resolve the config file, install the global log subscriber from its
    /// `[logging]` section, and create a reader from its `[reader]` section
    ///
    /// For host processes that have no subscriber of their own. Fails if a
    /// global subscriber is already installed.
    pub fn init(resolver: &ConfigResolver) -> MetadataResult<Self> {
        let config = resolver.resolve()?;
        init_logging(&config.logging)?;
        info!(
            extension = %config.reader.metadata_extension,
            "Metadata reader initialised"
        );
        Ok(Self::from_config(&config))
    }

    /// Active settings
    pub fn config(&self) -> &ReaderConfig {
        &self.config
    }

    /// Extract metadata for the acquisition that `image_path` belongs to
    pub fn extract(&self, image_path: &Path) -> MetadataResult<AcquisitionMetadata> {
        let doc = locate_metadata(image_path, &self.config.metadata_extension)?;
        self.extract_document(&doc)
    }

    /// Extract metadata from an already parsed document
    pub fn extract_document(&self, doc: &PvDocument) -> MetadataResult<AcquisitionMetadata> {
        let scalars = extract_scalars(doc, &self.config)?;
        let depths = resolve_depths(doc)?;
        let record = assemble(scalars, depths);

        info!(
            file = %doc.source().display(),
            num_frames = record.num_frames,
            num_channels = record.num_channels,
            num_depths = record.num_depths,
            frame_rate = record.frame_rate,
            "Extracted acquisition metadata"
        );

        Ok(record)
    }

    /// Extract metadata for several acquisitions, one result per input path
    pub fn extract_batch(
        &self,
        image_paths: &[impl AsRef<Path>],
    ) -> Vec<MetadataResult<AcquisitionMetadata>> {
        image_paths
            .iter()
            .map(|path| self.extract(path.as_ref()))
            .collect()
    }
}
