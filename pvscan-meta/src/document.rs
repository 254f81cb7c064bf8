//! Parsed PrairieView metadata document
//!
//! Wraps the root `PVScan` element and names the lookup paths of the
//! schema. Global acquisition state is read from the document-level
//! `PVScan/PVStateShard`; per-frame state lives under each `Frame`.

use std::path::{Path, PathBuf};

use crate::error::{MetadataError, MetadataResult};
use crate::xml::{exactly_one, parse_f64, Element};

/// A parsed metadata XML file
#[derive(Debug, Clone)]
pub struct PvDocument {
    source: PathBuf,
    root: Element,
}

impl PvDocument {
    /// Parse XML text; `source` is only used for error reporting
    pub fn parse(source: impl Into<PathBuf>, xml: &str) -> MetadataResult<Self> {
        let source = source.into();
        let root = Element::parse(xml).map_err(|e| MetadataError::Xml {
            path: source.clone(),
            source: e,
        })?;
        Ok(Self { source, root })
    }

    /// Read and parse an XML file
    pub fn from_file(path: &Path) -> MetadataResult<Self> {
        let xml = std::fs::read_to_string(path)?;
        Self::parse(path, &xml)
    }

    /// File the document was read from
    pub fn source(&self) -> &Path {
        &self.source
    }

    /// Root element
    pub fn root(&self) -> &Element {
        &self.root
    }

    /// True if the document describes at least one acquisition sequence
    pub fn has_sequence(&self) -> bool {
        !self.root.descendants_named("Sequence").is_empty()
    }

    /// Every `Sequence/Frame` in document order, across all cycles
    pub fn frames(&self) -> Vec<&Element> {
        self.root
            .descendants_named("Sequence")
            .into_iter()
            .flat_map(|seq| seq.children_named("Frame"))
            .collect()
    }

    /// The unique `Sequence[@cycle='1']`
    pub fn first_cycle(&self) -> MetadataResult<&Element> {
        exactly_one(
            self.root
                .descendants_named("Sequence")
                .into_iter()
                .filter(|seq| seq.attr_is("cycle", "1")),
            "Sequence[@cycle='1']",
        )
    }

    /// The unique global `PVStateValue[@key=key]`
    pub fn state_value(&self, key: &str) -> MetadataResult<&Element> {
        exactly_one(
            self.root
                .children_named("PVStateShard")
                .flat_map(|shard| shard.children_named("PVStateValue"))
                .filter(|value| value.attr_is("key", key)),
            &format!("PVStateValue[@key='{}']", key),
        )
    }

    /// The `value` attribute of a global state value
    pub fn state_text(&self, key: &str) -> MetadataResult<&str> {
        let field = format!("PVStateValue[@key='{}']", key);
        self.state_value(key)?.required_attr("value", &field)
    }

    /// A global state value parsed as f64
    pub fn state_f64(&self, key: &str) -> MetadataResult<f64> {
        let field = format!("PVStateValue[@key='{}']", key);
        parse_f64(self.state_text(key)?, &field)
    }

    /// The unique `IndexedValue[@index=index]` of a global state value, as f64
    pub fn indexed_f64(&self, key: &str, index: &str) -> MetadataResult<f64> {
        let field = format!("PVStateValue[@key='{}']/IndexedValue[@index='{}']", key, index);
        let entry = exactly_one(
            self.state_value(key)?
                .children_named("IndexedValue")
                .filter(|v| v.attr_is("index", index)),
            &field,
        )?;
        parse_f64(entry.required_attr("value", &field)?, &field)
    }
}
