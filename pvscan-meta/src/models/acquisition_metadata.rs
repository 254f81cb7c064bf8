//! Acquisition metadata record
//!
//! The flat snapshot handed to the table-population side of the pipeline.
//! Serialized key names follow the pipeline's ScanInfo/Field columns.

use chrono::{NaiveDateTime, NaiveTime};
use serde::Serialize;

/// Metadata for one PrairieView acquisition
///
/// Built fresh by the assembler for every extraction and never mutated
/// afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AcquisitionMetadata {
    /// Always 1; PrairieView images a single field
    pub num_fields: u32,
    pub num_channels: usize,
    #[serde(rename = "num_planes")]
    pub num_depths: usize,
    pub num_frames: usize,
    /// Always 0; ROIs are not recorded in the XML
    pub num_rois: u32,
    /// Hz
    pub frame_rate: f64,
    /// Always false; no bidirectional XY scanning
    pub bidirectional: bool,
    pub bidirectional_z: bool,
    /// Serializes as ISO-8601 (`2023-03-14T13:05:09`)
    pub scan_datetime: NaiveDateTime,
    /// Null when the cycle-1 Sequence carries no `time`
    pub recording_time: Option<NaiveTime>,
    pub usecs_per_line: f64,
    /// Seconds
    pub scan_duration: f64,
    pub height_in_pixels: u32,
    pub width_in_pixels: u32,
    pub height_in_um: f64,
    pub width_in_um: f64,
    #[serde(rename = "fieldX")]
    pub field_x: f64,
    #[serde(rename = "fieldY")]
    pub field_y: f64,
    /// One entry per depth
    #[serde(rename = "fieldZ")]
    pub z_positions: Vec<f64>,
}

impl AcquisitionMetadata {
    pub const NUM_FIELDS: u32 = 1;
    pub const NUM_ROIS: u32 = 0;

    /// Render as a JSON object keyed by pipeline column names
    pub fn to_json(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::to_value(self)
    }
}
