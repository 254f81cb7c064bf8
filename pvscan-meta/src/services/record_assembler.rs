//! Metadata record assembly
//!
//! Pure merge of the scalar and depth results. Runs only after both
//! upstream stages succeeded, so there is nothing left to fail.

use crate::models::AcquisitionMetadata;
use crate::services::depth_resolver::DepthResolution;
use crate::services::scalar_extractor::ScalarMetadata;

/// Merge extractor and resolver outputs into the flat record
pub fn assemble(scalars: ScalarMetadata, depths: DepthResolution) -> AcquisitionMetadata {
    // Square frames: one edge length and one microns-per-pixel serve both axes
    let edge_pixels = scalars.pixels_per_line;
    let edge_um = f64::from(edge_pixels) * scalars.microns_per_pixel;

    AcquisitionMetadata {
        num_fields: AcquisitionMetadata::NUM_FIELDS,
        num_channels: scalars.num_channels,
        num_depths: depths.num_depths,
        num_frames: scalars.num_frames,
        num_rois: AcquisitionMetadata::NUM_ROIS,
        frame_rate: scalars.frame_rate,
        bidirectional: false,
        bidirectional_z: depths.bidirectional_z,
        scan_datetime: scalars.scan_datetime,
        recording_time: scalars.recording_time,
        usecs_per_line: scalars.usecs_per_line,
        scan_duration: scalars.scan_duration,
        height_in_pixels: edge_pixels,
        width_in_pixels: edge_pixels,
        height_in_um: edge_um,
        width_in_um: edge_um,
        field_x: scalars.field_x,
        field_y: scalars.field_y,
        z_positions: depths.z_positions,
    }
}
