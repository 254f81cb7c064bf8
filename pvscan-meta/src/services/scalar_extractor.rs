//! Scalar metadata extraction
//!
//! Pulls the single-valued acquisition fields out of a parsed document:
//! timing, geometry, channel and frame counts, scan centre.

use chrono::{NaiveDateTime, NaiveTime};
use pvscan_common::config::ReaderConfig;
use pvscan_common::time::{parse_scan_datetime, parse_time_of_day};
use std::collections::BTreeSet;

use crate::document::PvDocument;
use crate::error::{MetadataError, MetadataResult};
use crate::xml::parse_f64;

/// Single-valued fields of one acquisition
#[derive(Debug, Clone, PartialEq)]
pub struct ScalarMetadata {
    /// Distinct channel identifiers across all frame files
    pub num_channels: usize,
    /// Frame nodes across every cycle and depth
    pub num_frames: usize,
    /// Hz, the reciprocal of framePeriod
    pub frame_rate: f64,
    /// Microseconds per scan line
    pub usecs_per_line: f64,
    /// Acquisition start from the root `date` attribute
    pub scan_datetime: NaiveDateTime,
    /// Time of day cycle 1 started, when the Sequence records it
    pub recording_time: Option<NaiveTime>,
    /// Seconds, `relativeTime` of the last frame
    pub scan_duration: f64,
    /// Frame edge in pixels (frames are square)
    pub pixels_per_line: u32,
    /// X-axis microns per pixel
    pub microns_per_pixel: f64,
    /// Field centre, instrument X
    pub field_x: f64,
    /// Field centre, instrument Y
    pub field_y: f64,
}

/// Extract every scalar field; the first failing lookup aborts
pub fn extract_scalars(doc: &PvDocument, config: &ReaderConfig) -> MetadataResult<ScalarMetadata> {
    let frames = doc.frames();

    let mut channels = BTreeSet::new();
    for file in frames.iter().flat_map(|frame| frame.children_named("File")) {
        if let Some(channel) = file.attr("channel") {
            let id: i64 = channel
                .trim()
                .parse()
                .map_err(|_| MetadataError::invalid("Frame/File@channel", channel))?;
            channels.insert(id);
        }
    }

    let frame_period = doc.state_f64("framePeriod")?;
    if !(frame_period.is_finite() && frame_period > 0.0) {
        return Err(MetadataError::invalid(
            "PVStateValue[@key='framePeriod']",
            frame_period.to_string(),
        ));
    }
    let frame_rate = 1.0 / frame_period;

    let usecs_per_line = doc.state_f64("scanLinePeriod")? * 1e6;

    let date = doc.root().required_attr("date", "PVScan")?;
    let scan_datetime = parse_scan_datetime(date, &config.date_format)?;

    let recording_time = doc
        .first_cycle()?
        .attr("time")
        .map(|time| parse_time_of_day(time, &config.time_format))
        .transpose()?;

    let last_frame = frames
        .last()
        .ok_or_else(|| MetadataError::missing("Sequence/Frame"))?;
    let scan_duration = parse_f64(
        last_frame.required_attr("relativeTime", "Sequence/Frame")?,
        "Sequence/Frame@relativeTime",
    )?;

    let pixels_text = doc.state_text("pixelsPerLine")?;
    let pixels_per_line: u32 = pixels_text
        .trim()
        .parse()
        .map_err(|_| MetadataError::invalid("PVStateValue[@key='pixelsPerLine']", pixels_text))?;

    let microns_per_pixel = doc.indexed_f64("micronsPerPixel", "XAxis")?;
    let field_x = doc.indexed_f64("currentScanCenter", "XAxis")?;
    let field_y = doc.indexed_f64("currentScanCenter", "YAxis")?;

    Ok(ScalarMetadata {
        num_channels: channels.len(),
        num_frames: frames.len(),
        frame_rate,
        usecs_per_line,
        scan_datetime,
        recording_time,
        scan_duration,
        pixels_per_line,
        microns_per_pixel,
        field_x,
        field_y,
    })
}
