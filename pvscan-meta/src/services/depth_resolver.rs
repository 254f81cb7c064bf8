//! Z-axis depth resolution
//!
//! Decides once per document which of three schema shapes it has, then
//! reads one Z position per depth:
//!
//! - [`DepthLayout::SinglePlane`]: the first cycle-1 frame carries no
//!   per-frame Z block. The single Z comes from the global
//!   `positionCurrent` entry.
//! - [`DepthLayout::SingleController`]: frame 1 of cycle 1 reports at most
//!   one Z controller. Subindex 0 is read from every cycle-1 frame.
//! - [`DepthLayout::MultiController`]: several controllers are logged per
//!   frame. Exactly one of them may change across depths; that one is the
//!   depth driver.
//!
//! Only cycle 1 is considered. Frame order is document order.

use std::collections::BTreeSet;
use tracing::debug;

use crate::document::PvDocument;
use crate::error::{MetadataError, MetadataResult};
use crate::xml::{exactly_one, parse_f64, Element};

const POSITION_KEY: &str = "positionCurrent";
const Z_AXIS: &str = "ZAxis";
const Z_ENTRY_FIELD: &str =
    "Frame/PVStateShard/PVStateValue[@key='positionCurrent']/SubindexedValues[@index='ZAxis']/SubindexedValue";

/// Which schema shape the depth data was read from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DepthLayout {
    /// One plane, Z from the global state
    SinglePlane,
    /// Multi-plane, one Z controller logged per frame
    SingleController,
    /// Multi-plane, several controllers logged; `subindex` drove depth
    MultiController { controllers: usize, subindex: String },
}

/// Depth count and Z positions for one acquisition
#[derive(Debug, Clone, PartialEq)]
pub struct DepthResolution {
    pub layout: DepthLayout,
    pub num_depths: usize,
    /// One entry per depth, in frame order
    pub z_positions: Vec<f64>,
    pub bidirectional_z: bool,
}

/// Resolve depth count and per-depth Z positions
pub fn resolve_depths(doc: &PvDocument) -> MetadataResult<DepthResolution> {
    let cycle = doc.first_cycle()?;
    let frames: Vec<&Element> = cycle.children_named("Frame").collect();
    let first_frame = frames
        .first()
        .ok_or_else(|| MetadataError::missing("Sequence[@cycle='1']/Frame"))?;

    if frame_z_block(first_frame).is_none() {
        return resolve_single_plane(doc);
    }

    let bidirectional_z = cycle.attr("bidirectionalZ") == Some("True");

    let mut indices = BTreeSet::new();
    let mut frame_one = Vec::new();
    for frame in &frames {
        let text = frame.required_attr("index", "Sequence[@cycle='1']/Frame")?;
        let index: u32 = text
            .trim()
            .parse()
            .map_err(|_| MetadataError::invalid("Sequence[@cycle='1']/Frame@index", text))?;
        if index == 1 {
            frame_one.push(*frame);
        }
        indices.insert(index);
    }
    let num_depths = indices.len();

    let frame_one = exactly_one(frame_one, "Sequence[@cycle='1']/Frame[@index='1']")?;
    let controllers = z_entries(frame_one);

    let (layout, z_positions) = if controllers.len() > 1 {
        select_varying_controller(&frames, &controllers)?
    } else {
        (
            DepthLayout::SingleController,
            controller_sequence(&frames, "0")?,
        )
    };

    if z_positions.len() != num_depths {
        return Err(MetadataError::DepthCountMismatch {
            expected: num_depths,
            actual: z_positions.len(),
        });
    }

    debug!(
        layout = ?layout,
        num_depths,
        bidirectional_z,
        "Resolved multi-plane depths"
    );

    Ok(DepthResolution {
        layout,
        num_depths,
        z_positions,
        bidirectional_z,
    })
}

fn resolve_single_plane(doc: &PvDocument) -> MetadataResult<DepthResolution> {
    let block = exactly_one(
        doc.state_value(POSITION_KEY)?
            .children_named("SubindexedValues")
            .filter(|v| v.attr_is("index", Z_AXIS)),
        "PVStateValue[@key='positionCurrent']/SubindexedValues[@index='ZAxis']",
    )?;
    let field = "PVStateValue[@key='positionCurrent']/SubindexedValues[@index='ZAxis']/SubindexedValue";
    let entry = block
        .children_named("SubindexedValue")
        .next()
        .ok_or_else(|| MetadataError::missing(field))?;
    let z = parse_f64(entry.required_attr("value", field)?, field)?;

    debug!(z, "Resolved single-plane depth");

    Ok(DepthResolution {
        layout: DepthLayout::SinglePlane,
        num_depths: 1,
        z_positions: vec![z],
        bidirectional_z: false,
    })
}

fn select_varying_controller(
    frames: &[&Element],
    controllers: &[&Element],
) -> MetadataResult<(DepthLayout, Vec<f64>)> {
    let mut varying = Vec::new();
    for controller in controllers {
        let subindex = controller.required_attr("subindex", Z_ENTRY_FIELD)?;
        let sequence = controller_sequence(frames, subindex)?;
        let changes = sequence
            .first()
            .map(|first| sequence.iter().any(|z| z != first))
            .unwrap_or(false);
        debug!(subindex, changes, "Z controller across depths");
        if changes {
            varying.push((subindex.to_string(), sequence));
        }
    }

    if varying.len() != 1 {
        return Err(MetadataError::ControllerDisambiguation {
            varying: varying.len(),
        });
    }

    let (subindex, sequence) = varying.remove(0);
    Ok((
        DepthLayout::MultiController {
            controllers: controllers.len(),
            subindex,
        },
        sequence,
    ))
}

/// Values reported under `subindex` across the frames, skipping frames that lack it
fn controller_sequence(frames: &[&Element], subindex: &str) -> MetadataResult<Vec<f64>> {
    let mut values = Vec::new();
    for frame in frames {
        for entry in z_entries(frame) {
            if entry.attr_is("subindex", subindex) {
                values.push(parse_f64(entry.required_attr("value", Z_ENTRY_FIELD)?, Z_ENTRY_FIELD)?);
            }
        }
    }
    Ok(values)
}

fn frame_z_block(frame: &Element) -> Option<&Element> {
    frame
        .children_named("PVStateShard")
        .flat_map(|shard| shard.children_named("PVStateValue"))
        .filter(|value| value.attr_is("key", POSITION_KEY))
        .flat_map(|value| value.children_named("SubindexedValues"))
        .find(|values| values.attr_is("index", Z_AXIS))
}

fn z_entries(frame: &Element) -> Vec<&Element> {
    frame
        .children_named("PVStateShard")
        .flat_map(|shard| shard.children_named("PVStateValue"))
        .filter(|value| value.attr_is("key", POSITION_KEY))
        .flat_map(|value| value.children_named("SubindexedValues"))
        .filter(|values| values.attr_is("index", Z_AXIS))
        .flat_map(|values| values.children_named("SubindexedValue"))
        .collect()
}
