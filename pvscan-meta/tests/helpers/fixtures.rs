//! PrairieView session fixtures
//!
//! Builds PVScan XML documents shaped like the instrument's output and
//! writes them, with a placeholder image file, into a session directory.

use std::fs;
use std::path::{Path, PathBuf};

/// Depth structure of a fixture
#[derive(Debug, Clone)]
pub enum Planes {
    /// One plane; frames carry no Z block
    Single { frames: usize },
    /// `z_per_depth[depth][controller]`, repeated for every cycle
    Multi {
        cycles: usize,
        z_per_depth: Vec<Vec<f64>>,
    },
}

/// One PrairieView acquisition session
#[derive(Debug, Clone)]
pub struct PvScanFixture {
    pub date: String,
    pub recording_time: String,
    pub frame_period: f64,
    pub scan_line_period: f64,
    pub pixels_per_line: u32,
    pub microns_per_pixel: f64,
    pub scan_center: (f64, f64),
    /// Global positionCurrent Z controllers
    pub global_z: Vec<f64>,
    pub channels: Vec<u32>,
    pub bidirectional_z: Option<bool>,
    pub planes: Planes,
}

impl PvScanFixture {
    pub fn single_plane(frames: usize) -> Self {
        Self {
            date: "3/14/2023 1:05:09 PM".to_string(),
            recording_time: "13:05:09.1234567".to_string(),
            frame_period: 0.033,
            scan_line_period: 6.3e-5,
            pixels_per_line: 512,
            microns_per_pixel: 1.2,
            scan_center: (0.125, -0.25),
            global_z: vec![-150.5, 25.0],
            channels: vec![1],
            bidirectional_z: None,
            planes: Planes::Single { frames },
        }
    }

    pub fn multi_plane(cycles: usize, z_per_depth: Vec<Vec<f64>>) -> Self {
        Self {
            bidirectional_z: Some(false),
            planes: Planes::Multi {
                cycles,
                z_per_depth,
            },
            ..Self::single_plane(0)
        }
    }

    pub fn with_frame_period(mut self, frame_period: f64) -> Self {
        self.frame_period = frame_period;
        self
    }

    pub fn with_geometry(mut self, pixels_per_line: u32, microns_per_pixel: f64) -> Self {
        self.pixels_per_line = pixels_per_line;
        self.microns_per_pixel = microns_per_pixel;
        self
    }

    pub fn with_channels(mut self, channels: Vec<u32>) -> Self {
        self.channels = channels;
        self
    }

    pub fn with_bidirectional_z(mut self, bidirectional_z: bool) -> Self {
        self.bidirectional_z = Some(bidirectional_z);
        self
    }

    /// Render the PVScan document
    pub fn to_xml(&self) -> String {
        let mut xml = String::new();
        xml.push_str("<?xml version=\"1.0\" encoding=\"utf-8\"?>\n");
        xml.push_str(&format!(
            "<PVScan version=\"5.5.64.600\" date=\"{}\" notes=\"\">\n",
            self.date
        ));
        xml.push_str("  <SystemIDs SystemID=\"4410\">\n    <SystemID SystemID=\"4410\" Description=\"Test Rig\" />\n  </SystemIDs>\n");
        xml.push_str(&self.global_state());

        let mut frame_number = 0usize;
        match &self.planes {
            Planes::Single { frames } => {
                xml.push_str(&self.sequence_open(1, "TSeries Timed Element"));
                for index in 1..=*frames {
                    xml.push_str(&self.frame(index, frame_number, None));
                    frame_number += 1;
                }
                xml.push_str("  </Sequence>\n");
            }
            Planes::Multi {
                cycles,
                z_per_depth,
            } => {
                for cycle in 1..=*cycles {
                    xml.push_str(&self.sequence_open(cycle, "TSeries ZSeries Element"));
                    for (depth, controllers) in z_per_depth.iter().enumerate() {
                        xml.push_str(&self.frame(depth + 1, frame_number, Some(controllers.as_slice())));
                        frame_number += 1;
                    }
                    xml.push_str("  </Sequence>\n");
                }
            }
        }

        xml.push_str("</PVScan>\n");
        xml
    }

    /// Write the XML and one image file; returns the image path
    pub fn write_session(&self, dir: &Path) -> PathBuf {
        fs::write(dir.join("TSeries-03142023-1305-001.xml"), self.to_xml()).unwrap();
        let image = dir.join("TSeries-03142023-1305-001_Cycle00001_Ch1_000001.ome.tif");
        fs::write(&image, b"II*\x00").unwrap();
        image
    }

    /// relativeTime of the last frame
    pub fn expected_duration(&self) -> f64 {
        let frames = match &self.planes {
            Planes::Single { frames } => *frames,
            Planes::Multi {
                cycles,
                z_per_depth,
            } => cycles * z_per_depth.len(),
        };
        frames.saturating_sub(1) as f64 * self.frame_period
    }

    fn global_state(&self) -> String {
        let z_entries: String = self
            .global_z
            .iter()
            .enumerate()
            .map(|(sub, z)| {
                format!(
                    "        <SubindexedValue subindex=\"{}\" value=\"{}\" description=\"Z{}\" />\n",
                    sub, z, sub
                )
            })
            .collect();

        format!(
            r#"  <PVStateShard>
    <PVStateValue key="activeMode" value="ResonantGalvo" />
    <PVStateValue key="framePeriod" value="{frame_period}" />
    <PVStateValue key="scanLinePeriod" value="{line_period}" />
    <PVStateValue key="pixelsPerLine" value="{pixels}" />
    <PVStateValue key="linesPerFrame" value="{pixels}" />
    <PVStateValue key="micronsPerPixel">
      <IndexedValue index="XAxis" value="{mpp}" />
      <IndexedValue index="YAxis" value="{mpp}" />
      <IndexedValue index="ZAxis" value="1" />
    </PVStateValue>
    <PVStateValue key="currentScanCenter">
      <IndexedValue index="XAxis" value="{cx}" />
      <IndexedValue index="YAxis" value="{cy}" />
    </PVStateValue>
    <PVStateValue key="positionCurrent">
      <SubindexedValues index="XAxis">
        <SubindexedValue subindex="0" value="1024.5" />
      </SubindexedValues>
      <SubindexedValues index="YAxis">
        <SubindexedValue subindex="0" value="-512.25" />
      </SubindexedValues>
      <SubindexedValues index="ZAxis">
{z_entries}      </SubindexedValues>
    </PVStateValue>
  </PVStateShard>
"#,
            frame_period = self.frame_period,
            line_period = self.scan_line_period,
            pixels = self.pixels_per_line,
            mpp = self.microns_per_pixel,
            cx = self.scan_center.0,
            cy = self.scan_center.1,
            z_entries = z_entries,
        )
    }

    fn sequence_open(&self, cycle: usize, kind: &str) -> String {
        let bidirectional = match self.bidirectional_z {
            Some(true) => " bidirectionalZ=\"True\"",
            Some(false) => " bidirectionalZ=\"False\"",
            None => "",
        };
        format!(
            "  <Sequence type=\"{}\" cycle=\"{}\" time=\"{}\"{}>\n",
            kind, cycle, self.recording_time, bidirectional
        )
    }

    fn frame(&self, index: usize, frame_number: usize, z: Option<&[f64]>) -> String {
        let files: String = self
            .channels
            .iter()
            .map(|ch| {
                format!(
                    "      <File channel=\"{ch}\" channelName=\"Ch{ch}\" filename=\"frame_Ch{ch}_{:06}.ome.tif\" />\n",
                    frame_number + 1
                )
            })
            .collect();

        let shard = match z {
            None => "      <PVStateShard />\n".to_string(),
            Some(controllers) => {
                let entries: String = controllers
                    .iter()
                    .enumerate()
                    .map(|(sub, value)| {
                        format!(
                            "            <SubindexedValue subindex=\"{}\" value=\"{}\" />\n",
                            sub, value
                        )
                    })
                    .collect();
                format!(
                    "      <PVStateShard>\n        <PVStateValue key=\"positionCurrent\">\n          <SubindexedValues index=\"ZAxis\">\n{}          </SubindexedValues>\n        </PVStateValue>\n      </PVStateShard>\n",
                    entries
                )
            }
        };

        format!(
            "    <Frame relativeTime=\"{}\" absoluteTime=\"{}\" index=\"{}\" parameterSet=\"CurrentSettings\">\n{}      <ExtraParameters validData=\"True\" />\n{}    </Frame>\n",
            frame_number as f64 * self.frame_period,
            1.5 + frame_number as f64 * self.frame_period,
            index,
            files,
            shard
        )
    }
}
