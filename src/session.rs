use chrono::Utc;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use log::info;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use crate::error::{Result, SixAxisError};
use crate::input::{NpadButtonSet, NpadId, NpadStyle, NpadStyleSet};
use crate::source::HidSource;
use crate::types::{SixAxisSample, Tick};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RecordedSixAxis {
    pub style: NpadStyle,
    pub sample: SixAxisSample,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RecordedNpad {
    pub id: NpadId,
    pub styles: NpadStyleSet,
    pub buttons: NpadButtonSet,
    pub six_axis: Vec<RecordedSixAxis>,
}

/// Everything the HID layer reported on one host frame
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RecordedFrame {
    pub tick: Tick,
    pub npads: Vec<RecordedNpad>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RecordedSession {
    pub recorded_at: String,
    pub tick_frequency: u64,
    pub frames: Vec<RecordedFrame>,
}

impl RecordedSession {
    pub fn new(tick_frequency: u64) -> Self {
        Self {
            recorded_at: Utc::now().to_rfc3339(),
            tick_frequency,
            frames: Vec::new(),
        }
    }

    /// Styles that appear anywhere in the session
    pub fn styles(&self) -> Vec<NpadStyle> {
        let mut styles: Vec<NpadStyle> = self
            .frames
            .iter()
            .flat_map(|f| f.npads.iter())
            .flat_map(|n| n.styles.styles())
            .collect();
        styles.sort();
        styles.dedup();
        styles
    }

    /// Write as JSON, gzip-compressed when the path ends in `.gz`
    pub fn save(&self, path: &Path) -> Result<()> {
        let file = File::create(path)?;
        if is_gzip(path) {
            let mut encoder = GzEncoder::new(BufWriter::new(file), Compression::default());
            serde_json::to_writer(&mut encoder, self)?;
            encoder.finish()?.flush()?;
        } else {
            let mut writer = BufWriter::new(file);
            serde_json::to_writer_pretty(&mut writer, self)?;
            writer.flush()?;
        }
        info!("Saved {} frames to {}", self.frames.len(), path.display());
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        let session: RecordedSession = if is_gzip(path) {
            serde_json::from_reader(BufReader::new(GzDecoder::new(file)))?
        } else {
            serde_json::from_reader(BufReader::new(file))?
        };
        info!("Loaded {} frames from {}", session.frames.len(), path.display());
        Ok(session)
    }
}

fn is_gzip(path: &Path) -> bool {
    path.extension().map(|e| e == "gz").unwrap_or(false)
}

// ─── Recording ───────────────────────────────────────────────────────────────

/// Captures what a `HidSource` reports, one frame per `capture()`
pub struct Recorder {
    ids: Vec<NpadId>,
    session: RecordedSession,
}

impl Recorder {
    pub fn new(ids: &[NpadId], tick_frequency: u64) -> Self {
        Self {
            ids: ids.to_vec(),
            session: RecordedSession::new(tick_frequency),
        }
    }

    pub fn capture<S: HidSource + ?Sized>(&mut self, source: &S) {
        let npads = self
            .ids
            .iter()
            .map(|&id| {
                let styles = source.style_set(id);
                let six_axis = styles
                    .styles()
                    .into_iter()
                    .filter_map(|style| {
                        source
                            .six_axis_state(id, style)
                            .map(|sample| RecordedSixAxis { style, sample })
                    })
                    .collect();
                RecordedNpad {
                    id,
                    styles,
                    buttons: source.buttons(id),
                    six_axis,
                }
            })
            .collect();

        self.session.frames.push(RecordedFrame {
            tick: source.system_tick(),
            npads,
        });
    }

    pub fn frame_count(&self) -> usize {
        self.session.frames.len()
    }

    pub fn into_session(self) -> RecordedSession {
        self.session
    }
}

// ─── Replay ──────────────────────────────────────────────────────────────────

/// Replays a recorded session as a `HidSource`, one frame per `advance()`
pub struct RecordedHid {
    session: RecordedSession,
    position: usize,
}

impl RecordedHid {
    pub fn new(session: RecordedSession) -> Result<Self> {
        if session.frames.is_empty() {
            return Err(SixAxisError::EmptySession);
        }
        Ok(Self {
            session,
            position: 0,
        })
    }

    /// Step to the next frame; false once past the last one
    pub fn advance(&mut self) -> bool {
        if self.position + 1 < self.session.frames.len() {
            self.position += 1;
            true
        } else {
            false
        }
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn frame_count(&self) -> usize {
        self.session.frames.len()
    }

    fn current(&self) -> &RecordedFrame {
        &self.session.frames[self.position]
    }

    fn npad(&self, id: NpadId) -> Option<&RecordedNpad> {
        self.current().npads.iter().find(|n| n.id == id)
    }
}

impl HidSource for RecordedHid {
    fn style_set(&self, id: NpadId) -> NpadStyleSet {
        self.npad(id).map(|n| n.styles).unwrap_or_default()
    }

    fn buttons(&self, id: NpadId) -> NpadButtonSet {
        self.npad(id).map(|n| n.buttons).unwrap_or_default()
    }

    fn six_axis_state(&self, id: NpadId, style: NpadStyle) -> Option<SixAxisSample> {
        self.npad(id)?
            .six_axis
            .iter()
            .find(|r| r.style == style)
            .map(|r| r.sample.clone())
    }

    fn start_six_axis(&mut self, _id: NpadId, style: NpadStyle) -> usize {
        style.sensor_count()
    }

    fn system_tick(&self) -> Tick {
        self.current().tick
    }

    fn tick_frequency(&self) -> u64 {
        self.session.tick_frequency
    }
}
