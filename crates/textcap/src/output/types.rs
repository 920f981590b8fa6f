use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::Serialize;

use crate::session::{Mode, Session};
use textcap_types::{Magic, Region, ScreenPosition};

#[derive(Debug, Clone, Serialize)]
pub struct TimingRecord {
    pub stage: &'static str,
    pub elapsed_ms: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ShotRecord {
    pub monitor: usize,
    pub width: u32,
    pub height: u32,
    pub position: ScreenPosition,
}

/// Everything a finished request reports with `--json`.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub text: String,
    pub magic: Option<Magic>,
    pub scores: BTreeMap<Magic, f64>,
    pub mean_conf: f64,
    pub mode: Mode,
    pub region: Option<Region>,
    pub shots: Vec<ShotRecord>,
    pub num_words: usize,
    pub num_blocks: usize,
    pub num_pars: usize,
    pub num_lines: usize,
    pub stored: Vec<PathBuf>,
    pub timings: Vec<TimingRecord>,
}

impl Report {
    pub fn from_session(session: &Session) -> Option<Self> {
        let output = session.output()?;
        let (num_blocks, num_pars, num_lines) = session
            .ocr()
            .map(|ocr| (ocr.num_blocks(), ocr.num_pars(), ocr.num_lines()))
            .unwrap_or_default();
        Some(Self {
            text: output.text,
            magic: output.magic,
            scores: output.scores,
            mean_conf: output.mean_conf,
            mode: session.mode(),
            region: session.region().copied(),
            shots: session
                .shots()
                .iter()
                .map(|shot| ShotRecord {
                    monitor: shot.monitor,
                    width: shot.image.width(),
                    height: shot.image.height(),
                    position: shot.position,
                })
                .collect(),
            num_words: session.words().len(),
            num_blocks,
            num_pars,
            num_lines,
            stored: session.stored().to_vec(),
            timings: session
                .timings()
                .iter()
                .map(|timing| TimingRecord {
                    stage: timing.stage,
                    elapsed_ms: timing.elapsed.as_secs_f64() * 1000.0,
                })
                .collect(),
        })
    }
}
