use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::ValueEnum;
use image::RgbImage;
use serde::{Deserialize, Serialize};

use crate::error::PipelineError;
use textcap_types::{Magic, OcrResult, Region, Shot, Word};

/// How recognized text is turned into the final text.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Score every magic and apply the best one's transform.
    #[default]
    Parse,
    /// Keep the recognized lines untouched.
    Raw,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Parse => "parse",
            Mode::Raw => "raw",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StageTiming {
    pub stage: &'static str,
    pub elapsed: Duration,
}

/// What a finished request hands back to its caller.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CaptureOutput {
    pub text: String,
    pub magic: Option<Magic>,
    pub scores: BTreeMap<Magic, f64>,
    pub mean_conf: f64,
}

/// Per-request data threaded through the pipeline.
///
/// Fields only accumulate: sequences are append-only and every other field
/// can be written once, so a stage never overwrites what an earlier stage
/// produced.
#[derive(Debug, Default)]
pub struct Session {
    test_mode: bool,
    mode: Mode,
    region: Option<Region>,
    shots: Vec<Shot>,
    image: Option<RgbImage>,
    ocr: Option<OcrResult>,
    scores_recorded: bool,
    final_text: Option<String>,
    best_magic: Option<Magic>,
    stored: Vec<PathBuf>,
    timings: Vec<StageTiming>,
}

impl Session {
    pub fn new(mode: Mode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    /// Session over pre-captured shots; the capture stage leaves them alone.
    pub fn from_shots(mode: Mode, shots: Vec<Shot>) -> Self {
        Self {
            test_mode: true,
            mode,
            shots,
            ..Self::default()
        }
    }

    pub fn with_region(mut self, region: Region) -> Self {
        self.region = Some(region);
        self
    }

    pub fn test_mode(&self) -> bool {
        self.test_mode
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn region(&self) -> Option<&Region> {
        self.region.as_ref()
    }

    pub fn shots(&self) -> &[Shot] {
        &self.shots
    }

    pub fn push_shot(&mut self, shot: Shot) {
        self.shots.push(shot);
    }

    pub fn image(&self) -> Option<&RgbImage> {
        self.image.as_ref()
    }

    pub fn set_image(&mut self, image: RgbImage) -> Result<(), PipelineError> {
        set_once(&mut self.image, image, "image")
    }

    pub fn ocr(&self) -> Option<&OcrResult> {
        self.ocr.as_ref()
    }

    pub fn set_ocr_result(&mut self, ocr: OcrResult) -> Result<(), PipelineError> {
        set_once(&mut self.ocr, ocr, "ocr")
    }

    /// Merged word records; empty until recognition ran.
    pub fn words(&self) -> &[Word] {
        self.ocr
            .as_ref()
            .map(|ocr| ocr.words.as_slice())
            .unwrap_or_default()
    }

    pub fn magic_scores(&self) -> Option<&BTreeMap<Magic, f64>> {
        self.ocr.as_ref().map(|ocr| &ocr.magic_scores)
    }

    /// Attach scores to the recognition result. Allowed once.
    pub fn record_magic_scores(
        &mut self,
        scores: BTreeMap<Magic, f64>,
    ) -> Result<(), PipelineError> {
        let ocr = self.ocr.as_mut().ok_or(PipelineError::MissingInput {
            stage: "magic",
            field: "ocr",
        })?;
        if self.scores_recorded {
            return Err(PipelineError::FieldAlreadySet {
                field: "magic_scores",
            });
        }
        ocr.magic_scores = scores;
        self.scores_recorded = true;
        Ok(())
    }

    pub fn final_text(&self) -> Option<&str> {
        self.final_text.as_deref()
    }

    pub fn best_magic(&self) -> Option<Magic> {
        self.best_magic
    }

    pub fn set_final_text(
        &mut self,
        text: String,
        magic: Option<Magic>,
    ) -> Result<(), PipelineError> {
        set_once(&mut self.final_text, text, "final_text")?;
        self.best_magic = magic;
        Ok(())
    }

    pub fn stored(&self) -> &[PathBuf] {
        &self.stored
    }

    pub fn push_stored(&mut self, path: &Path) {
        self.stored.push(path.to_path_buf());
    }

    pub fn timings(&self) -> &[StageTiming] {
        &self.timings
    }

    pub(crate) fn push_timing(&mut self, timing: StageTiming) {
        self.timings.push(timing);
    }

    /// Result of a completed request, `None` until a final text exists.
    pub fn output(&self) -> Option<CaptureOutput> {
        let text = self.final_text.clone()?;
        let (scores, mean_conf) = match &self.ocr {
            Some(ocr) => (ocr.magic_scores.clone(), ocr.mean_conf()),
            None => (BTreeMap::new(), 0.0),
        };
        Some(CaptureOutput {
            text,
            magic: self.best_magic,
            scores,
            mean_conf,
        })
    }
}

fn set_once<T>(slot: &mut Option<T>, value: T, field: &'static str) -> Result<(), PipelineError> {
    if slot.is_some() {
        return Err(PipelineError::FieldAlreadySet { field });
    }
    *slot = Some(value);
    Ok(())
}
