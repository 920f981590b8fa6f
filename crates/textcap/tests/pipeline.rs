use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use textcap::settings::{
    CaptureSettings, EffectiveSettings, OcrSettings, OutputSettings,
};
use textcap::stage::capture::{PLACEHOLDER_HEIGHT, PLACEHOLDER_WIDTH};
use textcap::{Mode, Pipeline, PipelineError, Session};
use textcap_capture::MockGrabber;
use textcap_ocr::{OcrEngine, OcrError, OcrRequest, OcrResponse};
use textcap_types::{Magic, Region, Word};

/// Answers with canned words keyed by the width of the image it is given.
#[derive(Default)]
struct ScriptedEngine {
    by_width: HashMap<u32, Vec<Word>>,
    seen: Mutex<Vec<u32>>,
}

impl ScriptedEngine {
    fn answer(mut self, width: u32, words: Vec<Word>) -> Self {
        self.by_width.insert(width, words);
        self
    }

    fn seen(&self) -> Vec<u32> {
        let mut seen = self.seen.lock().unwrap().clone();
        seen.sort_unstable();
        seen
    }
}

impl OcrEngine for ScriptedEngine {
    fn name(&self) -> &'static str {
        "scripted"
    }

    fn recognize(&self, request: &OcrRequest<'_>) -> Result<OcrResponse, OcrError> {
        let width = request.image().width();
        self.seen.lock().unwrap().push(width);
        Ok(OcrResponse::new(
            self.by_width.get(&width).cloned().unwrap_or_default(),
        ))
    }
}

struct MissingLanguageEngine;

impl OcrEngine for MissingLanguageEngine {
    fn name(&self) -> &'static str {
        "missing-language"
    }

    fn recognize(&self, request: &OcrRequest<'_>) -> Result<OcrResponse, OcrError> {
        Err(OcrError::LanguageData {
            lang: request.args().lang.clone(),
        })
    }
}

fn settings(mode: Mode, store_dir: Option<PathBuf>) -> EffectiveSettings {
    EffectiveSettings {
        capture: CaptureSettings {
            backend: Some("mock".to_string()),
        },
        ocr: OcrSettings {
            language: "eng".to_string(),
            tessdata_dir: None,
            oem: 1,
            psm: 3,
            tesseract: PathBuf::from("tesseract"),
            parallel: true,
            scale_factor: 2.0,
            padding: 20,
        },
        output: OutputSettings {
            mode,
            store_dir,
            json: false,
            compact: false,
        },
        config_dir: None,
    }
}

fn word(block: u32, par: u32, line: u32, text: &str) -> Word {
    Word::new(block, par, line, text).with_confidence(90.0)
}

#[test]
fn email_on_first_monitor_is_extracted() {
    let engine = Arc::new(ScriptedEngine::default().answer(
        640,
        vec![word(1, 1, 1, "contact"), word(1, 1, 1, "me@example.com")],
    ));
    let pipeline = Pipeline::from_settings(
        &settings(Mode::Parse, None),
        Arc::new(MockGrabber::dual()),
        engine.clone(),
    );
    assert_eq!(pipeline.stage_names(), vec!["capture", "crop", "ocr", "magic"]);

    let session = pipeline.run(Session::new(Mode::Parse)).unwrap();
    let output = session.output().unwrap();
    assert_eq!(output.magic, Some(Magic::Email));
    assert_eq!(output.text, "me@example.com");
    assert!((output.mean_conf - 90.0).abs() < 1e-9);
    assert_eq!(engine.seen(), vec![320, 640]);
    assert_eq!(session.timings().len(), 4);
}

#[test]
fn failing_monitor_is_replaced_and_others_still_recognized() {
    let engine = Arc::new(ScriptedEngine::default().answer(
        320,
        vec![word(1, 1, 1, "first"), word(1, 1, 2, "second")],
    ));
    let pipeline = Pipeline::from_settings(
        &settings(Mode::Parse, None),
        Arc::new(MockGrabber::dual().with_failure(0)),
        engine.clone(),
    );

    let session = pipeline.run(Session::new(Mode::Parse)).unwrap();
    let shots = session.shots();
    assert_eq!(shots.len(), 2);
    assert_eq!(
        shots[0].image.dimensions(),
        (PLACEHOLDER_WIDTH, PLACEHOLDER_HEIGHT)
    );
    assert_eq!(shots[1].image.dimensions(), (320, 200));
    assert_eq!(engine.seen(), vec![PLACEHOLDER_WIDTH, 320]);

    assert_eq!(session.best_magic(), Some(Magic::MultiLine));
    assert_eq!(session.final_text(), Some("first\nsecond"));
}

#[test]
fn region_is_cropped_stored_and_kept_raw() {
    let dir = tempfile::tempdir().unwrap();
    let engine = Arc::new(ScriptedEngine::default().answer(
        100,
        vec![word(1, 1, 1, "one"), word(1, 1, 2, "two"), word(2, 1, 1, "three")],
    ));
    let pipeline = Pipeline::from_settings(
        &settings(Mode::Raw, Some(dir.path().to_path_buf())),
        Arc::new(MockGrabber::dual()),
        engine.clone(),
    );
    assert_eq!(
        pipeline.stage_names(),
        vec!["capture", "crop", "store", "ocr", "magic"]
    );

    let session = Session::new(Mode::Raw).with_region(Region::new(1, 0, 0, 100, 50));
    let session = pipeline.run(session).unwrap();

    assert_eq!(engine.seen(), vec![100]);
    assert_eq!(session.image().unwrap().dimensions(), (100, 50));
    assert_eq!(session.final_text(), Some("one\ntwo\nthree"));
    assert_eq!(session.best_magic(), None);
    assert!(session.magic_scores().unwrap().is_empty());
    assert!(dir.path().join("selection.png").is_file());
    assert!(dir.path().join("shot-1.png").is_file());
    assert_eq!(session.stored().len(), 3);
}

#[test]
fn nothing_recognized_falls_back() {
    let pipeline = Pipeline::from_settings(
        &settings(Mode::Parse, None),
        Arc::new(MockGrabber::dual()),
        Arc::new(ScriptedEngine::default()),
    );
    let session = pipeline.run(Session::new(Mode::Parse)).unwrap();
    let output = session.output().unwrap();
    assert_eq!(output.magic, Some(Magic::Fallback));
    assert_eq!(output.text, "");
    assert_eq!(output.mean_conf, 0.0);
}

#[test]
fn engine_failure_aborts_the_request() {
    let pipeline = Pipeline::from_settings(
        &settings(Mode::Parse, None),
        Arc::new(MockGrabber::dual()),
        Arc::new(MissingLanguageEngine),
    );
    let err = pipeline.run(Session::new(Mode::Parse)).unwrap_err();
    assert!(matches!(
        err,
        PipelineError::Ocr(OcrError::LanguageData { ref lang }) if lang == "eng"
    ));
}

#[test]
fn region_on_unknown_monitor_is_rejected() {
    let pipeline = Pipeline::from_settings(
        &settings(Mode::Parse, None),
        Arc::new(MockGrabber::dual()),
        Arc::new(ScriptedEngine::default()),
    );
    let session = Session::new(Mode::Parse).with_region(Region::new(5, 0, 0, 10, 10));
    let err = pipeline.run(session).unwrap_err();
    assert!(matches!(err, PipelineError::InvalidRegion { .. }));
}
