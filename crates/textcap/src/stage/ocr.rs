use std::sync::Arc;
use std::time::Instant;

use image::RgbImage;
use rayon::prelude::*;

use super::Stage;
use crate::error::PipelineError;
use crate::session::Session;
use textcap_ocr::{OcrEngine, OcrError, OcrRequest, OcrResponse, TessArgs};
use textcap_types::{OcrResult, Word};

/// Recognizes the selection, or every shot when nothing was selected.
pub struct OcrStage {
    engine: Arc<dyn OcrEngine>,
    args: TessArgs,
    parallel: bool,
}

impl OcrStage {
    pub fn new(engine: Arc<dyn OcrEngine>, args: TessArgs) -> Self {
        Self {
            engine,
            args,
            parallel: true,
        }
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    fn recognize(&self, image: &RgbImage) -> Result<OcrResponse, OcrError> {
        self.engine.recognize(&OcrRequest::new(image, &self.args))
    }
}

/// Concatenate per-target words, shifting block numbers so blocks of
/// different targets never share a number.
pub fn merge_responses(responses: Vec<OcrResponse>) -> Vec<Word> {
    let mut words = Vec::new();
    let mut offset = 0;
    for response in responses {
        let highest = response.max_block();
        words.extend(response.words.into_iter().map(|mut word| {
            word.block_num += offset;
            word
        }));
        offset += highest;
    }
    words
}

impl Stage for OcrStage {
    fn name(&self) -> &'static str {
        "ocr"
    }

    fn handle(&self, mut session: Session) -> Result<Session, PipelineError> {
        self.engine.warm_up()?;

        let targets: Vec<&RgbImage> = match session.image() {
            Some(image) => vec![image],
            None => session.shots().iter().map(|shot| &shot.image).collect(),
        };
        if targets.is_empty() {
            return Err(PipelineError::MissingInput {
                stage: self.name(),
                field: "shots",
            });
        }

        let started = Instant::now();
        let responses = if self.parallel && targets.len() > 1 {
            targets
                .par_iter()
                .map(|image| self.recognize(image))
                .collect::<Result<Vec<_>, _>>()?
        } else {
            targets
                .iter()
                .map(|image| self.recognize(image))
                .collect::<Result<Vec<_>, _>>()?
        };
        log::info!(
            "{} recognized {} image(s) in {:.2?}",
            self.engine.name(),
            responses.len(),
            started.elapsed()
        );

        let words = merge_responses(responses);
        let result = OcrResult::new(words, self.args.is_language_without_spaces());
        log::debug!(
            "{} word(s), {} line(s), mean confidence {:.1}",
            result.words.len(),
            result.num_lines(),
            result.mean_conf()
        );
        session.set_ocr_result(result)?;
        Ok(session)
    }
}
