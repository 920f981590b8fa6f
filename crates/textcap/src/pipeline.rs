use std::sync::Arc;
use std::time::Instant;

use crate::error::PipelineError;
use crate::session::{Session, StageTiming};
use crate::settings::EffectiveSettings;
use crate::stage::{CaptureStage, CropStage, MagicStage, OcrStage, Stage, StoreStage};
use textcap_capture::DynScreenGrabber;
use textcap_ocr::OcrEngine;

/// Fixed sequence of stages a session runs through.
pub struct Pipeline {
    stages: Vec<Box<dyn Stage>>,
}

#[derive(Default)]
pub struct PipelineBuilder {
    stages: Vec<Box<dyn Stage>>,
}

impl PipelineBuilder {
    pub fn stage(mut self, stage: impl Stage + 'static) -> Self {
        self.stages.push(Box::new(stage));
        self
    }

    pub fn build(self) -> Pipeline {
        Pipeline {
            stages: self.stages,
        }
    }
}

impl Pipeline {
    pub fn builder() -> PipelineBuilder {
        PipelineBuilder::default()
    }

    /// Capture, crop, optional store, recognition and magic, in that order.
    pub fn from_settings(
        settings: &EffectiveSettings,
        grabber: DynScreenGrabber,
        engine: Arc<dyn OcrEngine>,
    ) -> Self {
        let mut builder = Self::builder()
            .stage(CaptureStage::new(grabber))
            .stage(CropStage);
        if let Some(dir) = &settings.output.store_dir {
            builder = builder.stage(StoreStage::new(dir));
        }
        builder
            .stage(
                OcrStage::new(engine, settings.ocr.tess_args()).with_parallel(settings.ocr.parallel),
            )
            .stage(MagicStage)
            .build()
    }

    pub fn stage_names(&self) -> Vec<&'static str> {
        self.stages.iter().map(|stage| stage.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Run `session` through every stage and return what the last one
    /// produced.
    pub fn run(&self, mut session: Session) -> Result<Session, PipelineError> {
        for stage in &self.stages {
            let started = Instant::now();
            log::debug!("entering stage {}", stage.name());
            session = stage.handle(session)?;
            let elapsed = started.elapsed();
            log::debug!("stage {} finished in {elapsed:.2?}", stage.name());
            session.push_timing(StageTiming {
                stage: stage.name(),
                elapsed,
            });
        }
        Ok(session)
    }
}
