use super::Stage;
use crate::error::PipelineError;
use crate::magic::MagicScorer;
use crate::session::{Mode, Session};

/// Picks the best magic and produces the final text.
#[derive(Debug, Default)]
pub struct MagicStage;

impl Stage for MagicStage {
    fn name(&self) -> &'static str {
        "magic"
    }

    fn handle(&self, mut session: Session) -> Result<Session, PipelineError> {
        let ocr = session.ocr().ok_or(PipelineError::MissingInput {
            stage: self.name(),
            field: "ocr",
        })?;

        if session.mode() == Mode::Raw {
            let text = ocr.lines();
            session.set_final_text(text, None)?;
            return Ok(session);
        }

        let scores = MagicScorer::score_all(ocr);
        session.record_magic_scores(scores)?;

        let Some(ocr) = session.ocr() else {
            return Err(PipelineError::MissingInput {
                stage: self.name(),
                field: "ocr",
            });
        };
        let best = ocr.best_scored_magic();
        let text = match best {
            Some(magic) => MagicScorer::transform(magic, ocr),
            None => ocr.lines(),
        };
        if let Some(magic) = best {
            log::info!("best magic: {magic}");
        }
        session.set_final_text(text, best)?;
        Ok(session)
    }
}
