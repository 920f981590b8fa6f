pub mod capture;
pub mod crop;
pub mod magic;
pub mod ocr;
pub mod store;

use crate::error::PipelineError;
use crate::session::Session;

pub use capture::CaptureStage;
pub use crop::CropStage;
pub use magic::MagicStage;
pub use ocr::OcrStage;
pub use store::StoreStage;

/// One step of a capture request.
///
/// Stages hold configuration only, so a pipeline built once serves any number
/// of requests.
pub trait Stage: Send + Sync {
    fn name(&self) -> &'static str;

    fn handle(&self, session: Session) -> Result<Session, PipelineError>;
}
