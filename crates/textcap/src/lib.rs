//! Screen text capture.
//!
//! A capture request becomes a [`Session`] that runs through a [`Pipeline`]
//! of stages: screenshots are taken, optionally cropped and stored, the text
//! is recognized and finally classified by [`MagicScorer`] to produce the text
//! handed back to the user.

pub mod backend;
pub mod cli;
pub mod error;
pub mod logging;
pub mod magic;
pub mod output;
pub mod pipeline;
pub mod request;
pub mod session;
pub mod settings;
pub mod stage;

pub use error::PipelineError;
pub use magic::MagicScorer;
pub use pipeline::{Pipeline, PipelineBuilder};
pub use request::CaptureRequest;
pub use session::{CaptureOutput, Mode, Session, StageTiming};
pub use stage::Stage;
