//! Text recognition for captured screen images.
//!
//! Engines implement [`OcrEngine`] and turn an [`OcrRequest`] into word
//! records carrying the block/paragraph/line layout of the recognized text.

mod args;
mod backends;
mod engine;
mod enhance;
mod error;
mod request;
mod response;

pub use args::TessArgs;
#[cfg(feature = "engine-tesseract")]
pub use backends::tesseract::{TesseractOcrEngine, parse_tsv};
pub use engine::{NoopOcrEngine, OcrEngine};
pub use enhance::{EnhanceSettings, enhance};
pub use error::OcrError;
pub use request::OcrRequest;
pub use response::OcrResponse;
