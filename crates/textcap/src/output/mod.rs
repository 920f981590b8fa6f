mod error;
mod json;
mod types;

pub use error::OutputError;
pub use json::{render_report, write_report};
pub use types::{Report, TimingRecord};
