pub mod backends;
pub mod config;
pub mod core;

pub use backends::mock::MockGrabber;
#[cfg(feature = "backend-xcap")]
pub use backends::xcap_backend::XcapGrabber;
pub use config::{Backend, Configuration};
pub use core::{CaptureError, CaptureResult, DynScreenGrabber, MonitorInfo, ScreenGrabber};
