use std::sync::Arc;

use image::RgbaImage;
use thiserror::Error;

use textcap_types::ScreenPosition;

pub type CaptureResult<T> = Result<T, CaptureError>;

pub type DynScreenGrabber = Arc<dyn ScreenGrabber>;

#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("backend {backend} is not supported in this build")]
    Unsupported { backend: &'static str },

    #[error("no monitors detected")]
    NoMonitors,

    #[error("failed to enumerate monitors: {message}")]
    Enumerate { message: String },

    #[error("failed to grab monitor {monitor}: {message}")]
    Grab { monitor: usize, message: String },

    #[error("configuration error: {message}")]
    Configuration { message: String },
}

impl CaptureError {
    pub fn unsupported(backend: &'static str) -> Self {
        Self::Unsupported { backend }
    }

    pub fn enumerate(message: impl Into<String>) -> Self {
        Self::Enumerate {
            message: message.into(),
        }
    }

    pub fn grab(monitor: usize, message: impl Into<String>) -> Self {
        Self::Grab {
            monitor,
            message: message.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }
}

/// A monitor as reported by the windowing system.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonitorInfo {
    /// Backend-specific index passed back to [`ScreenGrabber::grab`].
    pub index: usize,
    pub name: String,
    pub position: ScreenPosition,
    pub primary: bool,
    /// Pseudo-monitor spanning the whole virtual desktop.
    pub combined: bool,
}

impl MonitorInfo {
    pub fn new(index: usize, name: impl Into<String>, position: ScreenPosition) -> Self {
        Self {
            index,
            name: name.into(),
            position,
            primary: false,
            combined: false,
        }
    }

    pub fn with_primary(mut self, primary: bool) -> Self {
        self.primary = primary;
        self
    }

    pub fn with_combined(mut self, combined: bool) -> Self {
        self.combined = combined;
        self
    }
}

/// Source of raw framebuffers for each monitor.
pub trait ScreenGrabber: Send + Sync {
    fn name(&self) -> &'static str;

    fn monitors(&self) -> CaptureResult<Vec<MonitorInfo>>;

    fn grab(&self, monitor: &MonitorInfo) -> CaptureResult<RgbaImage>;

    /// Physical monitors only, in enumeration order.
    fn physical_monitors(&self) -> CaptureResult<Vec<MonitorInfo>> {
        Ok(self
            .monitors()?
            .into_iter()
            .filter(|monitor| !monitor.combined)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedGrabber(Vec<MonitorInfo>);

    impl ScreenGrabber for FixedGrabber {
        fn name(&self) -> &'static str {
            "fixed"
        }

        fn monitors(&self) -> CaptureResult<Vec<MonitorInfo>> {
            Ok(self.0.clone())
        }

        fn grab(&self, monitor: &MonitorInfo) -> CaptureResult<RgbaImage> {
            Err(CaptureError::grab(monitor.index, "not wired"))
        }
    }

    #[test]
    fn physical_monitors_skip_combined_entries() {
        let grabber = FixedGrabber(vec![
            MonitorInfo::new(0, "all", ScreenPosition::new(0, 0, 300, 100)).with_combined(true),
            MonitorInfo::new(1, "left", ScreenPosition::new(0, 0, 100, 100)).with_primary(true),
            MonitorInfo::new(2, "right", ScreenPosition::new(100, 0, 200, 100)),
        ]);
        let physical = grabber.physical_monitors().unwrap();
        let names: Vec<_> = physical.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["left", "right"]);
        assert!(physical[0].primary);
    }

    #[test]
    fn grab_error_names_the_monitor() {
        let err = CaptureError::grab(3, "no display");
        assert_eq!(err.to_string(), "failed to grab monitor 3: no display");
    }
}
