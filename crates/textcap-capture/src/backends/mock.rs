use std::collections::BTreeSet;

use image::{Rgba, RgbaImage};

use crate::core::{CaptureError, CaptureResult, MonitorInfo, ScreenGrabber};
use textcap_types::ScreenPosition;

/// Deterministic grabber for tests and headless runs.
///
/// Mirrors the layout most multi-monitor APIs report: a combined pseudo-monitor
/// first, then each physical monitor. Grabs for indices registered with
/// [`MockGrabber::with_failure`] fail.
#[derive(Debug, Clone)]
pub struct MockGrabber {
    screens: Vec<ScreenPosition>,
    failing: BTreeSet<usize>,
    report_combined: bool,
}

impl MockGrabber {
    pub fn new() -> Self {
        Self {
            screens: Vec::new(),
            failing: BTreeSet::new(),
            report_combined: true,
        }
    }

    /// Two side-by-side monitors, 640x360 and 320x200.
    pub fn dual() -> Self {
        Self::new()
            .with_screen(ScreenPosition::new(0, 0, 640, 360))
            .with_screen(ScreenPosition::new(640, 0, 320, 200))
    }

    pub fn with_screen(mut self, position: ScreenPosition) -> Self {
        self.screens.push(position);
        self
    }

    /// Make grabs of the physical monitor at `screen` (0-based) fail.
    pub fn with_failure(mut self, screen: usize) -> Self {
        self.failing.insert(screen);
        self
    }

    pub fn with_combined(mut self, report_combined: bool) -> Self {
        self.report_combined = report_combined;
        self
    }

    fn combined_position(&self) -> ScreenPosition {
        let left = self.screens.iter().map(|s| s.left).min().unwrap_or(0);
        let top = self.screens.iter().map(|s| s.top).min().unwrap_or(0);
        let right = self
            .screens
            .iter()
            .map(|s| s.left + s.width as i32)
            .max()
            .unwrap_or(0);
        let bottom = self
            .screens
            .iter()
            .map(|s| s.top + s.height as i32)
            .max()
            .unwrap_or(0);
        ScreenPosition::new(
            left,
            top,
            (right - left).max(0) as u32,
            (bottom - top).max(0) as u32,
        )
    }

    fn offset(&self) -> usize {
        usize::from(self.report_combined)
    }
}

impl Default for MockGrabber {
    fn default() -> Self {
        Self::dual()
    }
}

impl ScreenGrabber for MockGrabber {
    fn name(&self) -> &'static str {
        "mock"
    }

    fn monitors(&self) -> CaptureResult<Vec<MonitorInfo>> {
        if self.screens.is_empty() {
            return Err(CaptureError::NoMonitors);
        }
        let mut monitors = Vec::with_capacity(self.screens.len() + 1);
        if self.report_combined {
            monitors.push(
                MonitorInfo::new(0, "mock-all", self.combined_position()).with_combined(true),
            );
        }
        let offset = self.offset();
        for (screen, position) in self.screens.iter().enumerate() {
            monitors.push(
                MonitorInfo::new(screen + offset, format!("mock-{screen}"), *position)
                    .with_primary(screen == 0),
            );
        }
        Ok(monitors)
    }

    fn grab(&self, monitor: &MonitorInfo) -> CaptureResult<RgbaImage> {
        if monitor.combined {
            let position = self.combined_position();
            return Ok(RgbaImage::from_pixel(
                position.width,
                position.height,
                Rgba([0, 0, 0, 255]),
            ));
        }
        let screen = monitor
            .index
            .checked_sub(self.offset())
            .filter(|screen| *screen < self.screens.len())
            .ok_or_else(|| CaptureError::grab(monitor.index, "unknown mock monitor"))?;
        if self.failing.contains(&screen) {
            log::debug!("mock monitor {screen} configured to fail");
            return Err(CaptureError::grab(
                monitor.index,
                "mock failure (no display server)",
            ));
        }
        let position = self.screens[screen];
        let shade = (40 * (screen + 1) % 256) as u8;
        Ok(RgbaImage::from_fn(position.width, position.height, |x, y| {
            Rgba([shade, (x % 256) as u8, (y % 256) as u8, 255])
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dual_layout_reports_combined_then_physical() {
        let grabber = MockGrabber::dual();
        let monitors = grabber.monitors().unwrap();
        assert_eq!(monitors.len(), 3);
        assert!(monitors[0].combined);
        assert_eq!(monitors[0].position, ScreenPosition::new(0, 0, 960, 360));
        assert_eq!(monitors[2].position, ScreenPosition::new(640, 0, 320, 200));
    }

    #[test]
    fn grabs_match_monitor_size() {
        let grabber = MockGrabber::dual();
        let monitors = grabber.physical_monitors().unwrap();
        let frame = grabber.grab(&monitors[1]).unwrap();
        assert_eq!(frame.dimensions(), (320, 200));
    }

    #[test]
    fn configured_failures_surface_as_grab_errors() {
        let grabber = MockGrabber::dual().with_failure(0);
        let monitors = grabber.physical_monitors().unwrap();
        match grabber.grab(&monitors[0]) {
            Err(CaptureError::Grab { monitor, .. }) => assert_eq!(monitor, 1),
            other => panic!("unexpected result: {other:?}"),
        }
        assert!(grabber.grab(&monitors[1]).is_ok());
    }

    #[test]
    fn empty_layout_has_no_monitors() {
        let grabber = MockGrabber::new();
        assert!(matches!(grabber.monitors(), Err(CaptureError::NoMonitors)));
    }
}
