//! Screenshot capture through the `xcap` crate (X11, Wayland via portal,
//! macOS and Windows).

use image::RgbaImage;
use xcap::Monitor;

use crate::core::{CaptureError, CaptureResult, MonitorInfo, ScreenGrabber};
use textcap_types::ScreenPosition;

#[derive(Debug, Default)]
pub struct XcapGrabber;

impl XcapGrabber {
    pub fn new() -> Self {
        Self
    }
}

impl ScreenGrabber for XcapGrabber {
    fn name(&self) -> &'static str {
        "xcap"
    }

    fn monitors(&self) -> CaptureResult<Vec<MonitorInfo>> {
        let monitors = Monitor::all().map_err(|err| CaptureError::enumerate(err.to_string()))?;
        if monitors.is_empty() {
            return Err(CaptureError::NoMonitors);
        }
        log::debug!("xcap reported {} monitor(s)", monitors.len());
        monitors
            .iter()
            .enumerate()
            .map(|(index, monitor)| describe(index, monitor))
            .collect()
    }

    fn grab(&self, info: &MonitorInfo) -> CaptureResult<RgbaImage> {
        // Monitor handles are not Send everywhere; look them up per grab.
        let monitors =
            Monitor::all().map_err(|err| CaptureError::grab(info.index, err.to_string()))?;
        let monitor = monitors
            .get(info.index)
            .ok_or_else(|| CaptureError::grab(info.index, "monitor disappeared"))?;
        monitor.capture_image().map_err(|err| {
            log::warn!("grabbing monitor {} ({}) failed: {err}", info.index, info.name);
            CaptureError::grab(info.index, err.to_string())
        })
    }
}

fn describe(index: usize, monitor: &Monitor) -> CaptureResult<MonitorInfo> {
    let field = |err: xcap::XCapError| {
        log::warn!("monitor {index}: failed to read geometry: {err}");
        CaptureError::enumerate(err.to_string())
    };
    let position = ScreenPosition::new(
        monitor.x().map_err(field)?,
        monitor.y().map_err(field)?,
        monitor.width().map_err(field)?,
        monitor.height().map_err(field)?,
    );
    let name = monitor.name().unwrap_or_else(|err| {
        log::debug!("monitor {index}: no name reported ({err})");
        format!("monitor-{index}")
    });
    let primary = monitor.is_primary().unwrap_or_else(|err| {
        log::debug!("monitor {index}: primary flag unavailable ({err})");
        false
    });
    Ok(MonitorInfo::new(index, name, position).with_primary(primary))
}
